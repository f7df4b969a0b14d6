//! In-memory survey service for development and testing

use crate::api::SurveyApi;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use survey_types::{
    Division, DivisionId, Feeder, NewPole, NewTransformer, Pole, PoleCreated, PoleDetail, PoleId,
    PoleType, QuestionCatalogs, Subdivision, SubdivisionId, Transformer, TransformerId,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory implementation of [`SurveyApi`].
///
/// Holds a seedable hierarchy and asset store, computes a span length
/// for every created pole, and records detail updates and material
/// submissions so tests can assert on what was sent.
#[derive(Clone, Default)]
pub struct InMemorySurveyApi {
    inner: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    divisions: Vec<Division>,
    subdivisions: HashMap<DivisionId, Vec<Subdivision>>,
    feeders: HashMap<SubdivisionId, Vec<Feeder>>,
    transformers: Vec<Transformer>,
    poles: HashMap<TransformerId, Vec<Pole>>,
    pole_details: HashMap<PoleId, PoleDetail>,
    catalogs: QuestionCatalogs,
    submissions: HashMap<PoleId, (PoleType, BTreeMap<String, String>)>,
    span_length: f64,
    failures: HashSet<String>,
}

impl InMemorySurveyApi {
    /// Create an empty backend. Created poles report the given span
    /// length.
    pub fn new(span_length: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(State {
                span_length,
                ..State::default()
            })),
        }
    }

    // ── Seeding ──────────────────────────────────────────────────────

    pub async fn seed_division(&self, division: Division) {
        self.inner.write().await.divisions.push(division);
    }

    pub async fn seed_subdivision(&self, division: &DivisionId, subdivision: Subdivision) {
        self.inner
            .write()
            .await
            .subdivisions
            .entry(division.clone())
            .or_default()
            .push(subdivision);
    }

    pub async fn seed_feeder(&self, subdivision: &SubdivisionId, feeder: Feeder) {
        self.inner
            .write()
            .await
            .feeders
            .entry(subdivision.clone())
            .or_default()
            .push(feeder);
    }

    pub async fn seed_transformer(&self, transformer: Transformer) {
        self.inner.write().await.transformers.push(transformer);
    }

    pub async fn seed_pole(&self, tc_id: &TransformerId, pole: Pole) {
        self.inner
            .write()
            .await
            .poles
            .entry(tc_id.clone())
            .or_default()
            .push(pole);
    }

    pub async fn seed_catalogs(&self, catalogs: QuestionCatalogs) {
        self.inner.write().await.catalogs = catalogs;
    }

    pub async fn set_span_length(&self, span_length: f64) {
        self.inner.write().await.span_length = span_length;
    }

    /// Make the next call to the named operation fail with a server
    /// error. Used to exercise failure paths in engine tests.
    pub async fn fail_once(&self, operation: &str) {
        self.inner
            .write()
            .await
            .failures
            .insert(operation.to_string());
    }

    async fn check_failure(&self, operation: &str) -> ApiResult<()> {
        if self.inner.write().await.failures.remove(operation) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("injected failure: {}", operation),
            });
        }
        Ok(())
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The detail recorded for a pole, if the patch has happened
    pub async fn detail_for(&self, pole_id: &PoleId) -> Option<PoleDetail> {
        self.inner.read().await.pole_details.get(pole_id).copied()
    }

    /// The material submission recorded for a pole
    pub async fn submission_for(
        &self,
        pole_id: &PoleId,
    ) -> Option<(PoleType, BTreeMap<String, String>)> {
        self.inner.read().await.submissions.get(pole_id).cloned()
    }

    /// Number of transformers currently stored
    pub async fn transformer_count(&self) -> usize {
        self.inner.read().await.transformers.len()
    }
}

#[async_trait]
impl SurveyApi for InMemorySurveyApi {
    async fn divisions(&self) -> ApiResult<Vec<Division>> {
        self.check_failure("divisions").await?;
        Ok(self.inner.read().await.divisions.clone())
    }

    async fn subdivisions(&self, division: &DivisionId) -> ApiResult<Vec<Subdivision>> {
        self.check_failure("subdivisions").await?;
        Ok(self
            .inner
            .read()
            .await
            .subdivisions
            .get(division)
            .cloned()
            .unwrap_or_default())
    }

    async fn feeders(
        &self,
        _division: &DivisionId,
        subdivision: &SubdivisionId,
    ) -> ApiResult<Vec<Feeder>> {
        self.check_failure("feeders").await?;
        Ok(self
            .inner
            .read()
            .await
            .feeders
            .get(subdivision)
            .cloned()
            .unwrap_or_default())
    }

    async fn transformers(&self) -> ApiResult<Vec<Transformer>> {
        self.check_failure("transformers").await?;
        Ok(self.inner.read().await.transformers.clone())
    }

    async fn create_transformer(&self, new: &NewTransformer) -> ApiResult<Transformer> {
        self.check_failure("create_transformer").await?;
        let transformer = Transformer {
            id: TransformerId::new(Uuid::new_v4().to_string()),
            tc_number: new.tc_number.clone(),
            tc_name: new.tc_name.clone(),
            capacity: new.capacity.clone(),
            lat: new.lat,
            long: new.long,
            feeder_id: new.feeder_id.clone(),
            created_at: Some(chrono::Utc::now()),
        };
        self.inner
            .write()
            .await
            .transformers
            .push(transformer.clone());
        Ok(transformer)
    }

    async fn poles(&self, tc_id: &TransformerId) -> ApiResult<Vec<Pole>> {
        self.check_failure("poles").await?;
        Ok(self
            .inner
            .read()
            .await
            .poles
            .get(tc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pole(&self, new: &NewPole) -> ApiResult<PoleCreated> {
        self.check_failure("create_pole").await?;
        let mut state = self.inner.write().await;
        if !state.transformers.iter().any(|t| t.id == new.tc_id) {
            return Err(ApiError::NotFound(format!(
                "Transformer {} not found",
                new.tc_id
            )));
        }
        let pole_id = PoleId::new(Uuid::new_v4().to_string());
        let span_length = state.span_length;
        state.poles.entry(new.tc_id.clone()).or_default().push(Pole {
            id: pole_id.clone(),
            pole_number: new.pole_number.clone(),
        });
        Ok(PoleCreated {
            pole_id,
            span_length,
        })
    }

    async fn update_pole_detail(&self, pole_id: &PoleId, detail: &PoleDetail) -> ApiResult<()> {
        self.check_failure("update_pole_detail").await?;
        let mut state = self.inner.write().await;
        let known = state
            .poles
            .values()
            .any(|poles| poles.iter().any(|p| &p.id == pole_id));
        if !known {
            return Err(ApiError::NotFound(format!("Pole {} not found", pole_id)));
        }
        state.pole_details.insert(pole_id.clone(), *detail);
        Ok(())
    }

    async fn question_catalogs(&self) -> ApiResult<QuestionCatalogs> {
        self.check_failure("question_catalogs").await?;
        Ok(self.inner.read().await.catalogs.clone())
    }

    async fn submit_material_info(
        &self,
        pole_id: &PoleId,
        pole_type: PoleType,
        answers: &BTreeMap<String, String>,
    ) -> ApiResult<()> {
        self.check_failure("submit_material_info").await?;
        self.inner
            .write()
            .await
            .submissions
            .insert(pole_id.clone(), (pole_type, answers.clone()));
        Ok(())
    }
}
