//! Top-level survey workflow orchestrator
//!
//! Owns the stage machine and composes the cascade, creation branch
//! and question pool. Operations are guarded by the current stage;
//! calling one out of stage returns [`SurveyError::Stage`] without
//! side effects. Stage transitions happen only after the underlying
//! operation succeeds, so a failure leaves the surveyor exactly where
//! they were and the action can be retried in place.

use survey_client::SurveyApi;
use survey_location::{LocationAcquirer, PositionProvider};
use survey_types::{
    ConnectorKind, DivisionId, FeederId, PoleStatus, PreviousConnector, SubdivisionId, SurveyError,
    SurveyResult, SurveyStage, Transformer, TransformerId,
};

use crate::branch::{CreationController, PendingPoleDetail, PoleForm, TransformerForm};
use crate::cascade::HierarchyCascade;
use crate::questionnaire::QuestionPool;

/// Drives one surveyor session through the guided flow
pub struct SurveyOrchestrator<A, P> {
    api: A,
    locator: LocationAcquirer<P>,
    stage: SurveyStage,
    cascade: HierarchyCascade,
    creation: Option<CreationController>,
    pole_form: Option<PoleForm>,
    pending_detail: Option<PendingPoleDetail>,
    pool: Option<QuestionPool>,
}

impl<A: SurveyApi, P: PositionProvider> SurveyOrchestrator<A, P> {
    pub fn new(api: A, provider: P) -> Self {
        Self {
            api,
            locator: LocationAcquirer::new(provider),
            stage: SurveyStage::SelectingHierarchy,
            cascade: HierarchyCascade::new(),
            creation: None,
            pole_form: None,
            pending_detail: None,
            pool: None,
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn stage(&self) -> SurveyStage {
        self.stage
    }

    pub fn cascade(&self) -> &HierarchyCascade {
        &self.cascade
    }

    pub fn creation(&self) -> Option<&CreationController> {
        self.creation.as_ref()
    }

    pub fn pole_form(&self) -> Option<&PoleForm> {
        self.pole_form.as_ref()
    }

    pub fn question_pool(&self) -> Option<&QuestionPool> {
        self.pool.as_ref()
    }

    /// Server-computed span length of the pole awaiting its detail
    pub fn span_length(&self) -> SurveyResult<f64> {
        self.expect_stage(SurveyStage::PoleDetail)?;
        self.pending_detail
            .as_ref()
            .map(PendingPoleDetail::span_length)
            .ok_or(SurveyError::Stage(self.stage))
    }

    fn expect_stage(&self, stage: SurveyStage) -> SurveyResult<()> {
        if self.stage != stage {
            return Err(SurveyError::Stage(self.stage));
        }
        Ok(())
    }

    // ── Hierarchy selection ──────────────────────────────────────────

    /// Load the division options and open the hierarchy step
    pub async fn start(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::SelectingHierarchy)?;
        self.cascade.load_divisions(&self.api).await
    }

    pub async fn choose_division(&mut self, id: DivisionId) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::SelectingHierarchy)?;
        self.cascade.choose_division(&self.api, id).await
    }

    pub async fn choose_subdivision(&mut self, id: SubdivisionId) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::SelectingHierarchy)?;
        self.cascade.choose_subdivision(&self.api, id).await
    }

    /// Complete the hierarchy. Loads the feeder's TC list and moves to
    /// the branch choice.
    pub async fn choose_feeder(&mut self, id: FeederId) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::SelectingHierarchy)?;
        self.cascade.select_feeder(id.clone())?;
        let creation = CreationController::load(&self.api, id).await?;
        self.creation = Some(creation);
        self.stage = SurveyStage::ChoosingBranch;
        tracing::info!(stage = %self.stage, "Hierarchy selection complete");
        Ok(())
    }

    /// Abandon the current feeder and restart the hierarchy selection
    /// with freshly fetched divisions. Existing state is replaced only
    /// once the fetch succeeds.
    pub async fn change_feeder(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::ChoosingBranch)?;
        let mut cascade = HierarchyCascade::new();
        cascade.load_divisions(&self.api).await?;
        self.cascade = cascade;
        self.creation = None;
        self.pole_form = None;
        self.stage = SurveyStage::SelectingHierarchy;
        Ok(())
    }

    // ── Branch choice ────────────────────────────────────────────────

    pub fn begin_transformer(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::ChoosingBranch)?;
        self.stage = SurveyStage::CreatingTransformer;
        Ok(())
    }

    pub fn begin_pole(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::ChoosingBranch)?;
        self.pole_form = Some(PoleForm::default());
        self.stage = SurveyStage::CreatingPole;
        Ok(())
    }

    /// Back out of either creation form without submitting
    pub fn cancel_creation(&mut self) -> SurveyResult<()> {
        match self.stage {
            SurveyStage::CreatingTransformer | SurveyStage::CreatingPole => {
                self.pole_form = None;
                self.stage = SurveyStage::ChoosingBranch;
                Ok(())
            }
            _ => Err(SurveyError::Stage(self.stage)),
        }
    }

    // ── Transformer creation ─────────────────────────────────────────

    pub async fn submit_transformer(&mut self, form: &TransformerForm) -> SurveyResult<Transformer> {
        self.expect_stage(SurveyStage::CreatingTransformer)?;
        let creation = self
            .creation
            .as_mut()
            .ok_or(SurveyError::Stage(SurveyStage::CreatingTransformer))?;
        let created = creation
            .create_transformer(&self.api, &self.locator, form)
            .await?;
        self.stage = SurveyStage::ChoosingBranch;
        Ok(created)
    }

    // ── Pole creation ────────────────────────────────────────────────

    pub fn set_pole_tc(&mut self, tc_id: TransformerId) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        let creation = self
            .creation
            .as_mut()
            .ok_or(SurveyError::Stage(SurveyStage::CreatingPole))?;
        if !creation.transformers().iter().any(|t| t.id == tc_id) {
            return Err(SurveyError::UnknownOption(tc_id.to_string()));
        }
        // Any previously fetched connector poles belonged to the old
        // TC; drop them along with the chosen reference
        creation.reset_connector_scope();
        if let Some(form) = self.pole_form.as_mut() {
            form.tc_id = Some(tc_id);
            form.connector = None;
        }
        Ok(())
    }

    pub fn set_pole_number(&mut self, number: impl Into<String>) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        if let Some(form) = self.pole_form.as_mut() {
            form.pole_number = number.into();
        }
        Ok(())
    }

    pub fn set_pole_status(&mut self, status: PoleStatus) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        if let Some(form) = self.pole_form.as_mut() {
            form.status = status;
        }
        Ok(())
    }

    pub async fn choose_connector_kind(&mut self, kind: ConnectorKind) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        let (creation, form) = match (self.creation.as_mut(), self.pole_form.as_mut()) {
            (Some(creation), Some(form)) => (creation, form),
            _ => return Err(SurveyError::Stage(SurveyStage::CreatingPole)),
        };
        creation.choose_connector_kind(&self.api, kind, form).await
    }

    pub fn choose_connector(&mut self, connector: PreviousConnector) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        let (creation, form) = match (self.creation.as_ref(), self.pole_form.as_mut()) {
            (Some(creation), Some(form)) => (creation, form),
            _ => return Err(SurveyError::Stage(SurveyStage::CreatingPole)),
        };
        creation.choose_connector(form, connector)
    }

    /// Create the pole and open the span/sag detail step
    pub async fn submit_pole(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::CreatingPole)?;
        let (creation, form) = match (self.creation.as_ref(), self.pole_form.as_ref()) {
            (Some(creation), Some(form)) => (creation, form),
            _ => return Err(SurveyError::Stage(SurveyStage::CreatingPole)),
        };
        let pending = creation.create_pole(&self.api, &self.locator, form).await?;
        self.pending_detail = Some(pending);
        self.pole_form = None;
        self.stage = SurveyStage::PoleDetail;
        Ok(())
    }

    /// Attach the sag to the created pole, then open its material
    /// questionnaire. A failed update keeps the detail step open; the
    /// pole is not re-created on retry.
    pub async fn submit_detail(&mut self, sag: f64) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::PoleDetail)?;
        let pending = self
            .pending_detail
            .as_ref()
            .ok_or(SurveyError::Stage(SurveyStage::PoleDetail))?;
        pending.submit_detail(&self.api, sag).await?;
        let pool =
            QuestionPool::load(&self.api, pending.pole_id().clone(), pending.pole_type()).await?;
        self.pool = Some(pool);
        self.pending_detail = None;
        self.stage = SurveyStage::AnsweringMaterial;
        Ok(())
    }

    // ── Material questionnaire ───────────────────────────────────────

    pub fn add_answer(&mut self, question: &str, answer: &str) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::AnsweringMaterial)?;
        let pool = self
            .pool
            .as_mut()
            .ok_or(SurveyError::Stage(SurveyStage::AnsweringMaterial))?;
        pool.add_answer(question, answer)
    }

    pub fn remove_answer(&mut self, question: &str) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::AnsweringMaterial)?;
        let pool = self
            .pool
            .as_mut()
            .ok_or(SurveyError::Stage(SurveyStage::AnsweringMaterial))?;
        pool.remove_answer(question)
    }

    /// Post the answers and return to the branch choice for the next
    /// asset under the same feeder
    pub async fn submit_material(&mut self) -> SurveyResult<()> {
        self.expect_stage(SurveyStage::AnsweringMaterial)?;
        let pool = self
            .pool
            .as_ref()
            .ok_or(SurveyError::Stage(SurveyStage::AnsweringMaterial))?;
        pool.submit(&self.api).await?;
        self.pool = None;
        self.stage = SurveyStage::ChoosingBranch;
        tracing::info!(stage = %self.stage, "Pole survey complete");
        Ok(())
    }
}
