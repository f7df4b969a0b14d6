//! The remote-service seam the workflow engine is generic over

use crate::error::ApiResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use survey_types::{
    Division, DivisionId, Feeder, NewPole, NewTransformer, Pole, PoleCreated, PoleDetail, PoleId,
    PoleType, QuestionCatalogs, Subdivision, SubdivisionId, Transformer, TransformerId,
};

/// Query and mutation endpoints of the remote survey service
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// List all divisions
    async fn divisions(&self) -> ApiResult<Vec<Division>>;

    /// List subdivisions scoped to a division
    async fn subdivisions(&self, division: &DivisionId) -> ApiResult<Vec<Subdivision>>;

    /// List feeders scoped to a division and subdivision
    async fn feeders(
        &self,
        division: &DivisionId,
        subdivision: &SubdivisionId,
    ) -> ApiResult<Vec<Feeder>>;

    /// List transformers for the current feeder context
    async fn transformers(&self) -> ApiResult<Vec<Transformer>>;

    /// Create a transformer under a feeder
    async fn create_transformer(&self, new: &NewTransformer) -> ApiResult<Transformer>;

    /// List poles under a transformer
    async fn poles(&self, tc_id: &TransformerId) -> ApiResult<Vec<Pole>>;

    /// Create a pole. The response carries the server-computed span
    /// length for the detail step.
    async fn create_pole(&self, new: &NewPole) -> ApiResult<PoleCreated>;

    /// Second pole mutation: attach span length and sag to an already
    /// created pole
    async fn update_pole_detail(&self, pole_id: &PoleId, detail: &PoleDetail) -> ApiResult<()>;

    /// Fetch both status-scoped material question catalogs
    async fn question_catalogs(&self) -> ApiResult<QuestionCatalogs>;

    /// Post the folded question→answer mapping for a pole
    async fn submit_material_info(
        &self,
        pole_id: &PoleId,
        pole_type: PoleType,
        answers: &BTreeMap<String, String>,
    ) -> ApiResult<()>;
}
