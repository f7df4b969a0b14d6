//! Workflow stage: where the surveyor currently is in the guided flow
//!
//! Transitions are driven by the success paths of the engine
//! components; any component-reported failure leaves the stage
//! unchanged.

use serde::{Deserialize, Serialize};

/// The orchestrator's current stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStage {
    /// Selecting Division → Subdivision → Feeder
    SelectingHierarchy,
    /// Feeder chosen; deciding between creating a TC or a pole
    ChoosingBranch,
    /// Filling the transformer creation form
    CreatingTransformer,
    /// Filling the pole creation form
    CreatingPole,
    /// Pole created; span/sag detail popup open
    PoleDetail,
    /// Answering the material questionnaire for the created pole
    AnsweringMaterial,
}

impl std::fmt::Display for SurveyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SurveyStage::SelectingHierarchy => "selecting_hierarchy",
            SurveyStage::ChoosingBranch => "choosing_branch",
            SurveyStage::CreatingTransformer => "creating_transformer",
            SurveyStage::CreatingPole => "creating_pole",
            SurveyStage::PoleDetail => "pole_detail",
            SurveyStage::AnsweringMaterial => "answering_material",
        };
        write!(f, "{}", name)
    }
}
