//! Error taxonomy for the survey workflow
//!
//! Validation failures never reach the server; remote failures are
//! surfaced in place and retried only by repeating the user action.
//! None of these abort the workflow or force a restart from the
//! hierarchy step.

use crate::{PoleId, SurveyStage};

/// Errors that can occur while driving the survey workflow
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// A required field is missing or malformed — blocks submission
    /// locally, never sent to the server
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Both location acquisition tiers failed; the create step must
    /// not proceed
    #[error("Device location unavailable")]
    LocationUnavailable,

    /// Network or server error on a fetch, create or update
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// The pole exists server-side but the span/sag update failed.
    /// Not rolled back; the update may be retried from the open popup.
    #[error("Pole {pole_id} created but detail update failed: {reason}")]
    PartialSubmission { pole_id: PoleId, reason: String },

    /// An id was selected that is not in the fetched option list
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// The question is not in the available pool (already answered,
    /// or not part of the loaded catalog)
    #[error("Question not available: {0}")]
    QuestionNotAvailable(String),

    /// No answer recorded for this question
    #[error("No answer recorded for question: {0}")]
    AnswerNotFound(String),

    /// The operation is not valid in the current workflow stage
    #[error("Operation not available in stage '{0}'")]
    Stage(SurveyStage),
}

impl SurveyError {
    /// Wrap a transport-level failure message
    pub fn remote(err: impl std::fmt::Display) -> Self {
        SurveyError::Remote(err.to_string())
    }
}

/// Result type for survey workflow operations
pub type SurveyResult<T> = Result<T, SurveyError>;
