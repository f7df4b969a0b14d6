//! Survey workflow engine
//!
//! Drives the multi-step field-survey flow for electrical-distribution
//! assets: administrative hierarchy selection, transformer/pole
//! creation, the conditional span/sag detail step, and the material
//! questionnaire.
//!
//! # Architecture
//!
//! The [`SurveyOrchestrator`] composes specialized components:
//!
//! - [`HierarchyCascade`] — the Division → Subdivision → Feeder
//!   dependent-selection chain, with generation-stamped tickets that
//!   drop stale fetch results.
//! - [`CreationController`] — the transformer/pole creation branch,
//!   including previous-connector resolution and the create-then-patch
//!   pole detail protocol.
//! - [`QuestionPool`] — the consumable material-question pool, owning
//!   both the available set and the answered mapping.
//!
//! Remote access goes through the `SurveyApi` trait from
//! `survey-client`; device positions come from a `PositionProvider`
//! via `survey-location`. Every transition is driven by a success
//! path; a failed operation returns an error and leaves the stage
//! unchanged.

#![deny(unsafe_code)]

pub mod branch;
pub mod cascade;
pub mod orchestrator;
pub mod questionnaire;

pub use branch::{CreationController, PendingPoleDetail, PoleForm, TransformerForm};
pub use cascade::{HierarchyCascade, SelectionTicket};
pub use orchestrator::SurveyOrchestrator;
pub use questionnaire::QuestionPool;
