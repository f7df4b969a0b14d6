//! Remote-service client for the gridsurvey workflow
//!
//! The engine talks to the remote survey service through the
//! [`SurveyApi`] trait. Two implementations are provided:
//!
//! - [`HttpSurveyApi`] — reqwest client against the production service,
//!   with a bearer-token login exchange.
//! - [`InMemorySurveyApi`] — in-memory backend for development and
//!   testing; computes span lengths for created poles and records
//!   material submissions.

#![deny(unsafe_code)]

mod api;
mod config;
mod error;
mod http;
mod memory;

pub use api::SurveyApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpSurveyApi;
pub use memory::InMemorySurveyApi;
