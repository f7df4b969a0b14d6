//! Device location acquisition for the survey workflow
//!
//! Asset creation stamps the record with the device position. Positions
//! come from a [`PositionProvider`] (the platform geolocation service,
//! abstracted behind a trait), and the [`LocationAcquirer`] wraps it in
//! a two-tier fallback:
//!
//! 1. High-accuracy mode, 15-second timeout, 10-second maximum cached
//!    position age.
//! 2. On failure, one retry with high accuracy disabled and a 10-second
//!    timeout.
//!
//! The first tier to succeed wins; both failing yields
//! `SurveyError::LocationUnavailable`, and the caller must not proceed
//! to submission.

#![deny(unsafe_code)]

mod acquirer;
mod provider;

pub use acquirer::LocationAcquirer;
pub use provider::{PositionError, PositionProvider, PositionRequest};
