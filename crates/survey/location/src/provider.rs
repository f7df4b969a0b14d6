//! Position provider trait — the seam to the platform geolocation service

use async_trait::async_trait;
use std::time::Duration;
use survey_types::GeoPoint;

/// Parameters for a single position request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionRequest {
    /// Request GNSS-grade accuracy instead of network positioning
    pub high_accuracy: bool,
    /// How long the provider may take before the request is abandoned
    pub timeout: Duration,
    /// Oldest cached fix the provider may return
    pub maximum_age: Duration,
}

/// Errors a position provider can report
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("Position request timed out")]
    Timeout,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Result type for position requests
pub type PositionResult = Result<GeoPoint, PositionError>;

/// A source of device positions
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Obtain the current device position under the given constraints
    async fn current_position(&self, request: PositionRequest) -> PositionResult;
}
