//! Two-tier location acquisition

use crate::provider::{PositionProvider, PositionRequest};
use std::time::Duration;
use survey_types::{GeoPoint, SurveyError, SurveyResult};

/// Tier 1: high-accuracy mode, 15-second timeout, 10-second maximum
/// cached position age.
const HIGH_ACCURACY: PositionRequest = PositionRequest {
    high_accuracy: true,
    timeout: Duration::from_secs(15),
    maximum_age: Duration::from_secs(10),
};

/// Tier 2: high accuracy disabled, 10-second timeout, same maximum age.
const LOW_ACCURACY: PositionRequest = PositionRequest {
    high_accuracy: false,
    timeout: Duration::from_secs(10),
    maximum_age: Duration::from_secs(10),
};

/// Acquires a device position with the two-tier accuracy fallback.
///
/// Each tier's timeout is enforced here with `tokio::time::timeout`, so
/// a hung provider cannot stall the workflow. A tier that times out has
/// its future dropped before the next tier starts, which guarantees at
/// most one tier ever resolves the acquisition.
pub struct LocationAcquirer<P> {
    provider: P,
}

impl<P: PositionProvider> LocationAcquirer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Obtain a device position, or `LocationUnavailable` if both
    /// tiers fail.
    pub async fn acquire(&self) -> SurveyResult<GeoPoint> {
        match self.try_tier(HIGH_ACCURACY).await {
            Ok(point) => Ok(point),
            Err(reason) => {
                tracing::warn!(%reason, "High-accuracy position failed, retrying without");
                match self.try_tier(LOW_ACCURACY).await {
                    Ok(point) => Ok(point),
                    Err(reason) => {
                        tracing::warn!(%reason, "Low-accuracy position failed");
                        Err(SurveyError::LocationUnavailable)
                    }
                }
            }
        }
    }

    async fn try_tier(&self, request: PositionRequest) -> Result<GeoPoint, String> {
        match tokio::time::timeout(request.timeout, self.provider.current_position(request)).await {
            Ok(Ok(point)) => Ok(point),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err("request timed out".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{PositionError, PositionResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: one canned response per expected call, in
    /// order. A `Hang` response never resolves on its own.
    struct ScriptedProvider {
        script: Mutex<Vec<Step>>,
        calls: Mutex<Vec<PositionRequest>>,
    }

    enum Step {
        Respond(PositionResult),
        Hang,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Step>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<PositionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PositionProvider for ScriptedProvider {
        async fn current_position(&self, request: PositionRequest) -> PositionResult {
            self.calls.lock().unwrap().push(request);
            let step = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    None
                } else {
                    Some(script.remove(0))
                }
            };
            match step {
                Some(Step::Respond(result)) => result,
                Some(Step::Hang) | None => {
                    // Sleep far past any tier timeout; the acquirer's
                    // own timeout drops this future first.
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(PositionError::Timeout)
                }
            }
        }
    }

    fn point() -> GeoPoint {
        GeoPoint::new(12.97, 77.59)
    }

    #[tokio::test]
    async fn first_tier_success_skips_fallback() {
        let provider = ScriptedProvider::new(vec![Step::Respond(Ok(point()))]);
        let acquirer = LocationAcquirer::new(provider);

        let got = acquirer.acquire().await.unwrap();
        assert_eq!(got, point());

        let calls = acquirer.provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].high_accuracy);
        assert_eq!(calls[0].timeout, Duration::from_secs(15));
        assert_eq!(calls[0].maximum_age, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn high_accuracy_timeout_falls_back_exactly_once() {
        let provider = ScriptedProvider::new(vec![Step::Hang, Step::Respond(Ok(point()))]);
        let acquirer = LocationAcquirer::new(provider);

        let got = acquirer.acquire().await.unwrap();
        assert_eq!(got, point());

        let calls = acquirer.provider.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].high_accuracy);
        assert!(!calls[1].high_accuracy);
        assert_eq!(calls[1].timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn provider_error_triggers_fallback() {
        let provider = ScriptedProvider::new(vec![
            Step::Respond(Err(PositionError::PermissionDenied)),
            Step::Respond(Ok(point())),
        ]);
        let acquirer = LocationAcquirer::new(provider);

        assert!(acquirer.acquire().await.is_ok());
        assert_eq!(acquirer.provider.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn both_tiers_failing_is_location_unavailable() {
        let provider = ScriptedProvider::new(vec![
            Step::Respond(Err(PositionError::Unavailable("no fix".into()))),
            Step::Hang,
        ]);
        let acquirer = LocationAcquirer::new(provider);

        let err = acquirer.acquire().await.unwrap_err();
        assert!(matches!(err, SurveyError::LocationUnavailable));
        assert_eq!(acquirer.provider.calls().len(), 2);
    }
}
