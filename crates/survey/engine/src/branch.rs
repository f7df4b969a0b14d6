//! Creation branch controller: transformer or pole, under one feeder
//!
//! Two mutually exclusive sub-flows, chosen by explicit user action.
//! The transformer form posts in a single create call; the pole form
//! follows a create-then-patch protocol — the create response carries
//! a server-computed span length, redisplayed read-only while the
//! surveyor enters the sag, and a second mutation attaches both to the
//! already-created pole.

use survey_client::SurveyApi;
use survey_location::{LocationAcquirer, PositionProvider};
use survey_types::{
    ConnectorKind, FeederId, NewPole, NewTransformer, Pole, PoleDetail, PoleId, PoleStatus,
    PoleType, PreviousConnector, SurveyError, SurveyResult, Transformer, TransformerId,
};

// ── Forms ────────────────────────────────────────────────────────────

/// Transformer creation form. All fields required.
#[derive(Clone, Debug, Default)]
pub struct TransformerForm {
    pub tc_name: String,
    pub tc_number: String,
    pub capacity: String,
}

impl TransformerForm {
    fn validate(&self) -> SurveyResult<()> {
        for (value, field) in [
            (&self.tc_name, "TC Name"),
            (&self.tc_number, "TC Number"),
            (&self.capacity, "Capacity"),
        ] {
            if value.trim().is_empty() {
                return Err(SurveyError::Validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

/// Pole creation form. Validity requires all four fields set.
#[derive(Clone, Debug)]
pub struct PoleForm {
    /// Owning transformer, drawn from the feeder's TC list
    pub tc_id: Option<TransformerId>,
    pub pole_number: String,
    pub status: PoleStatus,
    pub connector: Option<PreviousConnector>,
}

impl Default for PoleForm {
    fn default() -> Self {
        Self {
            tc_id: None,
            pole_number: String::new(),
            status: PoleStatus::New,
            connector: None,
        }
    }
}

impl PoleForm {
    fn validate(&self) -> SurveyResult<(TransformerId, PreviousConnector)> {
        let tc_id = self
            .tc_id
            .clone()
            .ok_or_else(|| SurveyError::Validation("TC Number is required".into()))?;
        if self.pole_number.trim().is_empty() {
            return Err(SurveyError::Validation("Pole Number is required".into()));
        }
        let connector = self
            .connector
            .clone()
            .ok_or_else(|| SurveyError::Validation("Previous connector is required".into()))?;
        Ok((tc_id, connector))
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Drives asset creation under one selected feeder
#[derive(Clone, Debug)]
pub struct CreationController {
    feeder_id: FeederId,
    transformers: Vec<Transformer>,
    connector_kind: ConnectorKind,
    connector_poles: Vec<Pole>,
}

impl CreationController {
    /// Load the feeder's transformer list and start at the branch
    /// choice
    pub async fn load<A: SurveyApi>(api: &A, feeder_id: FeederId) -> SurveyResult<Self> {
        let transformers = api.transformers().await.map_err(SurveyError::remote)?;
        Ok(Self {
            feeder_id,
            transformers,
            connector_kind: ConnectorKind::Transformer,
            connector_poles: Vec::new(),
        })
    }

    pub fn feeder_id(&self) -> &FeederId {
        &self.feeder_id
    }

    /// The feeder's TC list: the TC-number options, and the connector
    /// options while the connector kind is `Transformer`
    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    pub fn connector_kind(&self) -> ConnectorKind {
        self.connector_kind
    }

    /// Connector options while the kind is `Pole`, scoped to the
    /// form's selected TC
    pub fn connector_poles(&self) -> &[Pole] {
        &self.connector_poles
    }

    // ── Transformer sub-flow ─────────────────────────────────────────

    /// Validate the form, stamp it with the device position and issue
    /// the create call. On failure the form keeps its entered values;
    /// on success the new TC joins the option list for subsequent
    /// poles.
    pub async fn create_transformer<A: SurveyApi, P: PositionProvider>(
        &mut self,
        api: &A,
        locator: &LocationAcquirer<P>,
        form: &TransformerForm,
    ) -> SurveyResult<Transformer> {
        form.validate()?;
        let position = locator.acquire().await?;

        let new = NewTransformer {
            tc_number: form.tc_number.clone(),
            tc_name: form.tc_name.clone(),
            capacity: form.capacity.clone(),
            lat: position.latitude,
            long: position.longitude,
            feeder_id: self.feeder_id.clone(),
        };
        let created = api
            .create_transformer(&new)
            .await
            .map_err(SurveyError::remote)?;
        tracing::info!(tc = %created.id, feeder = %self.feeder_id, "Transformer created");
        self.transformers.push(created.clone());
        Ok(created)
    }

    // ── Pole sub-flow ────────────────────────────────────────────────

    /// Drop connector options scoped to a previously selected TC. The
    /// kind falls back to `Transformer`; choosing kind `Pole` again
    /// refetches the pole options scoped to the new TC.
    pub fn reset_connector_scope(&mut self) {
        self.connector_kind = ConnectorKind::Transformer;
        self.connector_poles.clear();
    }

    /// Switch the previous-connector kind. The previously chosen
    /// reference id is always cleared; kind `Pole` refetches the pole
    /// options scoped to the form's current TC.
    pub async fn choose_connector_kind<A: SurveyApi>(
        &mut self,
        api: &A,
        kind: ConnectorKind,
        form: &mut PoleForm,
    ) -> SurveyResult<()> {
        form.connector = None;
        self.connector_kind = kind;
        match kind {
            ConnectorKind::Transformer => {
                self.connector_poles.clear();
                Ok(())
            }
            ConnectorKind::Pole => {
                let tc_id = form
                    .tc_id
                    .clone()
                    .ok_or_else(|| SurveyError::Validation("TC Number is required".into()))?;
                self.connector_poles = api.poles(&tc_id).await.map_err(SurveyError::remote)?;
                Ok(())
            }
        }
    }

    /// Pick the previous-connector reference from the current option
    /// list
    pub fn choose_connector(
        &self,
        form: &mut PoleForm,
        connector: PreviousConnector,
    ) -> SurveyResult<()> {
        if connector.kind() != self.connector_kind {
            return Err(SurveyError::Validation(
                "Connector does not match the selected kind".into(),
            ));
        }
        let known = match &connector {
            PreviousConnector::Transformer(id) => self.transformers.iter().any(|t| &t.id == id),
            PreviousConnector::Pole(id) => self.connector_poles.iter().any(|p| &p.id == id),
        };
        if !known {
            return Err(SurveyError::UnknownOption(connector.id_str().to_string()));
        }
        form.connector = Some(connector);
        Ok(())
    }

    /// Validate the form, stamp it with the device position and issue
    /// the create call. The response opens the span/sag detail step.
    pub async fn create_pole<A: SurveyApi, P: PositionProvider>(
        &self,
        api: &A,
        locator: &LocationAcquirer<P>,
        form: &PoleForm,
    ) -> SurveyResult<PendingPoleDetail> {
        let (tc_id, connector) = form.validate()?;
        if !self.transformers.iter().any(|t| t.id == tc_id) {
            return Err(SurveyError::UnknownOption(tc_id.to_string()));
        }
        let position = locator.acquire().await?;

        let new = NewPole {
            tc_id,
            pole_number: form.pole_number.clone(),
            is_existing: form.status.is_existing(),
            previous_connector_type: connector.kind(),
            previous_connector_id: connector.id_str().to_string(),
            lat: position.latitude,
            long: position.longitude,
        };
        let created = api.create_pole(&new).await.map_err(SurveyError::remote)?;
        tracing::info!(pole = %created.pole_id, span_length = created.span_length, "Pole created");
        Ok(PendingPoleDetail {
            pole_id: created.pole_id,
            span_length: created.span_length,
            pole_type: PoleType::from_is_existing(form.status.is_existing()),
        })
    }
}

// ── Detail step ──────────────────────────────────────────────────────

/// A created pole awaiting its span/sag detail update.
///
/// The pole already exists server-side; a failed update leaves this
/// handle open so the patch can be retried without re-creating the
/// pole.
#[derive(Clone, Debug)]
pub struct PendingPoleDetail {
    pole_id: PoleId,
    span_length: f64,
    pole_type: PoleType,
}

impl PendingPoleDetail {
    pub fn pole_id(&self) -> &PoleId {
        &self.pole_id
    }

    /// Server-computed span length, redisplayed read-only
    pub fn span_length(&self) -> f64 {
        self.span_length
    }

    /// Which material catalog applies once the detail is in
    pub fn pole_type(&self) -> PoleType {
        self.pole_type
    }

    /// Issue the span/sag update keyed by the created pole id
    pub async fn submit_detail<A: SurveyApi>(&self, api: &A, sag: f64) -> SurveyResult<()> {
        if !sag.is_finite() {
            return Err(SurveyError::Validation("Sag must be a number".into()));
        }
        let detail = PoleDetail {
            span_length: self.span_length,
            sag,
        };
        api.update_pole_detail(&self.pole_id, &detail)
            .await
            .map_err(|err| SurveyError::PartialSubmission {
                pole_id: self.pole_id.clone(),
                reason: err.to_string(),
            })?;
        tracing::info!(pole = %self.pole_id, sag, "Pole detail recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use survey_client::InMemorySurveyApi;
    use survey_location::{PositionError, PositionRequest};
    use survey_types::GeoPoint;

    struct FixedProvider(GeoPoint);

    #[async_trait]
    impl PositionProvider for FixedProvider {
        async fn current_position(
            &self,
            _request: PositionRequest,
        ) -> Result<GeoPoint, PositionError> {
            Ok(self.0)
        }
    }

    struct NoFixProvider;

    #[async_trait]
    impl PositionProvider for NoFixProvider {
        async fn current_position(
            &self,
            _request: PositionRequest,
        ) -> Result<GeoPoint, PositionError> {
            Err(PositionError::Unavailable("no satellites".into()))
        }
    }

    fn locator() -> LocationAcquirer<FixedProvider> {
        LocationAcquirer::new(FixedProvider(GeoPoint::new(12.97, 77.59)))
    }

    async fn api_with_transformer() -> (InMemorySurveyApi, TransformerId) {
        let api = InMemorySurveyApi::new(42.0);
        let created = api
            .create_transformer(&NewTransformer {
                tc_number: "TC-1".into(),
                tc_name: "North TC".into(),
                capacity: "100kVA".into(),
                lat: 0.0,
                long: 0.0,
                feeder_id: FeederId::new("F1"),
            })
            .await
            .unwrap();
        (api, created.id)
    }

    fn valid_pole_form(tc_id: &TransformerId) -> PoleForm {
        PoleForm {
            tc_id: Some(tc_id.clone()),
            pole_number: "PN-7".into(),
            status: PoleStatus::New,
            connector: Some(PreviousConnector::Transformer(tc_id.clone())),
        }
    }

    #[tokio::test]
    async fn transformer_form_requires_all_fields() {
        let (api, _) = api_with_transformer().await;
        let mut controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();

        let form = TransformerForm {
            tc_name: "New TC".into(),
            tc_number: String::new(),
            capacity: "63kVA".into(),
        };
        let err = controller
            .create_transformer(&api, &locator(), &form)
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::Validation(_)));
        // Nothing was sent
        assert_eq!(api.transformer_count().await, 1);
    }

    #[tokio::test]
    async fn transformer_create_stamps_location_and_joins_options() {
        let (api, _) = api_with_transformer().await;
        let mut controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();

        let form = TransformerForm {
            tc_name: "New TC".into(),
            tc_number: "TC-2".into(),
            capacity: "63kVA".into(),
        };
        let created = controller
            .create_transformer(&api, &locator(), &form)
            .await
            .unwrap();
        assert_eq!(created.lat, 12.97);
        assert_eq!(created.long, 77.59);
        assert_eq!(controller.transformers().len(), 2);
    }

    #[tokio::test]
    async fn location_failure_blocks_the_create_call() {
        let (api, tc_id) = api_with_transformer().await;
        let controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();
        let no_fix = LocationAcquirer::new(NoFixProvider);

        let err = controller
            .create_pole(&api, &no_fix, &valid_pole_form(&tc_id))
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::LocationUnavailable));
        assert!(api.poles(&tc_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn connector_kind_switch_clears_reference_and_fetches_poles() {
        let (api, tc_id) = api_with_transformer().await;
        api.seed_pole(
            &tc_id,
            Pole {
                id: PoleId::new("P0"),
                pole_number: "PN-0".into(),
            },
        )
        .await;

        let mut controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();
        let mut form = valid_pole_form(&tc_id);

        controller
            .choose_connector_kind(&api, ConnectorKind::Pole, &mut form)
            .await
            .unwrap();
        assert_eq!(form.connector, None);
        assert_eq!(controller.connector_poles().len(), 1);

        controller
            .choose_connector(&mut form, PreviousConnector::Pole(PoleId::new("P0")))
            .unwrap();

        // Switching back clears the chosen pole reference too
        controller
            .choose_connector_kind(&api, ConnectorKind::Transformer, &mut form)
            .await
            .unwrap();
        assert_eq!(form.connector, None);
        assert!(controller.connector_poles().is_empty());
    }

    #[tokio::test]
    async fn reset_scope_drops_pole_options_and_falls_back_to_tc_kind() {
        let (api, tc_id) = api_with_transformer().await;
        api.seed_pole(
            &tc_id,
            Pole {
                id: PoleId::new("P0"),
                pole_number: "PN-0".into(),
            },
        )
        .await;

        let mut controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();
        let mut form = valid_pole_form(&tc_id);
        controller
            .choose_connector_kind(&api, ConnectorKind::Pole, &mut form)
            .await
            .unwrap();
        assert_eq!(controller.connector_poles().len(), 1);

        controller.reset_connector_scope();
        assert_eq!(controller.connector_kind(), ConnectorKind::Transformer);
        assert!(controller.connector_poles().is_empty());
        assert!(matches!(
            controller.choose_connector(&mut form, PreviousConnector::Pole(PoleId::new("P0"))),
            Err(SurveyError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn connector_must_match_kind_and_options() {
        let (api, tc_id) = api_with_transformer().await;
        let controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();
        let mut form = valid_pole_form(&tc_id);

        // Kind is Transformer; a pole reference is rejected
        assert!(matches!(
            controller.choose_connector(&mut form, PreviousConnector::Pole(PoleId::new("P0"))),
            Err(SurveyError::Validation(_))
        ));
        // Unknown transformer id is rejected
        assert!(matches!(
            controller.choose_connector(
                &mut form,
                PreviousConnector::Transformer(TransformerId::new("T9"))
            ),
            Err(SurveyError::UnknownOption(_))
        ));
    }

    #[tokio::test]
    async fn pole_create_then_patch_records_detail() {
        let (api, tc_id) = api_with_transformer().await;
        let controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();

        let pending = controller
            .create_pole(&api, &locator(), &valid_pole_form(&tc_id))
            .await
            .unwrap();
        assert_eq!(pending.span_length(), 42.0);
        assert_eq!(pending.pole_type(), PoleType::NewProposed);

        pending.submit_detail(&api, 5.0).await.unwrap();
        let detail = api.detail_for(pending.pole_id()).await.unwrap();
        assert_eq!(detail.span_length, 42.0);
        assert_eq!(detail.sag, 5.0);
    }

    #[tokio::test]
    async fn failed_patch_is_partial_and_retryable() {
        let (api, tc_id) = api_with_transformer().await;
        let controller = CreationController::load(&api, FeederId::new("F1"))
            .await
            .unwrap();
        let pending = controller
            .create_pole(&api, &locator(), &valid_pole_form(&tc_id))
            .await
            .unwrap();

        api.fail_once("update_pole_detail").await;
        let err = pending.submit_detail(&api, 5.0).await.unwrap_err();
        assert!(matches!(err, SurveyError::PartialSubmission { .. }));
        assert_eq!(api.detail_for(pending.pole_id()).await, None);

        // The pole exists server-side; the patch retries cleanly
        pending.submit_detail(&api, 5.0).await.unwrap();
        assert!(api.detail_for(pending.pole_id()).await.is_some());
        assert_eq!(api.poles(&tc_id).await.unwrap().len(), 1);
    }
}
