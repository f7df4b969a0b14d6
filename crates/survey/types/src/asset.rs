//! Distribution assets: transformers (TCs) and poles
//!
//! A transformer is created once per workflow run and is immutable
//! thereafter. A pole follows a create-then-patch protocol: the create
//! call returns a server-computed span length, and a second mutation
//! adds the surveyor-entered sag alongside it.

use crate::FeederId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a transformer (TC)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformerId(pub String);

impl TransformerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TransformerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a pole
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoleId(pub String);

impl PoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Geolocation ──────────────────────────────────────────────────────

/// A device position captured at submission time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ── Transformers ─────────────────────────────────────────────────────

/// A transformer record as returned by the remote service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transformer {
    pub id: TransformerId,
    pub tc_number: String,
    pub tc_name: String,
    /// Rated capacity, free text as entered by the surveyor
    pub capacity: String,
    pub lat: f64,
    pub long: f64,
    pub feeder_id: FeederId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a transformer under a feeder
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTransformer {
    pub tc_number: String,
    pub tc_name: String,
    pub capacity: String,
    pub lat: f64,
    pub long: f64,
    pub feeder_id: FeederId,
}

// ── Poles ────────────────────────────────────────────────────────────

/// Whether a surveyed pole already stands in the field or is newly
/// proposed. The flag decides which material-question catalog applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoleStatus {
    Existing,
    New,
}

impl PoleStatus {
    pub fn is_existing(&self) -> bool {
        matches!(self, PoleStatus::Existing)
    }
}

/// The kind of asset a new pole is chained from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    #[serde(rename = "tc")]
    Transformer,
    Pole,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Transformer => "tc",
            ConnectorKind::Pole => "pole",
        }
    }
}

impl std::fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The asset a new pole is physically connected from — another
/// transformer or another pole. Changing the kind invalidates the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PreviousConnector {
    #[serde(rename = "tc")]
    Transformer(TransformerId),
    Pole(PoleId),
}

impl PreviousConnector {
    pub fn kind(&self) -> ConnectorKind {
        match self {
            PreviousConnector::Transformer(_) => ConnectorKind::Transformer,
            PreviousConnector::Pole(_) => ConnectorKind::Pole,
        }
    }

    /// The raw connector id for the wire payload
    pub fn id_str(&self) -> &str {
        match self {
            PreviousConnector::Transformer(id) => &id.0,
            PreviousConnector::Pole(id) => &id.0,
        }
    }
}

/// A pole record in listing form (previous-connector options)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pole {
    pub id: PoleId,
    pub pole_number: String,
}

/// Payload for creating a pole under a transformer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPole {
    pub tc_id: TransformerId,
    pub pole_number: String,
    pub is_existing: bool,
    pub previous_connector_type: ConnectorKind,
    pub previous_connector_id: String,
    pub lat: f64,
    pub long: f64,
}

/// Response to a pole create call. The span length is computed
/// server-side and redisplayed read-only in the detail step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoleCreated {
    pub pole_id: PoleId,
    pub span_length: f64,
}

/// The second, conditional pole mutation: the server-computed span
/// length together with the surveyor-entered sag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoleDetail {
    pub span_length: f64,
    pub sag: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_kind_wire_tags() {
        assert_eq!(ConnectorKind::Transformer.as_str(), "tc");
        assert_eq!(ConnectorKind::Pole.as_str(), "pole");
        assert_eq!(
            serde_json::to_string(&ConnectorKind::Transformer).unwrap(),
            "\"tc\""
        );
    }

    #[test]
    fn previous_connector_kind_and_id() {
        let conn = PreviousConnector::Transformer(TransformerId::new("T1"));
        assert_eq!(conn.kind(), ConnectorKind::Transformer);
        assert_eq!(conn.id_str(), "T1");

        let conn = PreviousConnector::Pole(PoleId::new("P9"));
        assert_eq!(conn.kind(), ConnectorKind::Pole);
        assert_eq!(conn.id_str(), "P9");
    }

    #[test]
    fn new_pole_serializes_wire_field_names() {
        let payload = NewPole {
            tc_id: TransformerId::new("T1"),
            pole_number: "PN-7".into(),
            is_existing: false,
            previous_connector_type: ConnectorKind::Transformer,
            previous_connector_id: "T1".into(),
            lat: 12.5,
            long: 77.6,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tc_id"], "T1");
        assert_eq!(json["is_existing"], false);
        assert_eq!(json["previous_connector_type"], "tc");
        assert_eq!(json["lat"], 12.5);
    }

    #[test]
    fn pole_status_flag() {
        assert!(PoleStatus::Existing.is_existing());
        assert!(!PoleStatus::New.is_existing());
    }
}
