//! Administrative hierarchy: Division → Subdivision → Feeder
//!
//! A subdivision is meaningful only in the context of a selected
//! division; a feeder only in the context of a selected subdivision.
//! Selecting a different parent invalidates all descendant selections.

use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a division
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DivisionId(pub String);

impl DivisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DivisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a subdivision
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubdivisionId(pub String);

impl SubdivisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SubdivisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a feeder — the lowest hierarchy level,
/// owning one or more transformers
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeederId(pub String);

impl FeederId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for FeederId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Option records ───────────────────────────────────────────────────

/// A selectable division
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
}

/// A selectable subdivision, scoped to a division
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub id: SubdivisionId,
    pub name: String,
}

/// A selectable feeder, scoped to a subdivision
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeder {
    pub id: FeederId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_through_json() {
        let id = FeederId::new("F1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"F1\"");
        let back: FeederId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_shows_raw_id() {
        assert_eq!(DivisionId::new("D1").to_string(), "D1");
    }
}
