//! Material questionnaire types
//!
//! The remote service publishes two disjoint question catalogs, one for
//! existing poles and one for newly-proposed poles. The workflow picks
//! the subset by the pole's status flag at fetch time — the catalogs are
//! never merged.

use serde::{Deserialize, Serialize};

/// The distinguished question whose answer is constrained to an
/// arrangement phase instead of free text.
pub const ARRANGEMENT_QUESTION: &str = "Type of Arrangement";

/// Pole-type discriminator attached to a material submission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoleType {
    Existing,
    NewProposed,
}

impl PoleType {
    /// Wire tag used in the `poleType` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            PoleType::Existing => "existing",
            PoleType::NewProposed => "new_proposed",
        }
    }

    /// Derive the discriminator from a pole's status flag
    pub fn from_is_existing(is_existing: bool) -> Self {
        if is_existing {
            PoleType::Existing
        } else {
            PoleType::NewProposed
        }
    }
}

impl std::fmt::Display for PoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Allowed answers for the "Type of Arrangement" question
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrangementPhase {
    #[serde(rename = "3Ph")]
    ThreePhase,
    #[serde(rename = "1Ph")]
    SinglePhase,
}

impl ArrangementPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrangementPhase::ThreePhase => "3Ph",
            ArrangementPhase::SinglePhase => "1Ph",
        }
    }

    /// Parse a submitted answer; anything other than the two phase
    /// tags is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "3Ph" => Some(ArrangementPhase::ThreePhase),
            "1Ph" => Some(ArrangementPhase::SinglePhase),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArrangementPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two status-scoped question catalogs, fetched together
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalogs {
    pub existing: Vec<String>,
    pub new_proposed: Vec<String>,
}

impl QuestionCatalogs {
    /// The catalog subset relevant to the given pole type
    pub fn for_type(&self, pole_type: PoleType) -> &[String] {
        match pole_type {
            PoleType::Existing => &self.existing,
            PoleType::NewProposed => &self.new_proposed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_type_wire_tags() {
        assert_eq!(PoleType::Existing.as_str(), "existing");
        assert_eq!(PoleType::NewProposed.as_str(), "new_proposed");
        assert_eq!(PoleType::from_is_existing(true), PoleType::Existing);
        assert_eq!(PoleType::from_is_existing(false), PoleType::NewProposed);
    }

    #[test]
    fn arrangement_parse_accepts_only_phase_tags() {
        assert_eq!(
            ArrangementPhase::parse("3Ph"),
            Some(ArrangementPhase::ThreePhase)
        );
        assert_eq!(
            ArrangementPhase::parse("1Ph"),
            Some(ArrangementPhase::SinglePhase)
        );
        assert_eq!(ArrangementPhase::parse("2Ph"), None);
        assert_eq!(ArrangementPhase::parse(""), None);
    }

    #[test]
    fn catalogs_select_by_type() {
        let catalogs = QuestionCatalogs {
            existing: vec!["Height".into()],
            new_proposed: vec!["Soil Type".into()],
        };
        assert_eq!(catalogs.for_type(PoleType::Existing), ["Height"]);
        assert_eq!(catalogs.for_type(PoleType::NewProposed), ["Soil Type"]);
    }
}
