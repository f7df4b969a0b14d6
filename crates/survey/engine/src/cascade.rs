//! Hierarchical selector cascade: Division → Subdivision → Feeder
//!
//! Each level exposes an option list and a selection. Selecting level
//! *n* clears every deeper level's selection and options, then the
//! child option list is refetched scoped to the new value.
//!
//! Selection and option installation are separate steps joined by a
//! generation-stamped [`SelectionTicket`]: `select_*` bumps the
//! cascade's generation and returns a ticket, and `apply_*` installs
//! fetched options only if the ticket's generation is still current.
//! A response arriving for an abandoned selection is dropped instead
//! of overwriting the active one.

use survey_client::SurveyApi;
use survey_types::{
    Division, DivisionId, Feeder, FeederId, Subdivision, SubdivisionId, SurveyError, SurveyResult,
};

/// Proof of a specific selection, used to reject stale fetch results
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
}

/// The three-level dependent-selection chain
#[derive(Clone, Debug, Default)]
pub struct HierarchyCascade {
    divisions: Vec<Division>,
    subdivisions: Vec<Subdivision>,
    feeders: Vec<Feeder>,
    selected_division: Option<DivisionId>,
    selected_subdivision: Option<SubdivisionId>,
    selected_feeder: Option<FeederId>,
    generation: u64,
}

impl HierarchyCascade {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Option lists and selections ──────────────────────────────────

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn subdivisions(&self) -> &[Subdivision] {
        &self.subdivisions
    }

    pub fn feeders(&self) -> &[Feeder] {
        &self.feeders
    }

    pub fn selected_division(&self) -> Option<&DivisionId> {
        self.selected_division.as_ref()
    }

    pub fn selected_subdivision(&self) -> Option<&SubdivisionId> {
        self.selected_subdivision.as_ref()
    }

    pub fn selected_feeder(&self) -> Option<&FeederId> {
        self.selected_feeder.as_ref()
    }

    /// Complete only when all three levels have a selection
    pub fn is_complete(&self) -> bool {
        self.selected_division.is_some()
            && self.selected_subdivision.is_some()
            && self.selected_feeder.is_some()
    }

    // ── Initialization ───────────────────────────────────────────────

    /// Fetch the division options. Done once, unconditionally, when the
    /// cascade is initialized.
    pub async fn load_divisions<A: SurveyApi>(&mut self, api: &A) -> SurveyResult<()> {
        self.divisions = api.divisions().await.map_err(SurveyError::remote)?;
        Ok(())
    }

    // ── Reducer steps ────────────────────────────────────────────────

    /// Select a division, clearing both descendant levels. The child
    /// option fetch must be applied through the returned ticket.
    pub fn select_division(&mut self, id: DivisionId) -> SurveyResult<SelectionTicket> {
        if !self.divisions.iter().any(|d| d.id == id) {
            return Err(SurveyError::UnknownOption(id.to_string()));
        }
        self.selected_division = Some(id);
        self.selected_subdivision = None;
        self.selected_feeder = None;
        self.subdivisions.clear();
        self.feeders.clear();
        self.generation += 1;
        Ok(SelectionTicket {
            generation: self.generation,
        })
    }

    /// Install subdivision options fetched for the ticketed selection.
    /// Returns false (and changes nothing) if the selection has been
    /// superseded since the ticket was issued.
    pub fn apply_subdivisions(
        &mut self,
        ticket: &SelectionTicket,
        options: Vec<Subdivision>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Dropping stale subdivision options");
            return false;
        }
        self.subdivisions = options;
        true
    }

    /// Select a subdivision, clearing the feeder level
    pub fn select_subdivision(&mut self, id: SubdivisionId) -> SurveyResult<SelectionTicket> {
        if self.selected_division.is_none() {
            return Err(SurveyError::Validation("No division selected".into()));
        }
        if !self.subdivisions.iter().any(|s| s.id == id) {
            return Err(SurveyError::UnknownOption(id.to_string()));
        }
        self.selected_subdivision = Some(id);
        self.selected_feeder = None;
        self.feeders.clear();
        self.generation += 1;
        Ok(SelectionTicket {
            generation: self.generation,
        })
    }

    /// Install feeder options fetched for the ticketed selection
    pub fn apply_feeders(&mut self, ticket: &SelectionTicket, options: Vec<Feeder>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Dropping stale feeder options");
            return false;
        }
        self.feeders = options;
        true
    }

    /// Select a feeder. No deeper level to invalidate; completion is
    /// reported through [`HierarchyCascade::is_complete`].
    pub fn select_feeder(&mut self, id: FeederId) -> SurveyResult<()> {
        if self.selected_subdivision.is_none() {
            return Err(SurveyError::Validation("No subdivision selected".into()));
        }
        if !self.feeders.iter().any(|f| f.id == id) {
            return Err(SurveyError::UnknownOption(id.to_string()));
        }
        self.selected_feeder = Some(id);
        Ok(())
    }

    // ── Drivers (select → fetch → apply) ─────────────────────────────

    /// Select a division and refetch its subdivisions. On fetch failure
    /// the subdivision level is left empty; re-selecting the division
    /// retries.
    pub async fn choose_division<A: SurveyApi>(
        &mut self,
        api: &A,
        id: DivisionId,
    ) -> SurveyResult<()> {
        let ticket = self.select_division(id.clone())?;
        let options = api.subdivisions(&id).await.map_err(SurveyError::remote)?;
        self.apply_subdivisions(&ticket, options);
        Ok(())
    }

    /// Select a subdivision and refetch its feeders
    pub async fn choose_subdivision<A: SurveyApi>(
        &mut self,
        api: &A,
        id: SubdivisionId,
    ) -> SurveyResult<()> {
        let ticket = self.select_subdivision(id.clone())?;
        let division = self
            .selected_division
            .clone()
            .ok_or_else(|| SurveyError::Validation("No division selected".into()))?;
        let options = api
            .feeders(&division, &id)
            .await
            .map_err(SurveyError::remote)?;
        self.apply_feeders(&ticket, options);
        Ok(())
    }
}
