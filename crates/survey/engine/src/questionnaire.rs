//! Consumable material-question pool
//!
//! Questions move between an available set and an answered mapping.
//! Answering consumes the question from the pool; removing an answer
//! returns it. The "Type of Arrangement" question only accepts a phase
//! tag; every other answer is free text.

use std::collections::BTreeMap;

use survey_client::SurveyApi;
use survey_types::{
    ArrangementPhase, PoleId, PoleType, SurveyError, SurveyResult, ARRANGEMENT_QUESTION,
};

/// Material questionnaire state for one created pole
#[derive(Clone, Debug)]
pub struct QuestionPool {
    pole_id: PoleId,
    pole_type: PoleType,
    available: Vec<String>,
    answered: BTreeMap<String, String>,
}

impl QuestionPool {
    /// Fetch the catalogs and open the pool scoped to the pole's type
    pub async fn load<A: SurveyApi>(
        api: &A,
        pole_id: PoleId,
        pole_type: PoleType,
    ) -> SurveyResult<Self> {
        let catalogs = api.question_catalogs().await.map_err(SurveyError::remote)?;
        Ok(Self {
            pole_id,
            pole_type,
            available: catalogs.for_type(pole_type).to_vec(),
            answered: BTreeMap::new(),
        })
    }

    pub fn pole_id(&self) -> &PoleId {
        &self.pole_id
    }

    pub fn pole_type(&self) -> PoleType {
        self.pole_type
    }

    /// Questions still open for answering
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Recorded question → answer pairs
    pub fn answered(&self) -> &BTreeMap<String, String> {
        &self.answered
    }

    /// Submission requires at least one recorded answer
    pub fn can_submit(&self) -> bool {
        !self.answered.is_empty()
    }

    /// Record an answer and consume the question from the pool
    pub fn add_answer(&mut self, question: &str, answer: &str) -> SurveyResult<()> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SurveyError::Validation("Answer must not be empty".into()));
        }
        let index = self
            .available
            .iter()
            .position(|q| q == question)
            .ok_or_else(|| SurveyError::QuestionNotAvailable(question.to_string()))?;
        if question == ARRANGEMENT_QUESTION && ArrangementPhase::parse(answer).is_none() {
            return Err(SurveyError::Validation(format!(
                "'{}' must be 3Ph or 1Ph",
                ARRANGEMENT_QUESTION
            )));
        }
        let question = self.available.remove(index);
        self.answered.insert(question, answer.to_string());
        Ok(())
    }

    /// Discard an answer and return its question to the pool
    pub fn remove_answer(&mut self, question: &str) -> SurveyResult<()> {
        if self.answered.remove(question).is_none() {
            return Err(SurveyError::AnswerNotFound(question.to_string()));
        }
        self.available.push(question.to_string());
        Ok(())
    }

    /// Post the answered map keyed by pole id and pole type. An empty
    /// map is rejected locally; no call is made.
    pub async fn submit<A: SurveyApi>(&self, api: &A) -> SurveyResult<()> {
        if !self.can_submit() {
            return Err(SurveyError::Validation(
                "At least one answer is required".into(),
            ));
        }
        api.submit_material_info(&self.pole_id, self.pole_type, &self.answered)
            .await
            .map_err(SurveyError::remote)?;
        tracing::info!(
            pole = %self.pole_id,
            pole_type = %self.pole_type,
            answers = self.answered.len(),
            "Material info submitted"
        );
        Ok(())
    }
}
