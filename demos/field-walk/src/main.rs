//! Scripted field-survey walk against the in-memory backend.
//!
//! Seeds a small administrative hierarchy, then drives the full flow:
//! hierarchy selection, transformer creation, pole creation with the
//! span/sag detail step, and the material questionnaire.

use async_trait::async_trait;
use survey_client::InMemorySurveyApi;
use survey_engine::{SurveyOrchestrator, TransformerForm};
use survey_location::{PositionError, PositionProvider, PositionRequest};
use survey_types::{
    Division, DivisionId, Feeder, FeederId, GeoPoint, PoleStatus, PreviousConnector,
    QuestionCatalogs, Subdivision, SubdivisionId, SurveyError, ARRANGEMENT_QUESTION,
};

/// Stand-in for the platform geolocation service
struct DemoProvider;

#[async_trait]
impl PositionProvider for DemoProvider {
    async fn current_position(&self, _request: PositionRequest) -> Result<GeoPoint, PositionError> {
        Ok(GeoPoint::new(12.9716, 77.5946))
    }
}

async fn seed(api: &InMemorySurveyApi) {
    api.seed_division(Division {
        id: DivisionId::new("D1"),
        name: "North Division".into(),
    })
    .await;
    api.seed_subdivision(
        &DivisionId::new("D1"),
        Subdivision {
            id: SubdivisionId::new("S1"),
            name: "North-East Subdivision".into(),
        },
    )
    .await;
    api.seed_feeder(
        &SubdivisionId::new("S1"),
        Feeder {
            id: FeederId::new("F1"),
            name: "Feeder One".into(),
        },
    )
    .await;
    api.seed_catalogs(QuestionCatalogs {
        existing: vec![
            "Height".into(),
            "Condition".into(),
            ARRANGEMENT_QUESTION.into(),
        ],
        new_proposed: vec!["Soil Type".into(), ARRANGEMENT_QUESTION.into()],
    })
    .await;
}

#[tokio::main]
async fn main() -> Result<(), SurveyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let api = InMemorySurveyApi::new(42.5);
    seed(&api).await;

    let mut flow = SurveyOrchestrator::new(api.clone(), DemoProvider);

    // Hierarchy
    flow.start().await?;
    flow.choose_division(DivisionId::new("D1")).await?;
    flow.choose_subdivision(SubdivisionId::new("S1")).await?;
    flow.choose_feeder(FeederId::new("F1")).await?;
    tracing::info!(stage = %flow.stage(), "Feeder selected");

    // Transformer branch
    flow.begin_transformer()?;
    let tc = flow
        .submit_transformer(&TransformerForm {
            tc_name: "Market Street TC".into(),
            tc_number: "TC-104".into(),
            capacity: "100kVA".into(),
        })
        .await?;
    tracing::info!(tc = %tc.id, tc_number = %tc.tc_number, "Transformer surveyed");

    // Pole branch, connected back to the new TC
    flow.begin_pole()?;
    flow.set_pole_tc(tc.id.clone())?;
    flow.set_pole_number("PN-1")?;
    flow.set_pole_status(PoleStatus::Existing)?;
    flow.choose_connector(PreviousConnector::Transformer(tc.id.clone()))?;
    flow.submit_pole().await?;
    tracing::info!(span_length = flow.span_length()?, "Pole created");

    flow.submit_detail(5.2).await?;

    // Material questionnaire
    flow.add_answer("Height", "12m")?;
    flow.add_answer("Condition", "Good")?;
    flow.add_answer(ARRANGEMENT_QUESTION, "3Ph")?;
    flow.submit_material().await?;
    tracing::info!(stage = %flow.stage(), "Survey complete, ready for the next asset");

    Ok(())
}
