//! HTTP client for the survey service

use crate::api::SurveyApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use survey_types::{
    Division, DivisionId, Feeder, NewPole, NewTransformer, Pole, PoleCreated, PoleDetail, PoleId,
    PoleType, QuestionCatalogs, Subdivision, SubdivisionId, Transformer, TransformerId,
};

/// HTTP client for communicating with the survey service.
///
/// All calls after [`HttpSurveyApi::login`] carry the bearer token from
/// the login exchange.
pub struct HttpSurveyApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    number: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    phone: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// `GET /transformer` response wrapper
#[derive(Debug, Deserialize)]
struct TransformerList {
    tcs: Vec<Transformer>,
}

/// `GET /poles` response wrapper
#[derive(Debug, Deserialize)]
struct PoleList {
    pole_numbers: Vec<Pole>,
}

/// One row of the `GET /questions` response. The service returns two
/// rows, one carrying the existing-pole catalog and one the
/// newly-proposed catalog.
#[derive(Debug, Default, Deserialize)]
struct QuestionCatalogRow {
    #[serde(default, rename = "existingQuestions")]
    existing_questions: Vec<String>,
    #[serde(default, rename = "proposedQuestion")]
    proposed_questions: Vec<String>,
}

impl HttpSurveyApi {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("base_url must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Exchange credentials for a bearer token used on all subsequent
    /// calls
    pub async fn login(&mut self, number: &str, password: &str) -> ApiResult<()> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { number, password })
            .send()
            .await?;
        let login: TokenResponse = self.handle_response(response).await?;
        self.token = Some(login.token);
        Ok(())
    }

    /// Create an account and log in with the returned token
    pub async fn register(&mut self, phone: &str, password: &str) -> ApiResult<()> {
        let url = format!("{}/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest { phone, password })
            .send()
            .await?;
        let registered: TokenResponse = self.handle_response(response).await?;
        self.token = Some(registered.token);
        Ok(())
    }

    /// Drop the bearer token
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// Whether a login exchange has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ========== Internal HTTP helpers ==========

    fn authorize(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::RequestBuilder> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ApiError::NotAuthenticated),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.authorize(self.client.get(&url))?.send().await?;
        self.handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorize(self.client.post(&url).json(body))?
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// POST where the success body is discarded; a 200/204 with an
    /// empty body counts as success
    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorize(self.client.post(&url).json(body))?
            .send()
            .await?;
        self.check_status(response).await
    }

    /// PATCH counterpart of [`HttpSurveyApi::post_unit`]
    async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorize(self.client.patch(&url).json(body))?
            .send()
            .await?;
        self.check_status(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_for(response).await)
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> ApiResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }

    async fn error_for(response: reqwest::Response) -> ApiError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound("Resource not found".into())
        } else {
            let message = response.text().await.unwrap_or_default();
            ApiError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl SurveyApi for HttpSurveyApi {
    async fn divisions(&self) -> ApiResult<Vec<Division>> {
        self.get("/recommendations/division").await
    }

    async fn subdivisions(&self, division: &DivisionId) -> ApiResult<Vec<Subdivision>> {
        self.get(&format!("/recommendations/subdivision?division={}", division))
            .await
    }

    async fn feeders(
        &self,
        division: &DivisionId,
        subdivision: &SubdivisionId,
    ) -> ApiResult<Vec<Feeder>> {
        self.get(&format!(
            "/recommendations/feeder?division={}&subdivision={}",
            division, subdivision
        ))
        .await
    }

    async fn transformers(&self) -> ApiResult<Vec<Transformer>> {
        let list: TransformerList = self.get("/transformer").await?;
        Ok(list.tcs)
    }

    async fn create_transformer(&self, new: &NewTransformer) -> ApiResult<Transformer> {
        self.post("/transformer", new).await
    }

    async fn poles(&self, tc_id: &TransformerId) -> ApiResult<Vec<Pole>> {
        let list: PoleList = self.get(&format!("/poles?tc_id={}", tc_id)).await?;
        Ok(list.pole_numbers)
    }

    async fn create_pole(&self, new: &NewPole) -> ApiResult<PoleCreated> {
        self.post("/pole", new).await
    }

    async fn update_pole_detail(&self, pole_id: &PoleId, detail: &PoleDetail) -> ApiResult<()> {
        self.patch_unit(&format!("/pole?pole_id={}", pole_id), detail)
            .await
    }

    async fn question_catalogs(&self) -> ApiResult<QuestionCatalogs> {
        let rows: Vec<QuestionCatalogRow> = self.get("/questions").await?;
        let mut catalogs = QuestionCatalogs::default();
        for row in rows {
            if !row.existing_questions.is_empty() {
                catalogs.existing = row.existing_questions;
            }
            if !row.proposed_questions.is_empty() {
                catalogs.new_proposed = row.proposed_questions;
            }
        }
        Ok(catalogs)
    }

    async fn submit_material_info(
        &self,
        pole_id: &PoleId,
        pole_type: PoleType,
        answers: &BTreeMap<String, String>,
    ) -> ApiResult<()> {
        self.post_unit(
            &format!("/material-info/{}?poleType={}", pole_id, pole_type),
            answers,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoint_normalization_trims_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:5000/api/".into(),
            ..ClientConfig::default()
        };
        let api = HttpSurveyApi::new(&config).unwrap();
        assert_eq!(api.base_url, "http://localhost:5000/api");
        assert!(!api.is_authenticated());
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let config = ClientConfig {
            base_url: "  ".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpSurveyApi::new(&config),
            Err(ApiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn requests_before_login_are_rejected() {
        let api = HttpSurveyApi::new(&ClientConfig::default()).unwrap();
        // Fails locally; nothing is sent
        assert!(matches!(
            api.divisions().await,
            Err(ApiError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn register_sets_the_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t1"})),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        let mut api = HttpSurveyApi::new(&config).unwrap();
        assert!(!api.is_authenticated());
        api.register("9990001111", "secret").await.unwrap();
        assert!(api.is_authenticated());
    }

    #[tokio::test]
    async fn empty_mutation_bodies_are_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t0"})),
            )
            .mount(&server)
            .await;
        // The service answers both mutations without a body
        Mock::given(method("PATCH"))
            .and(path("/pole"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/material-info/P1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        let mut api = HttpSurveyApi::new(&config).unwrap();
        api.login("9990001111", "secret").await.unwrap();

        api.update_pole_detail(
            &PoleId::new("P1"),
            &PoleDetail {
                span_length: 42.0,
                sag: 5.0,
            },
        )
        .await
        .unwrap();

        let mut answers = BTreeMap::new();
        answers.insert("Height".to_string(), "12m".to_string());
        api.submit_material_info(&PoleId::new("P1"), PoleType::Existing, &answers)
            .await
            .unwrap();
    }

    #[test]
    fn question_rows_fold_into_catalogs() {
        let rows: Vec<QuestionCatalogRow> = serde_json::from_str(
            r#"[
                {"existingQuestions": ["Height", "Type of Arrangement"]},
                {"proposedQuestion": ["Soil Type"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows[0].existing_questions.len(), 2);
        assert_eq!(rows[1].proposed_questions, ["Soil Type"]);
    }
}
