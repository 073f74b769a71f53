//! Language model clients used for task labels.

use crate::error::{ReminderError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A text-completion backend. Implementations make exactly one attempt per
/// call; retries are not wanted here.
#[async_trait]
pub trait TaskModel: Send + Sync {
    /// Raw reply text for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Google Generative Language REST client.
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Entry of the model listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Resource name, `models/<id>`.
    pub name: String,
    /// Human-readable name.
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    /// API methods the model accepts, e.g. `generateContent`.
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ListModelsPage {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

impl GeminiModel {
    /// Client for `model`; a `models/` prefix on the name is accepted.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReminderError::ExtractionDegraded(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.trim_start_matches("models/").to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Points the client at another endpoint, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// All models visible to the API key, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .query(&[("key", self.api_key.as_str())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(status_error(status));
            }

            let page: ListModelsPage = response
                .json()
                .await
                .map_err(|e| ReminderError::ExtractionDegraded(format!("bad listing: {e}")))?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl TaskModel for GeminiModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.0,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReminderError::ExtractionDegraded(format!("bad response body: {e}")))?;

        reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| ReminderError::ExtractionDegraded("no candidates in reply".into()))
    }
}

fn transport_error(e: reqwest::Error) -> ReminderError {
    if e.is_timeout() {
        ReminderError::ExtractionDegraded("request timed out".into())
    } else if e.is_connect() {
        ReminderError::ExtractionDegraded("could not connect to model API".into())
    } else {
        ReminderError::ExtractionDegraded(format!("HTTP request failed: {e}"))
    }
}

fn status_error(status: StatusCode) -> ReminderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        ReminderError::ExtractionDegraded("rate limited by model API".into())
    } else {
        ReminderError::ExtractionDegraded(format!("model API returned HTTP {status}"))
    }
}
