//! Gemini-backed advisor adapter.
//!
//! One `generateContent` call per search: the prompt embeds the query, the
//! category labels, and the serialized catalog projection, and asks for a
//! JSON-only answer. Everything that can go wrong maps into a typed
//! [`AdvisorError`]; the resolver upstream treats them all as "advisor
//! unavailable".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::domain::ports::{Advice, AdviceRequest, AdvisorError, RecommendationSource};
use crate::outbound::body_preview;

use self::dto::{AdviceDto, GenerateContentResponseDto};

mod dto;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection settings for the Gemini API.
pub struct GeminiConfig {
    /// API key passed as the `key` query parameter.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Base endpoint up to the API version segment.
    pub endpoint: Url,
    /// Whole-request timeout applied to the HTTP client.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Default model, endpoint, and timeout with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            endpoint: default_endpoint(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT)
        .unwrap_or_else(|error| panic!("default Gemini endpoint failed to parse: {error}"))
}

/// Advisor adapter performing one POST per recommendation.
pub struct GeminiAdvisor {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAdvisor {
    /// Build the adapter and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_owned(),
            model: config.model,
            api_key: config.api_key,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{endpoint}/models/{model}:generateContent",
            endpoint = self.endpoint,
            model = self.model
        )
    }
}

#[async_trait]
impl RecommendationSource for GeminiAdvisor {
    async fn recommend(&self, request: &AdviceRequest) -> Result<Advice, AdvisorError> {
        let prompt = build_prompt(request)?;
        let body = json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let payload = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, payload.as_ref()));
        }

        let advice = decode_advice(payload.as_ref())?;
        debug!(
            category = advice.recommended_category.as_deref().unwrap_or("-"),
            suggested = advice.suggested_service_ids.len(),
            "advisor answered"
        );
        Ok(advice)
    }
}

/// Render the consultation prompt with the catalog projection inlined.
fn build_prompt(request: &AdviceRequest) -> Result<String, AdvisorError> {
    let categories = serde_json::to_string(request.categories())
        .map_err(|error| AdvisorError::decode(format!("category list failed to serialise: {error}")))?;
    let services = serde_json::to_string(request.services())
        .map_err(|error| AdvisorError::decode(format!("catalog projection failed to serialise: {error}")))?;

    Ok(format!(
        r#"You are a professional service consultant for "Service on Call".

User problem: "{query}"

Categories: {categories}
Services: {services}

Think about the user's problem, then recommend the best category and the
specific service ids that solve it. Explain which service can do what for
this particular problem. Answer with valid JSON only, matching:
{{ "recommendedCategory": string, "reasoning": string, "suggestedServiceIds": string[] }}"#,
        query = request.query(),
    ))
}

fn decode_advice(body: &[u8]) -> Result<Advice, AdvisorError> {
    let envelope: GenerateContentResponseDto = serde_json::from_slice(body)
        .map_err(|error| AdvisorError::decode(format!("invalid completion envelope: {error}")))?;
    let text = envelope
        .completion_text()
        .ok_or_else(|| AdvisorError::decode("completion carried no text"))?;
    let advice: AdviceDto = serde_json::from_str(&text)
        .map_err(|error| AdvisorError::decode(format!("completion is not advice JSON: {error}")))?;
    Ok(advice.into())
}

fn map_transport_error(error: reqwest::Error) -> AdvisorError {
    if error.is_timeout() {
        AdvisorError::timeout(error.to_string())
    } else {
        AdvisorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AdvisorError {
    let message = format!("status {}: {}", status.as_u16(), body_preview(body));
    match status {
        StatusCode::TOO_MANY_REQUESTS => AdvisorError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AdvisorError::timeout(message)
        }
        _ => AdvisorError::transport(message),
    }
}
