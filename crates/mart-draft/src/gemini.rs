//! [`DraftingService`] over the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use mart_types::ImageData;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::DraftConfig;
use crate::error::{DraftError, DraftResult};
use crate::prompt;
use crate::service::{clean_name, DraftingService, PriceSuggestion};

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn image(image: &ImageData) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.payload().to_string(),
            }),
        }
    }
}

/// Concatenated text of the first candidate.
fn response_text(response: GenerateResponse) -> DraftResult<String> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| DraftError::MalformedResponse("no candidates in response".into()))?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(DraftError::MalformedResponse("response has no text".into()));
    }
    Ok(text)
}

/// Gemini REST client.
///
/// Constructing a client without an API key logs a warning; every call
/// then fails with [`DraftError::MissingCredential`] instead of reaching
/// the network.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: DraftConfig,
}

impl GeminiClient {
    pub fn new(config: DraftConfig) -> Self {
        if !config.is_enabled() {
            warn!("API_KEY is not set; product drafting is disabled");
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    #[instrument(skip(self, parts), fields(model = %self.config.model))]
    async fn generate(&self, parts: Vec<Part>) -> DraftResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(DraftError::MissingCredential)?;

        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };
        let response = self
            .http
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "drafting request rejected");
            return Err(DraftError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text = response_text(body)?;
        debug!(chars = text.chars().count(), "drafting response received");
        Ok(text)
    }
}

#[async_trait]
impl DraftingService for GeminiClient {
    async fn suggest_name(&self, image: &ImageData) -> DraftResult<String> {
        let text = self
            .generate(vec![Part::text(prompt::name_prompt()), Part::image(image)])
            .await?;
        Ok(clean_name(&text))
    }

    async fn suggest_description(&self, image: &ImageData, name: &str) -> DraftResult<String> {
        let text = self
            .generate(vec![
                Part::text(prompt::description_prompt(name)),
                Part::image(image),
            ])
            .await?;
        Ok(text.trim().to_string())
    }

    async fn suggest_price(&self, name: &str, description: &str) -> DraftResult<PriceSuggestion> {
        let text = self
            .generate(vec![Part::text(prompt::price_prompt(name, description))])
            .await?;
        let suggestion = PriceSuggestion::parse(text.trim());
        if suggestion.value().is_none() {
            warn!(response = %text.trim(), "no price found in drafting response");
        }
        Ok(suggestion)
    }
}
