use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, TextProvider};
use crate::config::ProviderConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

/// Google Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiService {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    temperature: Option<f32>,
}

impl GeminiService {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.api_base, config.model
            ),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl TextProvider for GeminiService {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "calling gemini");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let reply: GenerateContentResponse = response.json().await?;
        reply_text(reply)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Joins the text parts of the first candidate.
fn reply_text(reply: GenerateContentResponse) -> Result<String, ProviderError> {
    let text: String = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}
