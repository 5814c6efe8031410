use super::{truncate, LlmClient};
use crate::http;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
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
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

/// Google Gemini client using the `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base_url: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(GeminiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            max_tokens,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        log::trace!("Gemini prompt:\n{}", truncate(prompt, 3000));

        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_tokens,
            },
        };

        log::info!("Calling Gemini model {:?} (max {} tokens)", self.model, self.max_tokens);

        let request = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&req);

        let reply = http::execute(request, cancel)
            .await
            .context("failed to send request to Gemini")?
            .ensure_success("Gemini")?;

        let parsed: GenerateResponse =
            serde_json::from_str(&reply.body).context("failed to parse Gemini response")?;

        if let Some(usage) = &parsed.usage_metadata {
            log::info!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_token_count.unwrap_or_default(),
                usage.candidates_token_count.unwrap_or_default(),
                usage.total_token_count.unwrap_or_default()
            );
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no candidates returned from Gemini"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(anyhow!("Gemini returned an empty candidate"));
        }
        Ok(text)
    }
}
