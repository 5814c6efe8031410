use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{truncate, LlmClient};
use crate::http;

pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    stream: bool,
    messages: Vec<OllamaMessage>,
    options: OllamaOptions,
}

/// Ollama client using /api/chat.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let req_body = ChatRequest {
            model: self.model.clone(),
            stream: false,
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            options: OllamaOptions {
                num_predict: self.max_tokens,
            },
        };

        let body_str = serde_json::to_string(&req_body)
            .map_err(|e| anyhow!("Failed to encode Ollama JSON request: {e}"))?;

        log::trace!("Ollama request body: {}", truncate(&body_str, 3000));

        let url = format!("{}/api/chat", self.base_url);
        log::info!("Calling Ollama model {:?} at {url}", self.model);

        let request = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str);

        let reply = http::execute(request, cancel)
            .await
            .with_context(|| format!("Error calling Ollama at {url}"))?
            .ensure_success("Ollama")?;

        log::trace!("Ollama raw JSON response: {}", reply.body);

        let parsed: OllamaChatResponse = serde_json::from_str(&reply.body)
            .map_err(|e| anyhow!("Failed to decode Ollama JSON: {e}"))?;

        Ok(parsed.message.content)
    }
}
