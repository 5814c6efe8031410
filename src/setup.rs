use anyhow::{anyhow, Result};
use log::debug;

use crate::analysis::AnalysisService;
use crate::cli_args::Provider;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::llm::gemini::GeminiClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::{ClientFactory, LlmClient};
use crate::repository::RepositoryService;

/// Factory that builds a fresh client for the configured provider on every call.
pub fn llm_client_factory(cfg: &Config) -> ClientFactory {
    let cfg = cfg.clone();
    Box::new(move |max_tokens: u32| build_llm_client(&cfg, max_tokens))
}

/// Build the LLM client for `cfg`, capped at `max_tokens` output tokens.
pub fn build_llm_client(cfg: &Config, max_tokens: u32) -> Result<Box<dyn LlmClient>> {
    debug!(
        "Using {} client with model {} (max {} tokens)",
        cfg.provider.as_str(),
        cfg.model,
        max_tokens
    );

    let key = || {
        cfg.api_key
            .clone()
            .ok_or_else(|| anyhow!("no API key configured for {}", cfg.provider.as_str()))
    };

    let client: Box<dyn LlmClient> = match cfg.provider {
        Provider::Gemini => Box::new(GeminiClient::new(
            key()?,
            cfg.model.clone(),
            cfg.api_base_url.clone(),
            max_tokens,
            cfg.timeout,
        )?),
        Provider::OpenAi => Box::new(OpenAiClient::new(
            key()?,
            cfg.model.clone(),
            cfg.api_base_url.clone(),
            max_tokens,
            cfg.timeout,
        )?),
        Provider::Ollama => Box::new(OllamaClient::new(
            cfg.api_base_url.clone(),
            cfg.model.clone(),
            max_tokens,
            cfg.timeout,
        )?),
    };
    Ok(client)
}

/// Wire GitHub access and content analysis together for one run.
pub fn build_repository_service(cfg: &Config) -> Result<RepositoryService> {
    let github = GitHubClient::new(cfg.github_token.clone(), cfg.github_api_url.clone(), cfg.timeout)?;
    let analysis = AnalysisService::new(llm_client_factory(cfg));
    Ok(RepositoryService::new(Box::new(github), Box::new(analysis)))
}
