use crate::cli_args::{Cli, Provider};
use crate::github;
use crate::llm::{gemini, ollama, openai};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Final resolved configuration for quality-checker.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub model: String,
    /// `None` only for providers that need no key.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--provider`, `--model`, `--api-key`, `--github-token`)
    ///   2. Env vars (`QUALITY_CHECKER_PROVIDER`, `QUALITY_CHECKER_MODEL`, provider key)
    ///   3. TOML `~/.config/quality-checker.toml`
    ///   4. Provider defaults
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = load_file_config()?.unwrap_or_default();
        Self::resolve(cli, |name| env::var(name).ok(), file_cfg)
    }

    pub fn resolve(
        cli: &Cli,
        env_var: impl Fn(&str) -> Option<String>,
        file_cfg: FileConfig,
    ) -> Result<Self> {
        let provider = match cli.provider {
            Some(p) => p,
            None => match env_var("QUALITY_CHECKER_PROVIDER") {
                Some(name) => name.parse().map_err(|e: String| anyhow!(e))?,
                None => file_cfg.provider.unwrap_or_default(),
            },
        };

        let model = cli
            .model
            .clone()
            .or_else(|| env_var("QUALITY_CHECKER_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| default_model(provider).to_string());

        let api_key = match provider.api_key_env() {
            Some(key_env) => Some(
                cli.api_key
                    .clone()
                    .or_else(|| env_var(key_env))
                    .or(file_cfg.api_key)
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        anyhow!("{key_env} must be set via env var, --api-key or the config file")
                    })?,
            ),
            None => None,
        };

        let github_token = cli
            .github_token
            .clone()
            .or_else(|| env_var("GITHUB_TOKEN"))
            .or(file_cfg.github_token);

        Ok(Config {
            provider,
            model,
            api_key,
            api_base_url: file_cfg
                .api_base_url
                .unwrap_or_else(|| default_base_url(provider).to_string()),
            github_token,
            github_api_url: file_cfg
                .github_api_url
                .unwrap_or_else(|| github::DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(file_cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

fn default_model(provider: Provider) -> &'static str {
    match provider {
        Provider::Gemini => gemini::DEFAULT_MODEL,
        Provider::OpenAi => openai::DEFAULT_MODEL,
        Provider::Ollama => ollama::DEFAULT_MODEL,
    }
}

fn default_base_url(provider: Provider) -> &'static str {
    match provider {
        Provider::Gemini => gemini::DEFAULT_BASE_URL,
        Provider::OpenAi => openai::DEFAULT_BASE_URL,
        Provider::Ollama => ollama::DEFAULT_BASE_URL,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub provider: Option<Provider>,
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Return `~/.config/quality-checker.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("quality-checker.toml"))
}

fn load_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg = toml::from_str::<FileConfig>(&data)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(Some(cfg))
}
