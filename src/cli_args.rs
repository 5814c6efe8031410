use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::str::FromStr;

use crate::feedback::{AnalysisType, FeedbackSize};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "quality-checker",
    version,
    about = "LLM-assisted code quality review for GitHub files and commits"
)]
pub struct Cli {
    /// How much feedback to ask for
    #[arg(long, value_enum, default_value_t = FeedbackSize::Concise, global = true)]
    pub size: FeedbackSize,

    /// LLM provider (otherwise QUALITY_CHECKER_PROVIDER, the config file, or gemini)
    #[arg(long, value_enum, global = true)]
    pub provider: Option<Provider>,

    /// Model name to use (e.g. gemini-2.0-flash, gpt-5-nano, llama3.2)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key for the LLM provider (otherwise GEMINI_API_KEY / OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// GitHub token, needed for private repositories and higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    /// Fail when the report's quality score is below this value
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), global = true)]
    pub min_score: Option<u8>,

    /// Do not draw the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, e.g. `quality-checker commit owner/repo <sha>`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a single file, addressed by its blob SHA
    File {
        /// Repository as owner/repo
        repo: RepoRef,

        /// Blob SHA of the file
        sha: String,
    },

    /// Review a commit, addressed by its commit SHA
    Commit {
        /// Repository as owner/repo
        repo: RepoRef,

        /// Commit SHA
        sha: String,
    },
}

impl Command {
    pub fn target(&self) -> (AnalysisType, &RepoRef, &str) {
        match self {
            Command::File { repo, sha } => (AnalysisType::File, repo, sha),
            Command::Commit { repo, sha } => (AnalysisType::Commit, repo, sha),
        }
    }
}

/// Supported LLM providers. Exactly one is used per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }

    /// Environment variable holding the provider's API key, if it needs one.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Ollama => None,
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Provider as ValueEnum>::from_str(s.trim(), true)
    }
}

/// A GitHub repository reference in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || "Invalid repository format. Use owner/repo format".to_string();
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
