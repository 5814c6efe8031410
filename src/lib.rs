//! Code quality reviews for GitHub files and commits, written by an LLM.
//!
//! [`repository::RepositoryService`] fetches a blob or a commit from GitHub and hands it to
//! [`analysis::AnalysisService`], which renders a prompt, calls the configured model and
//! cleans up the answer.

pub mod analysis;
pub mod cli_args;
pub mod commit;
pub mod config;
pub mod error;
pub mod feedback;
pub mod github;
pub mod http;
pub mod llm;
pub mod logging;
pub mod repository;
pub mod score;
pub mod setup;

pub use analysis::{AnalysisService, CodeAnalyzer, Progress};
pub use commit::{Change, CommitInfo};
pub use error::AnalysisError;
pub use feedback::{AnalysisType, FeedbackSize};
pub use repository::RepositoryService;
