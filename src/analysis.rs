use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::commit::CommitInfo;
use crate::error::AnalysisError;
use crate::feedback::FeedbackSize;
use crate::http;
use crate::llm::{prompt_builder, ClientFactory};

/// Optional, best-effort progress sink. Values are percentages.
pub type Progress<'a> = Option<&'a (dyn Fn(u8) + Sync)>;

pub(crate) fn report(on_progress: Progress<'_>, value: u8) {
    if let Some(sink) = on_progress {
        sink(value);
    }
}

/// Turns normalized content into a model-written quality report.
#[async_trait]
pub trait CodeAnalyzer: Send + Sync {
    /// Review a single file. Emits 25, 30 and 80.
    async fn analyze_file(
        &self,
        code: &str,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError>;

    /// Review a commit. Emits 25, 30 and 90.
    async fn analyze_commit(
        &self,
        commit: &CommitInfo,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError>;
}

/// Content analysis backed by whichever provider the factory builds.
pub struct AnalysisService {
    factory: ClientFactory,
}

impl AnalysisService {
    pub fn new(factory: ClientFactory) -> Self {
        AnalysisService { factory }
    }

    /// Build a client for `size`, send `prompt`, format the answer.
    async fn run(
        &self,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
        render: impl FnOnce() -> String,
        done_at: u8,
    ) -> Result<String> {
        let model = (self.factory)(size.token_limit())?;
        report(on_progress, 25);

        let prompt = render();
        report(on_progress, 30);

        let raw = model.generate(&prompt, cancel).await?;
        report(on_progress, done_at);

        Ok(format_response(&raw))
    }
}

#[async_trait]
impl CodeAnalyzer for AnalysisService {
    async fn analyze_file(
        &self,
        code: &str,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        log::debug!("Analyzing file ({} bytes, {})", code.len(), size.as_str());
        self.run(
            size,
            on_progress,
            cancel,
            || prompt_builder::file_review_prompt(code, size),
            80,
        )
        .await
        .map_err(model_failure)
    }

    async fn analyze_commit(
        &self,
        commit: &CommitInfo,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        log::debug!(
            "Analyzing commit by {} with {} changed files ({})",
            commit.author,
            commit.changes.len(),
            size.as_str()
        );
        self.run(
            size,
            on_progress,
            cancel,
            || prompt_builder::commit_review_prompt(commit, size),
            90,
        )
        .await
        .map_err(model_failure)
    }
}

fn model_failure(err: anyhow::Error) -> AnalysisError {
    if http::is_cancelled(&err) {
        return AnalysisError::Cancelled;
    }
    log::error!("Model invocation failed: {err:#}");
    AnalysisError::ResponseUnprocessable(err)
}

/// Drop markdown bold markers, turn the remaining asterisks into dashes, trim.
pub fn format_response(text: &str) -> String {
    text.replace("**", "").replace('*', "-").trim().to_string()
}
