use tokio_util::sync::CancellationToken;

use crate::analysis::{report, CodeAnalyzer, Progress};
use crate::commit::{Change, CommitInfo};
use crate::error::AnalysisError;
use crate::feedback::{AnalysisType, FeedbackSize};
use crate::github::{CommitResponse, RepositoryApi};
use crate::http;

/// Fetches content from GitHub and hands it to the analyzer.
///
/// Every failure is collapsed into one stage-scoped [`AnalysisError`]; the cause is logged
/// and kept as the error's source.
pub struct RepositoryService {
    github: Box<dyn RepositoryApi>,
    analyzer: Box<dyn CodeAnalyzer>,
}

impl RepositoryService {
    pub fn new(github: Box<dyn RepositoryApi>, analyzer: Box<dyn CodeAnalyzer>) -> Self {
        RepositoryService { github, analyzer }
    }

    /// Review the blob `file_sha`. Emits 5, 10, 20, the analyzer's own values, then 95.
    pub async fn get_file_analysis(
        &self,
        owner: &str,
        repo: &str,
        file_sha: &str,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        report(on_progress, 5);
        let blob = self
            .github
            .fetch_blob(owner, repo, file_sha, cancel)
            .await
            .map_err(|e| fetch_failure(e, AnalysisError::FileUnreachable))?;

        let content = blob
            .text()
            .map_err(|e| fetch_failure(e, AnalysisError::FileUnreachable))?;
        report(on_progress, 10);

        log::info!("Fetched blob {file_sha} from {owner}/{repo} ({} bytes)", content.len());

        report(on_progress, 20);
        let analysis = self
            .analyzer
            .analyze_file(&content, size, on_progress, cancel)
            .await
            .map_err(|e| downstream_failure(e, AnalysisError::FileUnreachable))?;

        report(on_progress, 95);
        Ok(analysis)
    }

    /// Review the commit `sha`. Emits 5, 10, 20, the analyzer's own values, then 95.
    pub async fn get_commit_analysis(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        report(on_progress, 5);
        let response = self
            .github
            .fetch_commit(owner, repo, sha, cancel)
            .await
            .map_err(|e| fetch_failure(e, AnalysisError::CommitUnreachable))?;
        report(on_progress, 10);

        let commit = commit_info(response);
        log::info!(
            "Fetched commit {sha} from {owner}/{repo} ({} changed files)",
            commit.changes.len()
        );

        report(on_progress, 20);
        let analysis = self
            .analyzer
            .analyze_commit(&commit, size, on_progress, cancel)
            .await
            .map_err(|e| downstream_failure(e, AnalysisError::CommitUnreachable))?;

        report(on_progress, 95);
        Ok(analysis)
    }

    /// Run the operation matching `kind`.
    #[allow(clippy::too_many_arguments)]
    pub async fn analyze(
        &self,
        kind: AnalysisType,
        owner: &str,
        repo: &str,
        sha: &str,
        size: FeedbackSize,
        on_progress: Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        match kind {
            AnalysisType::File => {
                self.get_file_analysis(owner, repo, sha, size, on_progress, cancel)
                    .await
            }
            AnalysisType::Commit => {
                self.get_commit_analysis(owner, repo, sha, size, on_progress, cancel)
                    .await
            }
        }
    }
}

/// Normalize GitHub's commit payload. A missing `files` list means no changes.
pub fn commit_info(response: CommitResponse) -> CommitInfo {
    let changes = response
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|file| Change::new(file.filename, file.additions, file.deletions, file.patch))
        .collect();

    CommitInfo {
        message: response.commit.message,
        author: response.commit.author.name,
        date: response.commit.author.date,
        changes,
    }
}

fn fetch_failure(err: anyhow::Error, wrap: fn(anyhow::Error) -> AnalysisError) -> AnalysisError {
    if http::is_cancelled(&err) {
        return AnalysisError::Cancelled;
    }
    log::error!("GitHub request failed: {err:#}");
    wrap(err)
}

fn downstream_failure(err: AnalysisError, wrap: fn(anyhow::Error) -> AnalysisError) -> AnalysisError {
    match err {
        AnalysisError::Cancelled => AnalysisError::Cancelled,
        other => wrap(anyhow::Error::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Blob, CommitAuthor, CommitDetail, CommitFile};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        github: Vec<(String, String, String)>,
        files: Vec<(String, FeedbackSize)>,
        commits: Vec<CommitInfo>,
    }

    struct FakeGitHub {
        blob: Option<Blob>,
        commit: Option<CommitResponse>,
        calls: Arc<Mutex<Calls>>,
    }

    #[async_trait]
    impl RepositoryApi for FakeGitHub {
        async fn fetch_blob(
            &self,
            owner: &str,
            repo: &str,
            sha: &str,
            _: &CancellationToken,
        ) -> Result<Blob> {
            self.calls
                .lock()
                .unwrap()
                .github
                .push((owner.into(), repo.into(), sha.into()));
            self.blob.clone().ok_or_else(|| anyhow!("API Error"))
        }

        async fn fetch_commit(
            &self,
            owner: &str,
            repo: &str,
            sha: &str,
            _: &CancellationToken,
        ) -> Result<CommitResponse> {
            self.calls
                .lock()
                .unwrap()
                .github
                .push((owner.into(), repo.into(), sha.into()));
            self.commit.clone().ok_or_else(|| anyhow!("API Error"))
        }
    }

    struct FakeAnalyzer {
        fail: bool,
        calls: Arc<Mutex<Calls>>,
    }

    #[async_trait]
    impl CodeAnalyzer for FakeAnalyzer {
        async fn analyze_file(
            &self,
            code: &str,
            size: FeedbackSize,
            on_progress: Progress<'_>,
            _: &CancellationToken,
        ) -> Result<String, AnalysisError> {
            self.calls.lock().unwrap().files.push((code.into(), size));
            if self.fail {
                return Err(AnalysisError::ResponseUnprocessable(anyhow!("model down")));
            }
            report(on_progress, 25);
            report(on_progress, 30);
            report(on_progress, 80);
            Ok("Mocked analysis result".into())
        }

        async fn analyze_commit(
            &self,
            commit: &CommitInfo,
            _: FeedbackSize,
            on_progress: Progress<'_>,
            _: &CancellationToken,
        ) -> Result<String, AnalysisError> {
            self.calls.lock().unwrap().commits.push(commit.clone());
            if self.fail {
                return Err(AnalysisError::ResponseUnprocessable(anyhow!("model down")));
            }
            report(on_progress, 90);
            Ok("Mocked commit analysis".into())
        }
    }

    fn commit_response(files: Option<Vec<CommitFile>>) -> CommitResponse {
        CommitResponse {
            commit: CommitDetail {
                message: "test commit".into(),
                author: CommitAuthor {
                    name: "Test Author".into(),
                    date: "2024-01-01T00:00:00Z".into(),
                },
            },
            files,
        }
    }

    fn service(
        blob: Option<Blob>,
        commit: Option<CommitResponse>,
        fail_analysis: bool,
    ) -> (RepositoryService, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let svc = RepositoryService::new(
            Box::new(FakeGitHub {
                blob,
                commit,
                calls: calls.clone(),
            }),
            Box::new(FakeAnalyzer {
                fail: fail_analysis,
                calls: calls.clone(),
            }),
        );
        (svc, calls)
    }

    fn test_blob() -> Blob {
        Blob {
            content: general_purpose::STANDARD.encode("test content"),
            encoding: "base64".into(),
        }
    }

    #[tokio::test]
    async fn file_analysis_fetches_decodes_and_analyzes() {
        let (svc, calls) = service(Some(test_blob()), None, false);

        let result = svc
            .get_file_analysis(
                "test owner",
                "test repo",
                "test sha",
                FeedbackSize::Concise,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result, "Mocked analysis result");
        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.github,
            vec![(
                "test owner".to_string(),
                "test repo".to_string(),
                "test sha".to_string()
            )]
        );
        assert_eq!(calls.files, vec![("test content".to_string(), FeedbackSize::Concise)]);
    }

    #[tokio::test]
    async fn file_analysis_reports_progress_in_order() {
        let (svc, _) = service(Some(test_blob()), None, false);
        let seen = Mutex::new(Vec::new());
        let sink: &(dyn Fn(u8) + Sync) = &|p| seen.lock().unwrap().push(p);

        svc.get_file_analysis("o", "r", "s", FeedbackSize::Detailed, Some(sink), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![5, 10, 20, 25, 30, 80, 95]);
    }

    #[tokio::test]
    async fn file_fetch_failure_has_fixed_message() {
        let (svc, calls) = service(None, None, false);

        let err = svc
            .get_file_analysis("o", "r", "s", FeedbackSize::Concise, None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error fetching file content. Make sure it is accessible."
        );
        assert!(calls.lock().unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn undecodable_blob_is_a_fetch_failure() {
        let blob = Blob {
            content: "%%%".into(),
            encoding: "base64".into(),
        };
        let (svc, _) = service(Some(blob), None, false);
        let err = svc
            .get_file_analysis("o", "r", "s", FeedbackSize::Concise, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FileUnreachable(_)));
    }

    #[tokio::test]
    async fn analysis_failure_surfaces_as_stage_error() {
        let (svc, _) = service(Some(test_blob()), Some(commit_response(None)), true);
        let cancel = CancellationToken::new();

        let err = svc
            .get_file_analysis("o", "r", "s", FeedbackSize::Concise, None, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error fetching file content. Make sure it is accessible.");

        let err = svc
            .get_commit_analysis("o", "r", "s", FeedbackSize::Concise, None, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error fetching commit details. Make sure it is accessible");
    }

    #[tokio::test]
    async fn commit_analysis_maps_files_to_changes() {
        let files = vec![CommitFile {
            filename: "test.ts".into(),
            additions: 10,
            deletions: 5,
            patch: Some("@@ -1,3 +1,8 @@".into()),
        }];
        let (svc, calls) = service(None, Some(commit_response(Some(files))), false);
        let seen = Mutex::new(Vec::new());
        let sink: &(dyn Fn(u8) + Sync) = &|p| seen.lock().unwrap().push(p);

        let result = svc
            .get_commit_analysis(
                "testOwner",
                "testRepo",
                "testSha",
                FeedbackSize::Concise,
                Some(sink),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result, "Mocked commit analysis");
        assert_eq!(*seen.lock().unwrap(), vec![5, 10, 20, 90, 95]);

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.commits,
            vec![CommitInfo {
                message: "test commit".into(),
                author: "Test Author".into(),
                date: "2024-01-01T00:00:00Z".into(),
                changes: vec![Change {
                    filename: "test.ts".into(),
                    changes: "10 additions, 5 deletions".into(),
                    patch: Some("@@ -1,3 +1,8 @@".into()),
                }],
            }]
        );
    }

    #[tokio::test]
    async fn commit_without_files_has_no_changes() {
        let (svc, calls) = service(None, Some(commit_response(None)), false);

        let result = svc
            .get_commit_analysis("o", "r", "s", FeedbackSize::Concise, None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, "Mocked commit analysis");
        assert!(calls.lock().unwrap().commits[0].changes.is_empty());
    }

    #[tokio::test]
    async fn commit_fetch_failure_has_fixed_message() {
        let (svc, _) = service(None, None, false);
        let err = svc
            .get_commit_analysis("o", "r", "s", FeedbackSize::Concise, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error fetching commit details. Make sure it is accessible"
        );
    }

    #[tokio::test]
    async fn analyze_dispatches_on_kind() {
        let (svc, _) = service(Some(test_blob()), Some(commit_response(None)), false);
        let cancel = CancellationToken::new();

        let file = svc
            .analyze(AnalysisType::File, "o", "r", "s", FeedbackSize::Concise, None, &cancel)
            .await
            .unwrap();
        let commit = svc
            .analyze(AnalysisType::Commit, "o", "r", "s", FeedbackSize::Concise, None, &cancel)
            .await
            .unwrap();

        assert_eq!(file, "Mocked analysis result");
        assert_eq!(commit, "Mocked commit analysis");
    }

    #[tokio::test]
    async fn cancelled_fetch_is_not_reported_as_unreachable() {
        struct CancelledGitHub;
        #[async_trait]
        impl RepositoryApi for CancelledGitHub {
            async fn fetch_blob(&self, _: &str, _: &str, _: &str, _: &CancellationToken) -> Result<Blob> {
                Err(anyhow::Error::new(http::Cancelled).context("failed to fetch blob"))
            }
            async fn fetch_commit(
                &self,
                _: &str,
                _: &str,
                _: &str,
                _: &CancellationToken,
            ) -> Result<CommitResponse> {
                Err(http::Cancelled.into())
            }
        }

        let calls = Arc::new(Mutex::new(Calls::default()));
        let svc = RepositoryService::new(
            Box::new(CancelledGitHub),
            Box::new(FakeAnalyzer { fail: false, calls }),
        );
        let seen = Mutex::new(Vec::new());
        let sink: &(dyn Fn(u8) + Sync) = &|p| seen.lock().unwrap().push(p);
        let cancel = CancellationToken::new();

        let err = svc
            .get_file_analysis("o", "r", "s", FeedbackSize::Concise, Some(sink), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
        assert_eq!(*seen.lock().unwrap(), vec![5]);

        let err = svc
            .get_commit_analysis("o", "r", "s", FeedbackSize::Concise, None, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
    }
}
