/// User-facing failure of one analysis request.
///
/// `Display` is the fixed message shown to the user. The underlying cause stays reachable
/// through `source()` and is logged where the error is created.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Error fetching file content. Make sure it is accessible.")]
    FileUnreachable(#[source] anyhow::Error),

    #[error("Error fetching commit details. Make sure it is accessible")]
    CommitUnreachable(#[source] anyhow::Error),

    #[error("Unable to process response")]
    ResponseUnprocessable(#[source] anyhow::Error),

    #[error("Analysis cancelled")]
    Cancelled,
}
