/// Normalized view of a commit, ready to be rendered into a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub message: String,
    pub author: String,
    /// ISO-8601 timestamp as GitHub reported it.
    pub date: String,
    pub changes: Vec<Change>,
}

/// One file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub filename: String,
    /// e.g. "10 additions, 5 deletions"
    pub changes: String,
    /// Missing for binary files, pure renames and diffs GitHub considers too large.
    pub patch: Option<String>,
}

impl Change {
    pub fn new(filename: impl Into<String>, additions: u64, deletions: u64, patch: Option<String>) -> Self {
        Change {
            filename: filename.into(),
            changes: format!("{additions} additions, {deletions} deletions"),
            patch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_summary_uses_plain_counts() {
        let change = Change::new("test.ts", 10, 5, Some("@@ -1,3 +1,8 @@".into()));
        assert_eq!(change.changes, "10 additions, 5 deletions");
        assert_eq!(change.patch.as_deref(), Some("@@ -1,3 +1,8 @@"));
    }
}
