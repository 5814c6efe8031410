use crate::commit::{Change, CommitInfo};
use crate::feedback::FeedbackSize;
use crate::llm::prompts;

/// Review instructions for `size` followed by the file contents, untouched.
pub fn file_review_prompt(code: &str, size: FeedbackSize) -> String {
    format!(
        "{template}\n\nCode to analyze:\n{code}\n",
        template = prompts::review_template(size),
        code = code
    )
}

/// Fill the commit template for `size`.
///
/// Slots are filled in a fixed order (message, author, date, changes) and each one only
/// replaces the first occurrence of its token in the text built so far. A commit message
/// that itself contains `{author}` therefore takes the author's place, and the real
/// `{author}` slot further down stays untouched.
pub fn commit_review_prompt(commit: &CommitInfo, size: FeedbackSize) -> String {
    let changes = render_changes(&commit.changes);

    prompts::commit_template(size)
        .replacen("{message}", &commit.message, 1)
        .replacen("{author}", &commit.author, 1)
        .replacen("{date}", &commit.date, 1)
        .replacen("{changes}", &changes, 1)
}

/// One stanza per changed file. An absent patch renders as an empty segment.
pub fn render_changes(changes: &[Change]) -> String {
    changes
        .iter()
        .map(|change| {
            format!(
                "File: {filename}\nChanges: {summary}\nPatch:\n{patch}\n",
                filename = change.filename,
                summary = change.changes,
                patch = change.patch.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
