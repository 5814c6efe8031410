pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod prompt_builder;
pub mod prompts;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for talking to an LLM provider.
///
/// A client is configured once, including its output budget, and never mutated afterwards.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one text generation for a fully rendered prompt.
    async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String>;
}

/// Builds a fresh client capped at the given number of output tokens.
pub type ClientFactory = Box<dyn Fn(u32) -> Result<Box<dyn LlmClient>> + Send + Sync>;

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..cut], s.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let out = truncate("héllo", 2);
        assert!(out.starts_with("h..."));
        assert!(out.ends_with("[truncated 5 chars]"));
    }
}
