//! LLM provider integration for BWIC analysis.
//!
//! Defines the `CompletionProvider` trait and implementations for the
//! OpenAI Chat Completions API and the Gemini generateContent API. Both
//! normalize to "send prompt, get text": one outbound call per invocation,
//! low temperature, provider-native JSON mode.

pub mod gemini;
pub mod openai;

use async_trait::async_trait;

use crate::types::AgentError;

/// Sampling temperature for both providers. Kept low for consistent
/// analytical output.
pub const TEMPERATURE: f64 = 0.3;

/// Default completion budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Abstraction over backend text-completion services.
///
/// Implementors perform exactly one network call per `complete` and never
/// retry; failures come back already classified.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit a prompt and return the model's raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;

    /// Canonical model identifier this provider will call.
    fn model_name(&self) -> &str;
}

/// Which backend a given (model, credential) pair routes to.
///
/// Decided once at agent construction, never re-decided per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

/// Key prefix Google issues for Gemini API keys.
const GEMINI_KEY_PREFIX: &str = "AIza";

impl ProviderKind {
    /// Route based on model family or credential shape. A Gemini-format
    /// key wins regardless of model name; otherwise OpenAI is the default.
    pub fn select(model: &str, api_key: &str) -> Self {
        if model.to_lowercase().starts_with("gemini") || api_key.starts_with(GEMINI_KEY_PREFIX) {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenAi
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_model_routes_to_gemini() {
        assert_eq!(
            ProviderKind::select("gemini-2.5-flash", "sk-something"),
            ProviderKind::Gemini
        );
    }

    #[test]
    fn test_gemini_model_case_insensitive() {
        assert_eq!(
            ProviderKind::select("Gemini-Pro", "sk-something"),
            ProviderKind::Gemini
        );
    }

    #[test]
    fn test_openai_model_with_openai_key_routes_to_openai() {
        assert_eq!(
            ProviderKind::select("gpt-4o-mini", "sk-proj-abc123"),
            ProviderKind::OpenAi
        );
    }

    #[test]
    fn test_gemini_key_prefix_wins_over_model_name() {
        assert_eq!(
            ProviderKind::select("gpt-4o-mini", "AIzaSyFakeKeyForTests"),
            ProviderKind::Gemini
        );
    }

    #[test]
    fn test_unknown_model_defaults_to_openai() {
        assert_eq!(
            ProviderKind::select("some-future-model", "whatever"),
            ProviderKind::OpenAi
        );
    }
}
