//! The BWIC analysis agent.
//!
//! Ties the contract layer together: credential resolution and provider
//! selection happen once at construction; each `analyze` call is one
//! prompt build, one network round trip, one parse. Nothing is retried
//! and nothing is cached across calls.

use tracing::{debug, info};

use crate::config::{resolve_api_key, AppConfig};
use crate::llm::{gemini::GeminiClient, openai::OpenAiClient, CompletionProvider, ProviderKind};
use crate::parse::parse_analysis;
use crate::prompt::build_analysis_prompt;
use crate::types::{
    AgentError, BwicAnalysis, BwicDetails, MarketContext, TraderConstraints, ValuationData,
};

pub struct BwicAgent {
    provider: Box<dyn CompletionProvider>,
}

impl std::fmt::Debug for BwicAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BwicAgent")
            .field("model", &self.provider.model_name())
            .finish()
    }
}

impl BwicAgent {
    /// Build an agent, resolving the credential (explicit → env → config
    /// file) and routing to a backend based on model family and key shape.
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        config: Option<&AppConfig>,
    ) -> Result<Self, AgentError> {
        let api_key = resolve_api_key(api_key, config)?;
        let model = model
            .or_else(|| config.and_then(|c| c.llm.model.clone()))
            .unwrap_or_else(|| crate::llm::openai::DEFAULT_MODEL.to_string());
        let max_tokens = config.and_then(|c| c.llm.max_tokens);

        let kind = ProviderKind::select(&model, &api_key);
        let provider: Box<dyn CompletionProvider> = match kind {
            ProviderKind::Gemini => Box::new(GeminiClient::new(api_key, Some(model), max_tokens)?),
            ProviderKind::OpenAi => Box::new(OpenAiClient::new(api_key, Some(model), max_tokens)?),
        };

        info!(provider = ?kind, model = %provider.model_name(), "BWIC agent initialised");
        Ok(Self { provider })
    }

    /// Build an agent around an existing provider. Used by tests to inject
    /// a deterministic backend.
    pub fn with_provider(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// The canonical model identifier the agent will call.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Run one complete analysis: validate → prompt → one provider call →
    /// parse. Every failure propagates typed; no partial result is returned.
    pub async fn analyze(
        &self,
        bwic: &BwicDetails,
        market: &MarketContext,
        valuation: &ValuationData,
        constraints: &TraderConstraints,
    ) -> Result<BwicAnalysis, AgentError> {
        bwic.validate()?;

        let prompt = build_analysis_prompt(bwic, market, valuation, constraints);
        debug!(prompt_len = prompt.len(), bwic = %bwic, "Submitting BWIC analysis");

        let raw = self.provider.complete(&prompt).await?;
        let analysis = parse_analysis(&raw)?;

        info!(
            scenarios = analysis.bid_scenarios.len(),
            model = %self.provider.model_name(),
            "Analysis complete"
        );
        Ok(analysis)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::samples;
    use async_trait::async_trait;

    struct CannedProvider {
        reply: String,
    }

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, AgentError> {
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_size_before_calling_provider() {
        let agent = BwicAgent::with_provider(Box::new(CannedProvider {
            reply: "{}".to_string(),
        }));
        let mut bwic = samples::bwic();
        bwic.size = -1.0;
        let err = agent
            .analyze(
                &bwic,
                &samples::market(),
                &samples::valuation(),
                &samples::constraints(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_analyze_parses_canned_reply() {
        let agent = BwicAgent::with_provider(Box::new(CannedProvider {
            reply: r#"{"summary":"ok","commentary":"c","risks_caveats":"r","bid_scenarios":[]}"#
                .to_string(),
        }));
        let analysis = agent
            .analyze(
                &samples::bwic(),
                &samples::market(),
                &samples::valuation(),
                &samples::constraints(),
            )
            .await
            .unwrap();
        assert_eq!(analysis.summary, "ok");
        assert!(analysis.bid_scenarios.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_surfaces_malformed_reply() {
        let agent = BwicAgent::with_provider(Box::new(CannedProvider {
            reply: "Sorry, I cannot help with that.".to_string(),
        }));
        let err = agent
            .analyze(
                &samples::bwic(),
                &samples::market(),
                &samples::valuation(),
                &samples::constraints(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse { .. }));
    }

    #[test]
    fn test_new_without_any_credential_fails() {
        if std::env::var(crate::config::OPENAI_KEY_ENV).is_ok()
            || std::env::var(crate::config::GEMINI_KEY_ENV).is_ok()
        {
            return;
        }
        let err = BwicAgent::new(None, None, None).unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }

    #[test]
    fn test_new_routes_gemini_model() {
        let agent =
            BwicAgent::new(Some("sk-test".into()), Some("gemini-2.5-flash".into()), None).unwrap();
        assert_eq!(agent.model_name(), "models/gemini-2.5-flash");
    }

    #[test]
    fn test_new_routes_openai_by_default() {
        let agent = BwicAgent::new(Some("sk-test".into()), Some("gpt-4o-mini".into()), None).unwrap();
        assert_eq!(agent.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_new_gemini_key_prefix_overrides_model() {
        let agent =
            BwicAgent::new(Some("AIzaFakeKey".into()), Some("gpt-4o-mini".into()), None).unwrap();
        // Routed to Gemini, so the unrecognized name gets the models/ prefix.
        assert_eq!(agent.model_name(), "models/gpt-4o-mini");
    }
}
