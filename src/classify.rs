//! Classification of provider failures into actionable categories.
//!
//! Provider SDK/HTTP failures arrive as free text. This module maps that
//! text onto the `AgentError` taxonomy: quota exhaustion (with a
//! best-effort retry-delay hint), bad credentials, or unclassified.
//! JSON-shape failures are classified by the parser, not here.

use crate::types::AgentError;

/// Classify a provider error message.
///
/// Quota markers are checked before credential markers: a message carrying
/// both (e.g. "quota exceeded for this API key") is a quota problem.
pub fn classify_provider_error(message: &str) -> AgentError {
    let lower = message.to_lowercase();

    if lower.contains("quota") || message.contains("429") || message.contains("RESOURCE_EXHAUSTED")
    {
        let retry_after_secs = extract_retry_delay(&lower);
        let mut detail = format!("check your API billing: {message}");
        match retry_after_secs {
            Some(secs) => detail.push_str(&format!(
                " (retry possible in {secs:.0}s, or switch to gemini-2.5-flash which may have a higher quota)"
            )),
            None => detail.push_str(
                " (switch to gemini-2.5-flash which may have a higher quota, or upgrade your plan)",
            ),
        }
        return AgentError::QuotaExceeded {
            message: detail,
            retry_after_secs,
        };
    }

    if message.contains("API key")
        || message.contains("API_KEY")
        || (lower.contains("invalid") && lower.contains("api"))
    {
        return AgentError::InvalidCredential(format!(
            "{message}\n\
             For Gemini: https://makersuite.google.com/app/apikey\n\
             For OpenAI: https://platform.openai.com/api-keys"
        ));
    }

    AgentError::Unclassified(message.to_string())
}

/// Best-effort extraction of a "retry in <N>s" delay from lowercased error
/// text. Providers word this inconsistently; absence of a match never
/// changes classification.
fn extract_retry_delay(lower: &str) -> Option<f64> {
    let idx = lower.find("retry in ")?;
    let after = &lower[idx + "retry in ".len()..];
    let num: String = after
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if num.is_empty() {
        return None;
    }
    // Only accept the pattern when followed by a seconds suffix.
    if !after[num.len()..].starts_with('s') {
        return None;
    }
    num.parse().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
