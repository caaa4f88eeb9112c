//! Parsing and validation of the model's JSON reply.
//!
//! The reply must be a JSON object. `summary`, `commentary`, and
//! `risks_caveats` fall back to `""` when missing; the narrative
//! optionals stay `None` when missing or null. Each bid scenario must
//! carry its three required keys or the whole parse fails — no partial
//! scenario list is ever returned. Probability ranges remain opaque
//! text throughout.

use serde_json::Value;
use tracing::debug;

use crate::types::{AgentError, BidScenario, BwicAnalysis};

/// Cap on how much raw text is echoed back in error values.
const RAW_SNIPPET_LEN: usize = 500;

/// Parse raw provider output into a typed `BwicAnalysis`.
pub fn parse_analysis(raw: &str) -> Result<BwicAnalysis, AgentError> {
    let root: Value = serde_json::from_str(raw).map_err(|e| AgentError::MalformedResponse {
        message: format!("reply is not valid JSON: {e}"),
        raw: snippet(raw),
    })?;

    let obj = root.as_object().ok_or_else(|| AgentError::MalformedResponse {
        message: "reply is valid JSON but not an object".to_string(),
        raw: snippet(raw),
    })?;

    let bid_scenarios = match obj.get("bid_scenarios") {
        Some(Value::Array(items)) => {
            let mut scenarios = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                scenarios.push(parse_scenario(item, i, raw)?);
            }
            scenarios
        }
        Some(other) => {
            return Err(AgentError::Schema {
                message: format!("bid_scenarios must be an array, got {}", kind(other)),
                raw: snippet(raw),
            })
        }
        None => Vec::new(),
    };

    debug!(scenarios = bid_scenarios.len(), "Parsed model reply");

    Ok(BwicAnalysis {
        summary: required_text(obj, "summary"),
        bid_scenarios,
        commentary: required_text(obj, "commentary"),
        risks_caveats: required_text(obj, "risks_caveats"),
        seller_intent: optional_text(obj, "seller_intent"),
        urgency_assessment: optional_text(obj, "urgency_assessment"),
        auction_dynamics: optional_text(obj, "auction_dynamics"),
    })
}

fn parse_scenario(item: &Value, index: usize, raw: &str) -> Result<BidScenario, AgentError> {
    let obj = item.as_object().ok_or_else(|| AgentError::Schema {
        message: format!("bid_scenarios[{index}] is not an object"),
        raw: snippet(raw),
    })?;

    let bid_price = required_number(obj, "bid_price", index, raw)?;
    let expected_pnl = required_number(obj, "expected_pnl", index, raw)?;

    let win_probability_range = match obj.get("win_probability_range").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => {
            return Err(AgentError::Schema {
                message: format!("bid_scenarios[{index}] missing win_probability_range"),
                raw: snippet(raw),
            })
        }
    };

    Ok(BidScenario {
        bid_price,
        win_probability_range,
        expected_pnl,
        expected_pnl_range: obj
            .get("expected_pnl_range")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn required_number(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    index: usize,
    raw: &str,
) -> Result<f64, AgentError> {
    obj.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| AgentError::Schema {
            message: format!("bid_scenarios[{index}] missing numeric {key}"),
            raw: snippet(raw),
        })
}

/// Required top-level text field: empty string when absent.
fn required_text(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Optional narrative field: `None` when absent or null, `Some` otherwise —
/// including `Some("")` when the model explicitly said nothing.
fn optional_text(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate raw text for inclusion in error values.
fn snippet(raw: &str) -> String {
    if raw.len() <= RAW_SNIPPET_LEN {
        raw.to_string()
    } else {
        let mut end = RAW_SNIPPET_LEN;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &raw[..end])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
