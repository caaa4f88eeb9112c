//! Shared types for the BWIC agent.
//!
//! These types form the request/response contract: four request
//! entities combined 1:1:1:1 into a single `BwicAnalysis` per call.
//! All of them are plain immutable value objects — constructed once
//! per analysis, owned by the caller, never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Request schema
// ---------------------------------------------------------------------------

/// Details of the BWIC auction itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BwicDetails {
    pub cusip: String,
    pub bond_name: String,
    /// Auction size in millions. Must be > 0.
    pub size: f64,
    /// Bid submission deadline (absolute).
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub seller: Option<String>,
    /// e.g. "Corporate", "Treasury", "Muni"
    #[serde(default)]
    pub bond_type: Option<String>,
}

impl BwicDetails {
    /// Check construction invariants.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.size <= 0.0 || !self.size.is_finite() {
            return Err(AgentError::Configuration(format!(
                "BWIC size must be a positive number of millions, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BwicDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) ${:.2}M due {}",
            self.bond_name,
            self.cusip,
            self.size,
            self.deadline.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

/// Market context supplied alongside the auction.
///
/// The curve mapping is the only always-present field (and may be empty).
/// Tenor labels and yields are free-form; `BTreeMap` keeps prompt
/// rendering deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketContext {
    #[serde(default)]
    pub curve: BTreeMap<String, Value>,
    /// TRACE transaction data, shape left to the caller.
    #[serde(default)]
    pub trace_data: Option<Value>,
    #[serde(default)]
    pub liquidity_metrics: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub comparable_trades: Option<Vec<Value>>,
}

/// Fair value and historical auction data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuationData {
    /// Price or yield convention is the caller's choice.
    pub fair_value: f64,
    #[serde(default)]
    pub model_price: Option<f64>,
    #[serde(default)]
    pub market_price: Option<f64>,
    /// Results of previous BWICs on the same or similar bonds.
    #[serde(default)]
    pub old_bwics: Option<Vec<Value>>,
}

/// Trader constraints and preferences.
///
/// `risk_appetite` and `inventory_level` are open strings on purpose:
/// the model consuming them tolerates free text, so a closed enum
/// would be a behavior change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraderConstraints {
    /// "Low" / "Medium" / "High" by convention.
    pub risk_appetite: String,
    /// "Low" / "Medium" / "High" / "Full" by convention.
    pub inventory_level: String,
    #[serde(default)]
    pub max_position_size: Option<f64>,
    /// Target hold period in days.
    #[serde(default)]
    pub target_hold_period: Option<u32>,
    #[serde(default)]
    pub capital_constraints: Option<BTreeMap<String, Value>>,
}

// ---------------------------------------------------------------------------
// Result schema
// ---------------------------------------------------------------------------

/// One bid scenario from the model's reply.
///
/// `win_probability_range` is opaque prose ("20-30%") — the model emits
/// qualitative ranges, not guaranteed-parseable intervals, so no numeric
/// range type is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidScenario {
    pub bid_price: f64,
    pub win_probability_range: String,
    pub expected_pnl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_pnl_range: Option<String>,
}

/// Complete analysis output.
///
/// `summary`, `commentary`, and `risks_caveats` default to `""` when the
/// model omits them; the narrative optionals stay `None` so "model omitted
/// this" is distinguishable from "model explicitly said nothing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BwicAnalysis {
    pub summary: String,
    pub bid_scenarios: Vec<BidScenario>,
    pub commentary: String,
    pub risks_caveats: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_assessment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_dynamics: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Classified failure modes of a single analysis call.
///
/// None of these are retried by the agent; each is terminal for the call.
/// `QuotaExceeded` carries a best-effort retry-delay hint the caller may
/// use for its own backoff.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API quota exceeded: {message}")]
    QuotaExceeded {
        message: String,
        /// Extracted from the provider's error text when present. A hint,
        /// not a classification signal.
        retry_after_secs: Option<f64>,
    },

    #[error("Invalid API credential: {0}")]
    InvalidCredential(String),

    #[error("Malformed model response ({message}); raw text: {raw}")]
    MalformedResponse { message: String, raw: String },

    #[error("Response schema error ({message}); raw text: {raw}")]
    Schema { message: String, raw: String },

    #[error("Provider error: {0}")]
    Unclassified(String),
}

impl AgentError {
    /// A one-line remediation hint for the boundary layer to print.
    pub fn remediation(&self) -> &'static str {
        match self {
            AgentError::Configuration(_) => {
                "Set OPENAI_API_KEY or GEMINI_API_KEY, or put api_key in config.toml."
            }
            AgentError::QuotaExceeded { .. } => {
                "Retry later or switch to a higher-quota model (--model gemini-2.5-flash)."
            }
            AgentError::InvalidCredential(_) => "Check the API key for the selected provider.",
            AgentError::MalformedResponse { .. } | AgentError::Schema { .. } => {
                "The model reply did not match the expected JSON shape; re-run or switch model."
            }
            AgentError::Unclassified(_) => "Check network connectivity and provider status.",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
