//! External JSON input binding.
//!
//! The input file is a JSON object with four top-level keys (`bwic`,
//! `market`, `valuation`, `constraints`) mapping 1:1 onto the request
//! entities. Field binding is strict: unknown keys are a construction
//! error. `market` may be omitted entirely since all of its fields have
//! defaults; the other three carry required fields.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::{AgentError, BwicDetails, MarketContext, TraderConstraints, ValuationData};

/// The four request entities as encoded in an input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisInput {
    pub bwic: BwicDetails,
    #[serde(default)]
    pub market: MarketContext,
    pub valuation: ValuationData,
    pub constraints: TraderConstraints,
}

impl AnalysisInput {
    /// Parse and validate an input document.
    pub fn from_json(json: &str) -> Result<Self, AgentError> {
        let input: AnalysisInput = serde_json::from_str(json)
            .map_err(|e| AgentError::Configuration(format!("Invalid input document: {e}")))?;
        input.bwic.validate()?;
        Ok(input)
    }

    /// Load an input document from a file.
    pub fn from_file(path: &Path) -> Result<Self, AgentError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AgentError::Configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }
}

/// Parse a deadline string: either `+Nh` (N hours from now) or an
/// absolute ISO-8601 timestamp.
pub fn parse_deadline(s: &str) -> Result<DateTime<Utc>, AgentError> {
    if let Some(rest) = s.strip_prefix('+') {
        let hours: i64 = rest
            .strip_suffix('h')
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| {
                AgentError::Configuration(format!(
                    "Relative deadline must look like +2h, got {s:?}"
                ))
            })?;
        return Ok(Utc::now() + Duration::hours(hours));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Naive timestamps are taken as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            AgentError::Configuration(format!(
                "Deadline must be ISO-8601 or +Nh relative, got {s:?}"
            ))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
