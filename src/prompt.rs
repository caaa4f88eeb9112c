//! Prompt construction for the BWIC analysis call.
//!
//! Pure templating from the request entities into a single instruction
//! string: no I/O, no network, deterministic for a given input. Absent
//! optional fields render an explicit missing-data marker so the model
//! knows what it was not given instead of silently guessing.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{BwicDetails, MarketContext, TraderConstraints, ValuationData};

/// Marker for an absent optional scalar.
const NOT_SPECIFIED: &str = "not specified";
/// Marker for an absent optional structure (maps, lists).
const NOT_PROVIDED: &str = "not provided";

/// System-role instruction for the chat-style provider. The generate-style
/// provider prepends the same text to its single prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert fixed income trader with deep \
knowledge of BWIC auctions, market microstructure, and dealer behavior.";

/// Build the full analysis prompt from the four request entities.
///
/// Every populated field appears verbatim in a labeled section; every
/// absent optional renders the `not specified` / `not provided` marker.
pub fn build_analysis_prompt(
    bwic: &BwicDetails,
    market: &MarketContext,
    valuation: &ValuationData,
    constraints: &TraderConstraints,
) -> String {
    let mut p = String::with_capacity(4000);

    p.push_str(
        "You are an expert fixed income trader analyzing a BWIC \
         (bid-wanted-in-competition) auction.\n\
         Your task is to provide a structured analysis of win probability \
         with proper reasoning.\n\n",
    );

    // -- BWIC details -----------------------------------------------------

    p.push_str("BWIC DETAILS:\n");
    p.push_str(&format!("- Bond: {} ({})\n", bwic.bond_name, bwic.cusip));
    p.push_str(&format!("- Size: ${:.2}M\n", bwic.size));
    p.push_str(&format!(
        "- Deadline: {}\n",
        bwic.deadline.format("%Y-%m-%dT%H:%M:%S%z")
    ));
    p.push_str(&format!("- Seller: {}\n", opt_str(&bwic.seller)));
    p.push_str(&format!("- Bond Type: {}\n", opt_str(&bwic.bond_type)));

    // -- Market context ---------------------------------------------------

    p.push_str("\nMARKET CONTEXT:\n");
    p.push_str(&format!("- Curve: {}\n", render_map(&market.curve)));
    p.push_str(&format!(
        "- TRACE Data: {}\n",
        market
            .trace_data
            .as_ref()
            .map(render_value)
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    ));
    p.push_str(&format!(
        "- Liquidity Metrics: {}\n",
        market
            .liquidity_metrics
            .as_ref()
            .map(|m| render_map(m))
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    ));
    p.push_str(&format!(
        "- Comparable Trades: {}\n",
        render_list(&market.comparable_trades)
    ));

    // -- Valuation --------------------------------------------------------

    p.push_str("\nVALUATION:\n");
    p.push_str(&format!("- Fair Value: {}\n", valuation.fair_value));
    p.push_str(&format!(
        "- Model Price: {}\n",
        opt_num(&valuation.model_price)
    ));
    p.push_str(&format!(
        "- Market Price: {}\n",
        opt_num(&valuation.market_price)
    ));
    p.push_str(&format!(
        "- Historical BWICs: {}\n",
        render_list(&valuation.old_bwics)
    ));

    // -- Trader constraints -----------------------------------------------

    p.push_str("\nTRADER CONSTRAINTS:\n");
    p.push_str(&format!("- Risk Appetite: {}\n", constraints.risk_appetite));
    p.push_str(&format!(
        "- Inventory Level: {}\n",
        constraints.inventory_level
    ));
    p.push_str(&format!(
        "- Max Position Size: {}\n",
        opt_num(&constraints.max_position_size)
    ));
    p.push_str(&format!(
        "- Target Hold Period: {} days\n",
        constraints
            .target_hold_period
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    ));
    p.push_str(&format!(
        "- Capital Constraints: {}\n",
        constraints
            .capital_constraints
            .as_ref()
            .map(|m| render_map(m))
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    ));

    p.push_str(INSTRUCTION_BLOCK);
    p
}

/// Fixed instruction block: the four-part analysis, the required output
/// JSON shape, and the hard constraints the model must obey.
const INSTRUCTION_BLOCK: &str = r#"
YOUR ANALYSIS SHOULD:

1. INTERPRET SELLER INTENT & URGENCY:
   - Why is the seller running this BWIC?
   - What signals indicate urgency (size, timing, market conditions)?
   - What does the seller likely need to achieve?

2. REASON ABOUT AUCTION DYNAMICS:
   - Expected competition level (crowding effects)
   - Dealer behavior patterns (shading, aggressive bidding)
   - Market positioning and inventory levels
   - How will other participants bid?

3. EVALUATE BID STRATEGIES:
   - Consider 3-5 bid scenarios at different price levels
   - For each scenario, estimate:
     * Win probability range (e.g., "15-25%", not point estimates)
     * Expected P&L if won
     * Expected P&L range if applicable

4. PROVIDE STRUCTURED OUTPUT in JSON format:
{
  "summary": "1-2 line summary of the opportunity and key recommendation",
  "seller_intent": "Analysis of seller motivation and urgency",
  "urgency_assessment": "Low/Medium/High with reasoning",
  "auction_dynamics": "Expected competition, dealer behavior, crowding analysis",
  "bid_scenarios": [
    {
      "bid_price": 100.50,
      "win_probability_range": "20-30%",
      "expected_pnl": 0.25,
      "expected_pnl_range": "0.15-0.35"
    }
  ],
  "commentary": "Detailed explanation of why these strategies work, market dynamics, and tactical considerations",
  "risks_caveats": "Adverse selection risks, overbidding concerns, market risks, model limitations"
}

CONSTRAINTS:
- DO NOT recommend automation
- DO NOT claim certainty - use ranges and probabilities
- Be concise, factual, and desk-relevant
- Use trader language and terminology
- Highlight risks clearly
- Acknowledge model limitations and data gaps

Provide your analysis now:"#;

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

fn opt_str(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or(NOT_SPECIFIED)
}

fn opt_num(v: &Option<f64>) -> String {
    v.map(|n| n.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Render a map as pretty JSON. BTreeMap keys are ordered, so the output
/// is deterministic.
fn render_map(map: &BTreeMap<String, Value>) -> String {
    serde_json::to_string_pretty(map).unwrap_or_else(|_| "{}".to_string())
}

fn render_value(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| "null".to_string())
}

/// Render an optional list with its count and full contents, so nothing
/// the caller supplied is dropped from the prompt.
fn render_list(list: &Option<Vec<Value>>) -> String {
    match list {
        Some(items) => format!(
            "{} provided:\n{}",
            items.len(),
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        ),
        None => NOT_PROVIDED.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::samples;
    use serde_json::json;

    #[test]
    fn test_prompt_contains_populated_fields() {
        let bwic = samples::bwic();
        let prompt = build_analysis_prompt(
            &bwic,
            &samples::market(),
            &samples::valuation(),
            &samples::constraints(),
        );
        // The deadline is rendered as-is; no derived time-to-deadline.
        assert!(prompt.contains(&bwic.deadline.format("%Y-%m-%dT%H:%M:%S%z").to_string()));
        assert!(prompt.contains("Apple Inc 3.5% 2030"));
        assert!(prompt.contains("037833DX5"));
        assert!(prompt.contains("25.00"));
        assert!(prompt.contains("100.35"));
        assert!(prompt.contains("Medium"));
        assert!(prompt.contains("Low"));
        assert!(prompt.contains("10Y"));
    }

    #[test]
    fn test_prompt_marks_absent_optionals() {
        let prompt = build_analysis_prompt(
            &samples::bwic(),
            &samples::market(),
            &samples::valuation(),
            &samples::constraints(),
        );
        // Absent seller, bond type, model/market price, hold period
        assert!(prompt.contains("not specified"));
        // Absent TRACE data, comparables, historical BWICs
        assert!(prompt.contains("not provided"));
    }

    #[test]
    fn test_prompt_populated_optionals_replace_markers() {
        let mut bwic = samples::bwic();
        bwic.seller = Some("Large Asset Manager".to_string());
        bwic.bond_type = Some("Corporate".to_string());

        let mut valuation = samples::valuation();
        valuation.model_price = Some(100.3);
        valuation.market_price = Some(100.25);

        let prompt = build_analysis_prompt(
            &bwic,
            &samples::market(),
            &valuation,
            &samples::constraints(),
        );
        assert!(prompt.contains("Large Asset Manager"));
        assert!(prompt.contains("Corporate"));
        assert!(prompt.contains("100.3"));
        assert!(prompt.contains("100.25"));
        assert!(!prompt.contains("- Seller: not specified"));
    }

    #[test]
    fn test_prompt_renders_list_contents() {
        let mut market = samples::market();
        market.comparable_trades = Some(vec![json!({"price": 100.22, "size": 5.0})]);

        let prompt = build_analysis_prompt(
            &samples::bwic(),
            &market,
            &samples::valuation(),
            &samples::constraints(),
        );
        assert!(prompt.contains("1 provided"));
        assert!(prompt.contains("100.22"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_analysis_prompt(
            &samples::bwic(),
            &samples::market(),
            &samples::valuation(),
            &samples::constraints(),
        );
        let b = build_analysis_prompt(
            &samples::bwic(),
            &samples::market(),
            &samples::valuation(),
            &samples::constraints(),
        );
        // Same inputs (deadline aside, held fixed per entity) render identically.
        assert_eq!(a.lines().count(), b.lines().count());
    }

    #[test]
    fn test_instruction_block_present() {
        let prompt = build_analysis_prompt(
            &samples::bwic(),
            &samples::market(),
            &samples::valuation(),
            &samples::constraints(),
        );
        assert!(prompt.contains("3-5 bid scenarios"));
        assert!(prompt.contains("win_probability_range"));
        assert!(prompt.contains("DO NOT recommend automation"));
        assert!(prompt.contains("DO NOT claim certainty"));
    }

    #[test]
    fn test_system_prompt_register() {
        assert!(SYSTEM_PROMPT.contains("fixed income trader"));
        assert!(SYSTEM_PROMPT.contains("BWIC"));
    }
}
