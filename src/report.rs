//! Trader-facing report rendering.
//!
//! Purely presentational: a banner-framed report with labeled prose
//! sections and a fixed-width bid-scenario table. No validation happens
//! here — the analysis is already typed.

use crate::config::OutputConfig;
use crate::types::BwicAnalysis;

/// Render an analysis as a fixed-width text report.
///
/// `output` controls the banner width and how many scenario rows the
/// table shows (the model is asked for 3-5; the cap guards against an
/// over-eager reply flooding the screen).
pub fn format_analysis(analysis: &BwicAnalysis, output: &OutputConfig) -> String {
    let mut out = Vec::new();
    let rule = "=".repeat(output.table_width);
    let thin_rule = "-".repeat(output.table_width);

    out.push(rule.clone());
    out.push("BWIC WIN PROBABILITY ANALYSIS".to_string());
    out.push(rule.clone());
    out.push(String::new());

    out.push("SUMMARY:".to_string());
    out.push(analysis.summary.clone());
    out.push(String::new());

    if let Some(intent) = &analysis.seller_intent {
        out.push("SELLER INTENT & URGENCY:".to_string());
        out.push(intent.clone());
        if let Some(urgency) = &analysis.urgency_assessment {
            out.push(format!("Urgency: {urgency}"));
        }
        out.push(String::new());
    }

    if let Some(dynamics) = &analysis.auction_dynamics {
        out.push("AUCTION DYNAMICS:".to_string());
        out.push(dynamics.clone());
        out.push(String::new());
    }

    out.push("BID SCENARIOS:".to_string());
    out.push(thin_rule.clone());
    out.push(format!(
        "{:<15} {:<20} {:<20} {:<20}",
        "Bid Price", "Win Prob", "Expected P&L", "P&L Range"
    ));
    out.push(thin_rule.clone());

    for scenario in analysis.bid_scenarios.iter().take(output.max_bid_scenarios) {
        let pnl_range = scenario.expected_pnl_range.as_deref().unwrap_or("N/A");
        out.push(format!(
            "{:<15.2} {:<20} {:<20.2} {:<20}",
            scenario.bid_price, scenario.win_probability_range, scenario.expected_pnl, pnl_range
        ));
    }

    out.push(thin_rule);
    out.push(String::new());

    out.push("COMMENTARY:".to_string());
    out.push(analysis.commentary.clone());
    out.push(String::new());

    out.push("RISKS & CAVEATS:".to_string());
    out.push(analysis.risks_caveats.clone());
    out.push(String::new());

    out.push(rule);
    out.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
