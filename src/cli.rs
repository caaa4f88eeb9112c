//! Command-line interface for the BWIC agent.
//!
//! Input comes either from a JSON document (`--input`) or from quick
//! inline flags (`--bond`/`--size`/`--deadline`). Output is the
//! fixed-width report by default, or the structured JSON document with
//! `--json`. On failure the classified message and a remediation hint go
//! to stderr and the process exits non-zero.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::agent::BwicAgent;
use crate::config::AppConfig;
use crate::input::{parse_deadline, AnalysisInput};
use crate::report::format_analysis;
use crate::types::{AgentError, BwicDetails, MarketContext, TraderConstraints, ValuationData};

/// BWIC Win Probability Analysis Agent.
#[derive(Parser, Debug)]
#[command(name = "bwic-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON file with bwic/market/valuation/constraints.
    #[arg(short, long, conflicts_with_all = ["bond", "cusip", "size", "deadline"])]
    pub input: Option<PathBuf>,

    /// Bond name (quick input).
    #[arg(long)]
    pub bond: Option<String>,

    /// Bond CUSIP (quick input).
    #[arg(long)]
    pub cusip: Option<String>,

    /// Size in millions (quick input).
    #[arg(long)]
    pub size: Option<f64>,

    /// Deadline: ISO-8601 or +Nh for N hours from now (quick input).
    #[arg(long)]
    pub deadline: Option<String>,

    /// Model identifier (e.g. gpt-4o-mini, gemini-2.5-flash).
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key. Falls back to OPENAI_API_KEY / GEMINI_API_KEY / config.toml.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Emit the structured JSON document instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the CLI to completion.
pub async fn run(cli: Cli) -> Result<(), AgentError> {
    let config = AppConfig::load(&cli.config)?;

    let input = match &cli.input {
        Some(path) => AnalysisInput::from_file(path)?,
        None => quick_input(&cli)?,
    };

    let agent = BwicAgent::new(cli.api_key.clone(), cli.model.clone(), config.as_ref())?;

    eprintln!("Analyzing BWIC...");
    let analysis = agent
        .analyze(
            &input.bwic,
            &input.market,
            &input.valuation,
            &input.constraints,
        )
        .await?;

    let rendered = if cli.json {
        serde_json::to_string_pretty(&analysis)
            .map_err(|e| AgentError::Unclassified(format!("Failed to encode output: {e}")))?
    } else {
        let output_cfg = config.map(|c| c.output).unwrap_or_default();
        format_analysis(&analysis, &output_cfg)
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered).map_err(|e| {
                AgentError::Configuration(format!("Failed to write {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "Results saved");
            eprintln!("Results saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Assemble a minimal request from inline flags. Market, valuation, and
/// constraints get neutral defaults so a one-liner still produces a
/// sensible prompt.
fn quick_input(cli: &Cli) -> Result<AnalysisInput, AgentError> {
    let (Some(bond), Some(size), Some(deadline)) = (&cli.bond, cli.size, &cli.deadline) else {
        return Err(AgentError::Configuration(
            "--bond, --size, and --deadline are required without --input".to_string(),
        ));
    };

    let bwic = BwicDetails {
        cusip: cli.cusip.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
        bond_name: bond.clone(),
        size,
        deadline: parse_deadline(deadline)?,
        seller: None,
        bond_type: None,
    };
    bwic.validate()?;

    Ok(AnalysisInput {
        bwic,
        market: MarketContext::default(),
        valuation: ValuationData {
            fair_value: 100.0,
            model_price: None,
            market_price: None,
            old_bwics: None,
        },
        constraints: TraderConstraints {
            risk_appetite: "Medium".to_string(),
            inventory_level: "Medium".to_string(),
            max_position_size: None,
            target_hold_period: None,
            capital_constraints: None,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_input_file() {
        let cli = parse(&["bwic-agent", "--input", "data.json", "--json"]);
        assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("data.json")));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_quick_flags() {
        let cli = parse(&[
            "bwic-agent",
            "--bond",
            "Apple Inc 3.5% 2030",
            "--size",
            "25",
            "--deadline",
            "+2h",
            "--model",
            "gemini-2.5-flash",
        ]);
        let input = quick_input(&cli).unwrap();
        assert_eq!(input.bwic.bond_name, "Apple Inc 3.5% 2030");
        assert_eq!(input.bwic.cusip, "UNKNOWN");
        assert_eq!(input.bwic.size, 25.0);
        assert_eq!(input.constraints.risk_appetite, "Medium");
    }

    #[test]
    fn test_cli_input_conflicts_with_quick_flags() {
        let result = Cli::try_parse_from([
            "bwic-agent", "--input", "x.json", "--bond", "B", "--size", "1", "--deadline", "+1h",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quick_input_requires_all_three_flags() {
        let cli = parse(&["bwic-agent", "--bond", "B"]);
        assert!(quick_input(&cli).is_err());
    }
}
