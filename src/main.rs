//! BWIC agent binary entry point.
//!
//! Loads `.env`, initialises structured logging, parses the CLI, and runs
//! exactly one analysis. Any failure prints the classified message plus a
//! remediation hint on stderr and exits non-zero.

use clap::Parser;

use bwic_agent::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let args = Cli::parse();

    if let Err(e) = cli::run(args).await {
        eprintln!("Error: {e}");
        eprintln!("Hint: {}", e.remediation());
        std::process::exit(1);
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bwic_agent=info"));

    let json_logging = std::env::var("BWIC_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
