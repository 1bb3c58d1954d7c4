mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::scenarios::ScenarioArgs;
use commands::validate::ValidateArgs;
use commands::waterfall::WaterfallArgs;

/// Exit waterfall analysis for venture cap tables
#[derive(Parser)]
#[command(
    name = "capwf",
    version,
    about = "Exit waterfall analysis for venture cap tables",
    long_about = "Distributes hypothetical exit values across share classes \
                  (liquidation preferences, seniority, conversion, participation caps) \
                  and rolls the per-share results up to the funds holding them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Distribute exit scenarios across share classes and funds
    Waterfall(WaterfallArgs),
    /// Seed exit scenarios as multiples of invested capital
    Scenarios(ScenarioArgs),
    /// Check a cap table for inconsistencies without computing
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Waterfall(args) => commands::waterfall::run_waterfall(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Version => {
            println!("capwf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
