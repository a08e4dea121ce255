//! Laggard CLI - technical lag statistics for Cargo and npm projects.

mod commands;
mod formatters;
mod report;
mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "laggard", version)]
#[command(about = "How far behind are your dependencies? Technical lag statistics for Cargo and npm projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Fetch release catalogs and report the lag of a project's dependency tree
    Analyze(commands::AnalyzeCommand),

    /// Write a snapshot of a project and its catalogs for offline analysis
    Fetch(commands::FetchCommand),

    /// Report lag from a snapshot, without network access
    Stats(commands::StatsCommand),

    /// Lag of a single package version
    Lag(commands::LagCommand),

    /// Manage laggard configuration
    Config {
        #[command(subcommand)]
        command: commands::ConfigCommand,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(async {
        match cli.command {
            Command::Analyze(cmd) => commands::handle_analyze_command(cmd).await,
            Command::Fetch(cmd) => commands::handle_fetch_command(cmd).await,
            Command::Stats(cmd) => commands::handle_stats_command(cmd).await,
            Command::Lag(cmd) => commands::handle_lag_command(cmd).await,
            Command::Config { command } => commands::handle_config_command(command).await,
        }
    })
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
