use super::analyze::print_report;
use super::SettingsArgs;
use crate::report::{build_report, fetch_project_catalogs};
use crate::snapshot::Snapshot;
use crate::OutputFormat;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FetchCommand {
    /// Project directory or lockfile
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Where to write the snapshot
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Snapshot written by `laggard fetch`
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
    format: OutputFormat,

    /// Only report the direct dependencies' own lag
    #[arg(long)]
    shallow: bool,
}

pub async fn handle_fetch_command(cmd: FetchCommand) -> Result<()> {
    let settings = cmd.settings.resolve().await?;
    let project = laggard_deps::analyze_project(&cmd.path)
        .await
        .with_context(|| format!("Failed to analyze {}", cmd.path.display()))?;

    let artifacts = fetch_project_catalogs(&project, &settings).await?;
    let with_versions = artifacts.iter().filter(|a| a.has_versions()).count();
    Snapshot::new(project, &artifacts).write(&cmd.output).await?;

    eprintln!(
        "✓ Wrote {} catalogs ({} with releases) to {}",
        artifacts.len(),
        with_versions,
        cmd.output.display()
    );
    Ok(())
}

pub async fn handle_stats_command(cmd: StatsCommand) -> Result<()> {
    let settings = cmd.settings.resolve().await?;
    let snapshot = Snapshot::read(&cmd.snapshot).await?;
    tracing::info!(
        created_at = %snapshot.created_at,
        artifacts = snapshot.artifacts.len(),
        "loaded snapshot"
    );

    let artifacts = snapshot.artifacts();
    let report = build_report(&snapshot.project, &artifacts, &settings, cmd.shallow)?;
    print_report(&report, cmd.format)
}
