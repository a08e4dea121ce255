use super::SettingsArgs;
use crate::formatters::{Formatter, HumanFormatter, JsonFormatter};
use crate::report::{build_report, fetch_project_catalogs, ProjectReport};
use crate::OutputFormat;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Project directory or lockfile (Cargo.lock, package-lock.json)
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
    format: OutputFormat,

    /// Only report the direct dependencies' own lag
    #[arg(long)]
    shallow: bool,
}

pub async fn handle_analyze_command(cmd: AnalyzeCommand) -> Result<()> {
    let settings = cmd.settings.resolve().await?;
    let project = laggard_deps::analyze_project(&cmd.path)
        .await
        .with_context(|| format!("Failed to analyze {}", cmd.path.display()))?;
    tracing::info!(
        ecosystem = %project.ecosystem,
        artifacts = project.artifacts.len(),
        "resolved project"
    );

    let artifacts = fetch_project_catalogs(&project, &settings).await?;
    let report = build_report(&project, &artifacts, &settings, cmd.shallow)?;
    print_report(&report, cmd.format)
}

pub fn print_report(report: &ProjectReport<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => HumanFormatter.print(report),
        OutputFormat::Json => JsonFormatter.print(report),
    }
}
