use super::SettingsArgs;
use crate::formatters::{human, json};
use crate::report::registry_client;
use crate::OutputFormat;
use anyhow::{Context, Result};
use clap::Args;
use laggard_config::Settings;
use laggard_core::{Artifact, ArtifactId, TechnicalLag, UpdateScope};
use laggard_info::Registry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LagCommand {
    /// Registry to query (crates-io or npm)
    registry: Registry,

    /// Package name (e.g. serde, @types/node)
    name: String,

    /// Version in use
    version: String,

    /// Update scopes to report (defaults to all)
    #[arg(short, long = "scope", value_name = "SCOPE")]
    scopes: Vec<UpdateScope>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "human")]
    format: OutputFormat,
}

impl LagCommand {
    /// Discovered settings with `--scope` applied
    async fn settings(&self) -> Result<Settings> {
        SettingsArgs {
            scopes: self.scopes.clone(),
            config: self.config.clone(),
            ..SettingsArgs::default()
        }
        .resolve()
        .await
    }
}

pub async fn handle_lag_command(cmd: LagCommand) -> Result<()> {
    let settings = cmd.settings().await?;
    let client = registry_client(&settings)?;
    let id = ArtifactId::new(cmd.name.as_str());
    let versions = client
        .fetch(cmd.registry, &id)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", cmd.name, cmd.registry))?;

    let artifact = Artifact::new(id, versions);
    let lags = lag_per_scope(&artifact, &cmd.version, &settings.scopes)?;

    match cmd.format {
        OutputFormat::Human => print!("{}", human::render_lag(&cmd.name, &cmd.version, &lags)),
        OutputFormat::Json => println!("{}", json::render_lag(&cmd.name, &cmd.version, &lags)?),
    }
    Ok(())
}

fn lag_per_scope(
    artifact: &Artifact,
    used: &str,
    scopes: &[UpdateScope],
) -> Result<Vec<(UpdateScope, Option<TechnicalLag>)>> {
    let scopes = match scopes {
        [] => UpdateScope::all(),
        scopes => scopes,
    };
    scopes
        .iter()
        .map(|&scope| {
            let lag = artifact
                .tech_lag(used, scope)
                .with_context(|| format!("'{}' is not a valid version", used))?;
            Ok((scope, lag))
        })
        .collect()
}
