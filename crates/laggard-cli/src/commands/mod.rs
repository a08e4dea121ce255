pub mod analyze;
pub mod config;
pub mod lag;
pub mod snapshot;

pub use analyze::{handle_analyze_command, AnalyzeCommand};
pub use config::{handle_config_command, ConfigCommand};
pub use lag::{handle_lag_command, LagCommand};
pub use snapshot::{handle_fetch_command, handle_stats_command, FetchCommand, StatsCommand};

use anyhow::{Context, Result};
use clap::Args;
use laggard_config::{ConfigManager, Settings};
use laggard_core::UpdateScope;
use std::path::PathBuf;

/// Options shared by every command that analyzes a project
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Update scopes to report (repeatable)
    #[arg(short, long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<UpdateScope>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Concurrent registry requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Skip development-only dependency scopes
    #[arg(long)]
    pub no_dev: bool,
}

impl SettingsArgs {
    /// Discovered configuration with the command line applied on top
    pub async fn resolve(&self) -> Result<Settings> {
        let manager = ConfigManager::discover(self.config.as_deref())
            .await
            .context("Failed to load configuration")?;
        let mut config = manager.config().clone();
        self.apply(&mut config.settings);
        config.validate().context("Invalid settings")?;
        Ok(config.settings)
    }

    fn apply(&self, settings: &mut Settings) {
        if !self.scopes.is_empty() {
            settings.scopes = self.scopes.clone();
        }
        if let Some(concurrency) = self.concurrency {
            settings.fetch_concurrency = concurrency;
        }
        if self.no_dev {
            settings.include_dev = false;
        }
    }
}
