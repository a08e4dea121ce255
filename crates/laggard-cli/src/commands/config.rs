use anyhow::{Context, Result};
use clap::Subcommand;
use laggard_config::{ConfigManager, CONFIG_FILE_NAME};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize config file at ~/.laggard/config.toml
    Init {
        /// Write ./laggard.toml instead of the global config
        #[arg(long)]
        local: bool,
    },

    /// Show the path of the config in effect
    Path {
        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Show {
        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn handle_config_command(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init { local } => init_config(local).await,
        ConfigCommand::Path { config } => show_config_path(config).await,
        ConfigCommand::Show { config } => show_config(config).await,
    }
}

async fn init_config(local: bool) -> Result<()> {
    let config_path = if local {
        std::env::current_dir()?.join(CONFIG_FILE_NAME)
    } else {
        ConfigManager::global_config_path()?
    };

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("To reinitialize, please delete the existing config first.");
        return Ok(());
    }

    let initialized = if local {
        ConfigManager::init_at(&config_path).await
    } else {
        ConfigManager::init().await
    };
    initialized.with_context(|| format!("Failed to initialize {}", config_path.display()))?;
    println!("✓ Initialized config at: {}", config_path.display());
    Ok(())
}

async fn show_config_path(config: Option<PathBuf>) -> Result<()> {
    let manager = ConfigManager::discover(config.as_deref()).await?;
    if manager.is_from_file() {
        println!("{}", manager.config_path().display());
    } else {
        println!("{} (not created, using defaults)", manager.config_path().display());
    }
    Ok(())
}

async fn show_config(config: Option<PathBuf>) -> Result<()> {
    let manager = ConfigManager::discover(config.as_deref()).await?;
    let toml = toml::to_string_pretty(manager.config()).context("Failed to serialize config")?;
    print!("{}", toml);
    Ok(())
}
