use crate::error::ConfigError;
use crate::types::LaggardConfig;
use std::path::{Path, PathBuf};

/// Name of the per-project config file
pub const CONFIG_FILE_NAME: &str = "laggard.toml";

/// Manager for laggard configuration
///
/// Configuration lives either next to the analyzed project (`./laggard.toml`)
/// or globally in `~/.laggard/config.toml`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    config: LaggardConfig,
    from_file: bool,
}

impl ConfigManager {
    /// Get the global config path (~/.laggard/config.toml)
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(global_path_in(&home))
    }

    /// Find and load the config that applies to the current directory.
    ///
    /// Lookup order: `explicit`, `./laggard.toml`, `~/.laggard/config.toml`.
    /// Without any file the defaults are used. An explicit path that does not
    /// exist is an error.
    pub async fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Self::discover_in(explicit, &cwd, dirs::home_dir().as_deref()).await
    }

    /// [`ConfigManager::discover`] with the directories spelled out
    pub async fn discover_in(
        explicit: Option<&Path>,
        cwd: &Path,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        let local = cwd.join(CONFIG_FILE_NAME);
        let global = home.map(global_path_in);
        for candidate in std::iter::once(&local).chain(global.as_ref()) {
            if tokio::fs::try_exists(candidate).await? {
                return Self::load_from(candidate).await;
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self {
            config_path: global.unwrap_or(local),
            config: LaggardConfig::default(),
            from_file: false,
        })
    }

    /// Load config from specific path
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: LaggardConfig = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Self {
            config_path: path.to_path_buf(),
            config,
            from_file: true,
        })
    }

    /// Initialize a new config file in the global location
    pub async fn init() -> Result<Self, ConfigError> {
        let config_path = Self::global_config_path()?;
        Self::init_at(&config_path).await
    }

    /// Initialize config at specific path
    pub async fn init_at(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let manager = Self {
            config_path: path.to_path_buf(),
            config: LaggardConfig::default(),
            from_file: true,
        };
        manager.save().await?;
        Ok(manager)
    }

    /// Save config to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent corruption
    pub async fn save(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        let toml_str = toml::to_string_pretty(&self.config)?;

        let temp_path = self.config_path.with_extension("toml.tmp");
        tokio::fs::write(&temp_path, &toml_str).await?;
        set_config_permissions(&temp_path)?;
        tokio::fs::rename(&temp_path, &self.config_path).await?;

        Ok(())
    }

    /// Get reference to config
    pub fn config(&self) -> &LaggardConfig {
        &self.config
    }

    /// Get mutable reference to config (caller must call save())
    pub fn config_mut(&mut self) -> &mut LaggardConfig {
        &mut self.config
    }

    /// Where the config was read from, or would be written to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Whether the config came from a file rather than defaults
    pub fn is_from_file(&self) -> bool {
        self.from_file
    }
}

fn global_path_in(home: &Path) -> PathBuf {
    home.join(".laggard").join("config.toml")
}

/// Restrict the config file to its owner
#[cfg(unix)]
pub fn set_config_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    std::fs::set_permissions(path, perms)
}

/// Restrict the config file to its owner (no-op outside unix)
#[cfg(not(unix))]
pub fn set_config_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
