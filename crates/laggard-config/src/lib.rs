pub mod error;
pub mod manager;
pub mod types;

pub use error::ConfigError;
pub use manager::{set_config_permissions, ConfigManager, CONFIG_FILE_NAME};
pub use types::{LaggardConfig, Settings};
