//! Settings Persistence
//!
//! Locates and loads the user's configuration. An explicit path always wins;
//! otherwise `<config dir>/patune/config.toml` is used when it exists, and
//! built-in defaults when it does not.

use crate::config::Config;
use crate::error::SettingsResult;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "patune";

/// File name of the default config
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform-specific default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the config from `path`, or from the default location, or defaults
pub fn load_config(path: Option<&Path>) -> SettingsResult<Config> {
    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        return Config::load_from_file(path);
    }

    load_config_or_default(default_config_path().as_deref())
}

/// Load `candidate` if it exists, otherwise return defaults
pub fn load_config_or_default(candidate: Option<&Path>) -> SettingsResult<Config> {
    match candidate {
        Some(path) if path.is_file() => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)
        }
        Some(path) => {
            debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
        None => {
            debug!("No config directory on this platform, using defaults");
            Ok(Config::default())
        }
    }
}
