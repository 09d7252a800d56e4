//! patune Settings Crate
//!
//! Handles tower configuration files and their default location.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, OutputSettings};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{default_config_path, load_config, load_config_or_default};
