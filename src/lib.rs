//! # patune
//!
//! Generates G-code for a pressure advance tuning tower: a square printed
//! layer after layer while the firmware's pressure advance is stepped from a
//! minimum to a maximum value. After printing, the height of the cleanest
//! band is converted back to the pressure advance value to configure.
//!
//! ## Architecture
//!
//! patune is organized as a workspace with multiple crates:
//!
//! 1. **patune-core** - Error type, units, G-code instruction vocabulary
//! 2. **patune-toolpath** - Tower parameters, extrusion math, generator, schedule
//! 3. **patune-settings** - TOML/JSON config files and their default location
//! 4. **patune** - CLI binary and logging setup

pub mod cli;
pub mod commands;

pub use patune_core::{Error, Flavor, Instruction, Result};
pub use patune_settings::{Config, OutputSettings, SettingsError};
pub use patune_toolpath::{
    advance_for_height, schedule, GcodeWriter, InstructionSink, LayerKind, LayerPlan,
    TowerGenerator, TowerParameters, TowerSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for G-code
/// - RUST_LOG environment variable support
/// - `level` as the default directive
pub fn init_logging(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
