//! # patune Toolpath
//!
//! Generates the G-code for a pressure advance tuning tower: a hollow square
//! printed layer after layer while the firmware's pressure advance value is
//! stepped linearly from `pa_min` to `pa_max`.
//!
//! ## Modules
//!
//! - **parameters**: Tower parameters and their validation
//! - **extrusion**: Filament feed for a given bead length
//! - **cursor**: Toolhead position and cumulative extrusion
//! - **sink**: Destinations for generated instructions
//! - **schedule**: Per-layer pressure advance values and height lookup
//! - **generator**: The tower program itself
//!
//! ## Example
//!
//! ```
//! use patune_toolpath::{TowerGenerator, TowerParameters};
//!
//! let params = TowerParameters {
//!     layers: 20,
//!     pa_max: 0.1,
//!     ..Default::default()
//! };
//! let gcode = TowerGenerator::new(params)?.generate()?;
//! assert!(gcode.contains("SET_PRESSURE_ADVANCE ADVANCE=0.0050"));
//! # Ok::<(), patune_core::Error>(())
//! ```

pub mod cursor;
pub mod extrusion;
pub mod generator;
pub mod parameters;
pub mod schedule;
pub mod sink;

pub use cursor::Cursor;
pub use extrusion::{extrusion_length_for_path_length, extrusion_length_for_volume};
pub use generator::{TowerGenerator, TowerSummary, PRIME_EXTRUSION};
pub use parameters::{TowerParameters, MAX_LAYERS};
pub use schedule::{
    advance_for_height, advance_for_layer, printed_layers, schedule, tower_height, LayerKind, LayerPlan,
    FINISHING_LAYERS,
};
pub use sink::{render, GcodeWriter, InstructionSink};
