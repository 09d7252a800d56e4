//! # patune Core
//!
//! Core types and utilities shared by the patune crates:
//! the error type, unit conversions, and the G-code instruction vocabulary
//! together with the firmware flavors it can be rendered for.

pub mod error;
pub mod gcode;
pub mod units;

pub use error::{Error, Result};
pub use gcode::{Flavor, Instruction};
pub use units::{feed_rate_from_speed, filament_cross_section};
