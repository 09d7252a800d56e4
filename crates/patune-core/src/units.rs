//! Unit conversion utilities
//!
//! Speeds are configured in mm/s while G-code feed rates are mm/min.
//! Everything else is millimetres and degrees Celsius.

use std::f64::consts::PI;

/// Seconds per minute, the factor between configured speeds and feed rates
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Convert a speed in mm/s to a G-code feed rate in mm/min
pub fn feed_rate_from_speed(speed_mm_per_sec: f64) -> f64 {
    speed_mm_per_sec * SECONDS_PER_MINUTE
}

/// Cross-section area (mm²) of round filament with the given diameter
pub fn filament_cross_section(diameter_mm: f64) -> f64 {
    diameter_mm * diameter_mm * PI / 4.0
}
