//! Error handling for patune
//!
//! A single error type covers the few ways generation can fail:
//! - Parameter validation (checked once, before any output)
//! - Height lookups that fall outside the printed tower
//! - I/O failures while writing the instruction stream
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for patune
#[derive(Error, Debug)]
pub enum Error {
    /// A tower parameter failed validation
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name as it appears in config files.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A measured height does not map to a swept or finishing layer
    #[error("Height {height:.3} mm is outside the tuning range ({min:.3}..{max:.3} mm)")]
    HeightOutOfRange {
        /// The height that was looked up.
        height: f64,
        /// Lowest height belonging to a swept layer.
        min: f64,
        /// Top of the tower.
        max: f64,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parameter validation error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a parameter validation error
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
