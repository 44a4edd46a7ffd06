//! Unified error types for the frel workspace
//!
//! Only fatal conditions are represented here. Recoverable input problems
//! (malformed construction tokens, invalid segment rows, groups without
//! users) are reported through [`crate::diagnostics`] and never abort a run.
//!
//! # Example
//!
//! ```
//! use frel_core::{Constants, FrelError, FrelResult};
//!
//! fn check(constants: &Constants) -> FrelResult<()> {
//!     constants.validate()?;
//!     Ok(())
//! }
//!
//! let bad = Constants { repair_time: -1.0, ..Constants::default() };
//! assert!(matches!(check(&bad), Err(FrelError::InvalidConstant { .. })));
//! ```

use thiserror::Error;

/// Unified error type for all frel operations.
#[derive(Error, Debug)]
pub enum FrelError {
    /// I/O errors (reading configuration files, writing manifests)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors, including missing or non-numeric constants
    #[error("Parse error: {0}")]
    Parse(String),

    /// A constant that is present but not a positive finite number
    #[error("Configuration error: constant `{name}` must be a positive finite number, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    /// Other configuration problems (grouping layout, labels)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured group that has no usable segments at all
    #[error("Configuration error: group `{0}` has no segments")]
    EmptyGroup(String),
}

impl FrelError {
    /// True for the configuration class of errors that abort a run before
    /// any summary is produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FrelError::InvalidConstant { .. }
                | FrelError::Config(_)
                | FrelError::EmptyGroup(_)
                | FrelError::Parse(_)
        )
    }
}

/// Convenience type alias for Results using FrelError.
pub type FrelResult<T> = Result<T, FrelError>;

impl From<serde_json::Error> for FrelError {
    fn from(err: serde_json::Error) -> Self {
        FrelError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for FrelError {
    fn from(err: serde_yaml::Error) -> Self {
        FrelError::Parse(err.to_string())
    }
}
