//! # frel-core: Feeder Reliability Core Types
//!
//! Shared building blocks for the 10 kV feeder reliability engine:
//!
//! - [`Constants`] - the immutable table of fault rates, isolation/repair times,
//!   scheduled-outage parameters and reference hours used by every formula
//! - [`ReliabilityConfig`] - constants plus the feeder grouping layout
//!   (which named groups exist, e.g. main trunk and branches)
//! - [`FrelError`] - unified error type; configuration problems are fatal
//! - [`diagnostics`] - warnings and counters for recoverable conditions
//!   (dropped rows, malformed construction tokens, zero-user groups)
//!
//! ## Quick Start
//!
//! ```
//! use frel_core::{Constants, ReliabilityConfig};
//!
//! let config = ReliabilityConfig::default();
//! config.validate().unwrap();
//!
//! assert_eq!(config.constants.annual_hours, 8760.0);
//! assert_eq!(config.groups.len(), 2);
//! assert_eq!(Constants::default().repair_time, 3.073);
//! ```
//!
//! The configuration value is created once per run and passed by reference
//! through every calculation stage. There is no global state, so independent
//! feeders can be evaluated in parallel against the same configuration.

pub mod config;
pub mod diagnostics;
pub mod error;

pub use config::{load_config_from_path, Constants, GroupSpec, ReliabilityConfig};
pub use diagnostics::{DiagnosticIssue, Diagnostics, RunDiagnostics, RunStats, Severity};
pub use error::{FrelError, FrelResult};
