//! Parallel evaluation of many feeders against one configuration.
//!
//! Each feeder is independent: [`run_batch`] fans them out over a dedicated
//! rayon pool, collects one [`FeederRunRecord`] per feeder in input order and
//! optionally writes a JSON [`BatchManifest`] describing the run.

pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{FeederManifestEntry, FeederRunRecord, RunStatus};
pub use manifest::{load_batch_manifest, write_batch_manifest, BatchManifest};
pub use runner::{run_batch, BatchRunnerConfig, BatchSummary};
