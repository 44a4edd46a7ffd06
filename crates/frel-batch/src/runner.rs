use crate::job::{FeederManifestEntry, FeederRunRecord, RunStatus};
use crate::manifest::{write_batch_manifest, BatchManifest};
use anyhow::{Context, Result};
use chrono::Utc;
use frel_algo::{run_feeder, FeederInput};
use frel_core::ReliabilityConfig;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use tracing::{info, warn};

/// Feeders to evaluate and how to run them.
pub struct BatchRunnerConfig {
    pub feeders: Vec<FeederInput>,
    pub config: ReliabilityConfig,
    /// Worker threads; 0 means one per CPU
    pub threads: usize,
    /// Where to write the JSON manifest, if anywhere
    pub manifest_path: Option<PathBuf>,
}

impl BatchRunnerConfig {
    pub fn new(config: ReliabilityConfig, feeders: Vec<FeederInput>) -> Self {
        Self {
            feeders,
            config,
            threads: 0,
            manifest_path: None,
        }
    }
}

/// Counts plus per-feeder records, in input order.
pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
    pub records: Vec<FeederRunRecord>,
    pub manifest_path: Option<PathBuf>,
}

/// Evaluate every feeder in parallel.
///
/// An invalid configuration fails the whole batch before any feeder runs.
/// Per-feeder failures (e.g. an empty group) are recorded and the remaining
/// feeders still complete.
pub fn run_batch(config: &BatchRunnerConfig) -> Result<BatchSummary> {
    config
        .config
        .validate()
        .context("validating reliability configuration for batch run")?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch runs")?;

    info!(
        feeders = config.feeders.len(),
        threads = thread_count,
        "starting feeder batch"
    );

    // The configuration is shared read-only; each feeder owns its own state.
    let records: Vec<FeederRunRecord> = pool.install(|| {
        config
            .feeders
            .par_iter()
            .map(|feeder| run_one(feeder, &config.config))
            .collect()
    });

    let success = records.iter().filter(|record| record.is_ok()).count();
    let failure = records.len() - success;
    info!(success, failure, "feeder batch finished");

    if let Some(path) = &config.manifest_path {
        let manifest = BatchManifest {
            created_at: Utc::now(),
            num_feeders: records.len(),
            success,
            failure,
            feeders: records.iter().map(FeederManifestEntry::from).collect(),
        };
        write_batch_manifest(path, &manifest)?;
    }

    Ok(BatchSummary {
        success,
        failure,
        records,
        manifest_path: config.manifest_path.clone(),
    })
}

fn run_one(feeder: &FeederInput, config: &ReliabilityConfig) -> FeederRunRecord {
    match run_feeder(config, feeder) {
        Ok(report) => FeederRunRecord {
            feeder_id: feeder.feeder_id.clone(),
            status: RunStatus::Ok,
            error: None,
            report: Some(report),
        },
        Err(err) => {
            warn!(feeder = %feeder.feeder_id, "feeder run failed: {err}");
            FeederRunRecord {
                feeder_id: feeder.feeder_id.clone(),
                status: RunStatus::Error,
                error: Some(err.to_string()),
                report: None,
            }
        }
    }
}
