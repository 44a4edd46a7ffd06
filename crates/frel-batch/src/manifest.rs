use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::job::FeederManifestEntry;

/// JSON record of a batch run: when it ran, how many feeders succeeded and
/// each feeder's summary table.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub num_feeders: usize,
    pub success: usize,
    pub failure: usize,
    pub feeders: Vec<FeederManifestEntry>,
}

/// Write the manifest as pretty JSON, creating missing parent directories.
/// An existing file at `path` is replaced.
pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating manifest directory '{}'", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating batch manifest '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)
        .with_context(|| format!("serializing batch manifest '{}'", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing batch manifest '{}'", path.display()))
}

/// Read back a manifest written by [`write_batch_manifest`].
pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
