use frel_algo::{FeederReport, SummaryRecord};
use serde::{Deserialize, Serialize};

/// Outcome of one feeder in a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ok => "ok",
            RunStatus::Error => "error",
        }
    }
}

/// In-memory result of one feeder. `report` is present only on success.
#[derive(Debug, Clone)]
pub struct FeederRunRecord {
    pub feeder_id: String,
    pub status: RunStatus,
    pub error: Option<String>,
    pub report: Option<FeederReport>,
}

impl FeederRunRecord {
    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }
}

/// What the manifest keeps of a feeder run: the summary table and a one-line
/// diagnostics digest. Segment detail stays with the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederManifestEntry {
    pub feeder_id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: Vec<SummaryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl From<&FeederRunRecord> for FeederManifestEntry {
    fn from(record: &FeederRunRecord) -> Self {
        let (summary, diagnostics) = match &record.report {
            Some(report) => (
                report.summary_rows().into_iter().cloned().collect(),
                Some(report.diagnostics.summary()),
            ),
            None => (Vec::new(), None),
        };
        Self {
            feeder_id: record.feeder_id.clone(),
            status: record.status,
            error: record.error.clone(),
            summary,
            diagnostics,
        }
    }
}
