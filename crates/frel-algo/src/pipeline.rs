//! One feeder run: rows in, segment details plus summary table out.
//!
//! Stages run strictly forward:
//!
//! 1. validate the configuration (fatal on error)
//! 2. normalize each configured group's rows (parse construction, resolve isolation time)
//! 3. compute segment contributions against the group's own user total
//! 4. sum contributions into a group summary and round it for reporting
//! 5. combine the rounded group rows into the feeder row
//!
//! Nothing here performs I/O or touches shared state, so independent
//! feeders can run in parallel against one [`ReliabilityConfig`].

use crate::aggregate::{summarize_group, GroupSummary};
use crate::combine::combine_summaries;
use crate::indicators::evaluate_segments;
use crate::report::{SegmentRecord, SummaryRecord};
use crate::segment::{normalize_rows, RawSegmentRow};
use frel_core::{FrelError, FrelResult, ReliabilityConfig, RunDiagnostics};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Rows of one group as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    pub key: String,
    pub rows: Vec<RawSegmentRow>,
}

/// Everything known about one feeder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederInput {
    pub feeder_id: String,
    pub groups: Vec<GroupInput>,
}

impl FeederInput {
    pub fn new(feeder_id: impl Into<String>) -> Self {
        Self {
            feeder_id: feeder_id.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, key: impl Into<String>, rows: Vec<RawSegmentRow>) -> Self {
        self.groups.push(GroupInput {
            key: key.into(),
            rows,
        });
        self
    }

    fn rows_for(&self, key: &str) -> Option<&[RawSegmentRow]> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.rows.as_slice())
    }
}

/// Detail and summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub key: String,
    pub summary: SummaryRecord,
    pub segments: Vec<SegmentRecord>,
    #[serde(skip)]
    pub exact: GroupSummary,
}

/// Result of a feeder run.
#[derive(Debug, Clone, Serialize)]
pub struct FeederReport {
    pub feeder_id: String,
    pub groups: Vec<GroupReport>,
    pub feeder: SummaryRecord,
    pub diagnostics: RunDiagnostics,
}

impl FeederReport {
    /// Summary table: one row per group in configured order, then the feeder row.
    pub fn summary_rows(&self) -> Vec<&SummaryRecord> {
        self.groups
            .iter()
            .map(|g| &g.summary)
            .chain(std::iter::once(&self.feeder))
            .collect()
    }

    pub fn group(&self, key: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Run the full calculation for one feeder.
pub fn run_feeder(config: &ReliabilityConfig, input: &FeederInput) -> FrelResult<FeederReport> {
    config.validate()?;
    let constants = &config.constants;
    let mut diagnostics = RunDiagnostics::new();

    let configured: HashSet<&str> = config.groups.iter().map(|g| g.key.as_str()).collect();
    let mut seen = HashSet::new();
    for group in &input.groups {
        let key = group.key.as_str();
        if !configured.contains(key) {
            diagnostics.issues.add_warning_with_entity(
                "layout",
                "input group is not part of the configured layout and was ignored",
                key,
            );
        } else if !seen.insert(key) {
            diagnostics.issues.add_warning_with_entity(
                "layout",
                "input group appears more than once; only the first occurrence is used",
                key,
            );
        }
    }

    // Every configured group must be present before anything is computed.
    let mut group_rows = Vec::with_capacity(config.groups.len());
    for layout in &config.groups {
        match input.rows_for(&layout.key) {
            Some(rows) if !rows.is_empty() => group_rows.push((layout, rows)),
            _ => return Err(FrelError::EmptyGroup(layout.key.clone())),
        }
    }

    let mut groups = Vec::with_capacity(group_rows.len());
    for (layout, rows) in group_rows {
        let segments = normalize_rows(&layout.key, rows, constants, &mut diagnostics);
        if segments.is_empty() {
            return Err(FrelError::EmptyGroup(layout.key.clone()));
        }

        let evaluated = evaluate_segments(segments, constants);
        for e in &evaluated {
            debug!(
                group = %layout.key,
                segment = %e.segment.id,
                length_km = e.segment.length_km,
                users = e.segment.user_count,
                construction = %e.segment.construction,
                fault_rate = e.segment.fault_rate(),
                saidi_total = e.indicators.saidi_total,
                saifi_total = e.indicators.saifi_total,
                "segment evaluated"
            );
        }

        let exact = summarize_group(&layout.key, &layout.label, &evaluated, constants);
        if exact.total_users == 0 {
            diagnostics.record_zero_user_group(&layout.key);
        }
        let summary = exact.to_record();
        info!(
            feeder = %input.feeder_id,
            group = %layout.key,
            users = summary.total_users,
            saidi = summary.saidi_total,
            saifi = summary.saifi_total,
            asai = summary.asai_percent,
            "group summarized"
        );

        groups.push(GroupReport {
            key: layout.key.clone(),
            summary,
            segments: evaluated.iter().map(SegmentRecord::from).collect(),
            exact,
        });
    }

    let rows: Vec<SummaryRecord> = groups.iter().map(|g| g.summary.clone()).collect();
    let feeder = combine_summaries(&config.feeder_label, &rows, constants.annual_hours)?;
    info!(
        feeder = %input.feeder_id,
        users = feeder.total_users,
        saidi = feeder.saidi_total,
        saifi = feeder.saifi_total,
        asai = feeder.asai_percent,
        rows_kept = diagnostics.stats.rows_kept(),
        diagnostics = %diagnostics.summary(),
        "feeder combined"
    );

    Ok(FeederReport {
        feeder_id: input.feeder_id.clone(),
        groups,
        feeder,
        diagnostics,
    })
}
