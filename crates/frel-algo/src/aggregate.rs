//! Group-level aggregation (main trunk, branches, ...).
//!
//! Each segment contribution is already divided by the group's own user
//! total, so group SAIDI/SAIFI are plain sums of the contributions. ASAI is
//! derived from the summed SAIDI.

use crate::indicators::EvaluatedSegment;
use crate::report::SummaryRecord;
use frel_core::Constants;
use serde::Serialize;

/// Average service availability in percent.
///
/// `(1 - SAIDI / annual_hours) * 100`, or exactly 100 when there are no users.
/// Used for groups and for the combined feeder alike.
pub fn asai_percent(saidi_total: f64, total_users: u64, annual_hours: f64) -> f64 {
    if total_users == 0 {
        return 100.0;
    }
    (1.0 - saidi_total / annual_hours) * 100.0
}

/// Full-precision summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub label: String,
    pub segment_count: usize,
    pub valid_segment_count: usize,
    pub total_length_km: f64,
    pub total_users: u64,
    pub total_fault_count: f64,
    pub total_scheduled_count: f64,
    pub saidi_f: f64,
    pub saidi_s: f64,
    pub saidi_total: f64,
    pub saifi_f: f64,
    pub saifi_s: f64,
    pub saifi_total: f64,
    pub asai_percent: f64,
}

impl GroupSummary {
    /// The summary row as reported (rounded).
    pub fn to_record(&self) -> SummaryRecord {
        SummaryRecord {
            label: self.label.clone(),
            total_length_km: self.total_length_km,
            total_users: self.total_users,
            total_fault_count: self.total_fault_count,
            total_scheduled_count: self.total_scheduled_count,
            saidi_f: self.saidi_f,
            saidi_s: self.saidi_s,
            saidi_total: self.saidi_total,
            saifi_f: self.saifi_f,
            saifi_s: self.saifi_s,
            saifi_total: self.saifi_total,
            asai_percent: self.asai_percent,
        }
        .rounded()
    }
}

/// Sum the segment contributions of one group.
///
/// Invalid segments are included; their contributions are zero.
pub fn summarize_group(
    key: &str,
    label: &str,
    segments: &[EvaluatedSegment],
    constants: &Constants,
) -> GroupSummary {
    let mut summary = GroupSummary {
        key: key.to_string(),
        label: label.to_string(),
        segment_count: segments.len(),
        valid_segment_count: 0,
        total_length_km: 0.0,
        total_users: 0,
        total_fault_count: 0.0,
        total_scheduled_count: 0.0,
        saidi_f: 0.0,
        saidi_s: 0.0,
        saidi_total: 0.0,
        saifi_f: 0.0,
        saifi_s: 0.0,
        saifi_total: 0.0,
        asai_percent: 100.0,
    };

    for evaluated in segments {
        let segment = &evaluated.segment;
        let ind = &evaluated.indicators;
        if segment.is_valid() {
            summary.valid_segment_count += 1;
        }
        summary.total_length_km += segment.length_km;
        summary.total_users += segment.user_count;
        summary.total_fault_count += ind.fault_count;
        summary.total_scheduled_count += ind.scheduled_count;
        summary.saidi_f += ind.saidi_f;
        summary.saidi_s += ind.saidi_s;
        summary.saifi_f += ind.saifi_f;
        summary.saifi_s += ind.saifi_s;
    }

    if summary.total_users == 0 {
        summary.saidi_f = 0.0;
        summary.saidi_s = 0.0;
        summary.saifi_f = 0.0;
        summary.saifi_s = 0.0;
    }
    summary.saidi_total = summary.saidi_f + summary.saidi_s;
    summary.saifi_total = summary.saifi_f + summary.saifi_s;
    summary.asai_percent = asai_percent(
        summary.saidi_total,
        summary.total_users,
        constants.annual_hours,
    );
    summary
}
