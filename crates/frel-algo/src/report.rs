//! Externally reported records. Every real value is rounded here and only here.

use crate::indicators::EvaluatedSegment;
use serde::{Deserialize, Serialize};

/// Decimal places for indicator values in reports.
pub const INDICATOR_DECIMALS: i32 = 6;
/// Decimal places for summed lengths in summary records.
pub const LENGTH_DECIMALS: i32 = 4;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn r6(value: f64) -> f64 {
    round_to(value, INDICATOR_DECIMALS)
}

/// Per-segment detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub id: String,
    pub length_km: f64,
    pub user_count: u64,
    pub cable_weight: f64,
    pub overhead_weight: f64,
    pub construction_label: String,
    pub automated: bool,
    pub fault_rate: f64,
    pub isolation_time_h: f64,
    pub is_valid: bool,
    pub fault_count: f64,
    pub fault_duration_h: f64,
    pub scheduled_count: f64,
    pub saidi_f: f64,
    pub saidi_s: f64,
    pub saidi_total: f64,
    pub saifi_f: f64,
    pub saifi_s: f64,
    pub saifi_total: f64,
}

impl From<&EvaluatedSegment> for SegmentRecord {
    fn from(evaluated: &EvaluatedSegment) -> Self {
        let segment = &evaluated.segment;
        let ind = &evaluated.indicators;
        Self {
            id: segment.id.clone(),
            length_km: r6(segment.length_km),
            user_count: segment.user_count,
            cable_weight: r6(segment.construction.cable_weight),
            overhead_weight: r6(segment.construction.overhead_weight),
            construction_label: segment.construction.label(),
            automated: segment.automated,
            fault_rate: r6(segment.construction.fault_rate),
            isolation_time_h: r6(segment.isolation_time_h),
            is_valid: segment.is_valid(),
            fault_count: r6(ind.fault_count),
            fault_duration_h: r6(ind.fault_duration_h),
            scheduled_count: r6(ind.scheduled_count),
            saidi_f: r6(ind.saidi_f),
            saidi_s: r6(ind.saidi_s),
            saidi_total: r6(ind.saidi_total),
            saifi_f: r6(ind.saifi_f),
            saifi_s: r6(ind.saifi_s),
            saifi_total: r6(ind.saifi_total),
        }
    }
}

/// One row of the summary table: a group or the combined feeder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub label: String,
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

impl SummaryRecord {
    /// Round every field to its reporting precision.
    pub(crate) fn rounded(mut self) -> Self {
        self.total_length_km = round_to(self.total_length_km, LENGTH_DECIMALS);
        self.total_fault_count = r6(self.total_fault_count);
        self.total_scheduled_count = r6(self.total_scheduled_count);
        self.saidi_f = r6(self.saidi_f);
        self.saidi_s = r6(self.saidi_s);
        self.saidi_total = r6(self.saidi_total);
        self.saifi_f = r6(self.saifi_f);
        self.saifi_s = r6(self.saifi_s);
        self.saifi_total = r6(self.saifi_total);
        self.asai_percent = r6(self.asai_percent);
        self
    }
}
