//! Feeder-level combination of group summaries.
//!
//! Group SAIDI/SAIFI values are already per-user figures over each group's
//! own denominator, so adding them would double count. The feeder figure is
//! the user-weighted mean:
//!
//! ```text
//! X_feeder = Σ_g (X_g * N_g) / Σ_g N_g
//! ```
//!
//! Lengths and event counts are extensive and are summed. ASAI is derived
//! again from the combined SAIDI; averaging group ASAI percentages would be
//! wrong whenever group sizes differ.
//!
//! The inputs are the rounded group records, so the combined row is
//! consistent with the group rows printed next to it.

use crate::aggregate::asai_percent;
use crate::report::SummaryRecord;
use frel_core::{FrelError, FrelResult};

/// Combine reported group rows into the feeder row.
pub fn combine_summaries(
    label: &str,
    groups: &[SummaryRecord],
    annual_hours: f64,
) -> FrelResult<SummaryRecord> {
    if groups.is_empty() {
        return Err(FrelError::Config(
            "cannot combine a feeder from zero group summaries".into(),
        ));
    }

    let total_users: u64 = groups.iter().map(|g| g.total_users).sum();
    let weighted = |metric: fn(&SummaryRecord) -> f64| -> f64 {
        if total_users == 0 {
            return 0.0;
        }
        groups
            .iter()
            .map(|g| metric(g) * g.total_users as f64)
            .sum::<f64>()
            / total_users as f64
    };

    let saidi_total = weighted(|g| g.saidi_total);

    Ok(SummaryRecord {
        label: label.to_string(),
        total_length_km: groups.iter().map(|g| g.total_length_km).sum(),
        total_users,
        total_fault_count: groups.iter().map(|g| g.total_fault_count).sum(),
        total_scheduled_count: groups.iter().map(|g| g.total_scheduled_count).sum(),
        saidi_f: weighted(|g| g.saidi_f),
        saidi_s: weighted(|g| g.saidi_s),
        saidi_total,
        saifi_f: weighted(|g| g.saifi_f),
        saifi_s: weighted(|g| g.saifi_s),
        saifi_total: weighted(|g| g.saifi_total),
        asai_percent: asai_percent(saidi_total, total_users, annual_hours),
    }
    .rounded())
}
