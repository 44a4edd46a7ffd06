//! Per-segment fault and scheduled-outage contributions.
//!
//! For a valid segment `i` in a group with `N` users:
//!
//! ```text
//! faults_i     = L_i * λ_i                      (events / year)
//! duration_i   = t_isolation_i + t_repair       (hours / event)
//! SAIDI-F_i    = faults_i * duration_i * n_i / N
//! SAIFI-F_i    = faults_i * n_i / N
//! scheduled_i  = L_i * λ_s
//! SAIDI-S_i    = scheduled_i * t_s * n_i / N
//! SAIFI-S_i    = scheduled_i * n_i / N
//! ```
//!
//! Repair time is one global constant; only the fault rate depends on the
//! construction mix. Segments without users get all-zero contributions, and
//! every per-user term is zero when `N == 0`.

use crate::segment::Segment;
use frel_core::Constants;
use serde::Serialize;

/// Indicator fields attached to a segment. Full precision; rounding happens
/// only when records are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SegmentIndicators {
    pub fault_count: f64,
    pub fault_duration_h: f64,
    pub saidi_f: f64,
    pub saifi_f: f64,
    pub scheduled_count: f64,
    pub saidi_s: f64,
    pub saifi_s: f64,
    pub saidi_total: f64,
    pub saifi_total: f64,
}

/// A segment together with its computed contributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedSegment {
    pub segment: Segment,
    pub indicators: SegmentIndicators,
}

/// Sum of user counts over a group's segments; the group-local denominator.
pub fn group_total_users(segments: &[Segment]) -> u64 {
    segments.iter().map(|s| s.user_count).sum()
}

/// Compute the contributions of one segment to its group's indices.
pub fn compute_indicators(
    segment: &Segment,
    group_total_users: u64,
    constants: &Constants,
) -> SegmentIndicators {
    if !segment.is_valid() {
        return SegmentIndicators::default();
    }

    let fault_count = segment.length_km * segment.fault_rate();
    let fault_duration_h = segment.isolation_time_h + constants.repair_time;
    let scheduled_count = segment.length_km * constants.scheduled_outage_rate;

    let (saidi_f, saifi_f, saidi_s, saifi_s) = if group_total_users > 0 {
        let users = segment.user_count as f64;
        let total = group_total_users as f64;
        (
            fault_count * fault_duration_h * users / total,
            fault_count * users / total,
            scheduled_count * constants.scheduled_outage_time * users / total,
            scheduled_count * users / total,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    SegmentIndicators {
        fault_count,
        fault_duration_h,
        saidi_f,
        saifi_f,
        scheduled_count,
        saidi_s,
        saifi_s,
        saidi_total: saidi_f + saidi_s,
        saifi_total: saifi_f + saifi_s,
    }
}

/// Evaluate every segment of a group against the group's own user total.
pub fn evaluate_segments(segments: Vec<Segment>, constants: &Constants) -> Vec<EvaluatedSegment> {
    let total_users = group_total_users(&segments);
    segments
        .into_iter()
        .map(|segment| {
            let indicators = compute_indicators(&segment, total_users, constants);
            EvaluatedSegment {
                segment,
                indicators,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{normalize_row, RawSegmentRow};

    fn segment(length: f64, users: u64, automated: bool, descriptor: &str) -> Segment {
        normalize_row(
            &RawSegmentRow::new("S", length, users, automated, descriptor),
            &Constants::default(),
        )
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_cable_segment_reference_values() {
        let constants = Constants::default();
        let seg = segment(2.0, 100, true, "PD_VLY-300: 100%");
        let ind = compute_indicators(&seg, 100, &constants);

        assert!(close(ind.fault_count, 0.18565758));
        assert!(close(ind.fault_duration_h, 3.63));
        assert!(close(ind.saidi_f, 0.18565758 * 3.63));
        assert!(close(ind.saifi_f, 0.18565758));
        assert!(close(ind.scheduled_count, 0.0442));
        assert!(close(ind.saidi_s, 0.241995));
        assert!(close(ind.saifi_s, 0.0442));
        assert!(close(ind.saidi_total, ind.saidi_f + ind.saidi_s));
        assert!(close(ind.saifi_total, 0.18565758 + 0.0442));
    }

    #[test]
    fn contribution_scales_with_user_share() {
        let constants = Constants::default();
        let seg = segment(1.0, 25, false, "PD_JKLYJ: 100%");
        let ind = compute_indicators(&seg, 100, &constants);

        let faults = 0.15337829;
        assert!(close(ind.fault_count, faults));
        assert!(close(ind.fault_duration_h, 2.0 + 3.073));
        assert!(close(ind.saifi_f, faults * 0.25));
        assert!(close(ind.saidi_f, faults * 5.073 * 0.25));
        assert!(close(ind.saifi_s, 0.0221 * 0.25));
    }

    #[test]
    fn zero_user_segment_contributes_nothing() {
        let seg = segment(3.0, 0, true, "PD_VLY: 100%");
        let ind = compute_indicators(&seg, 50, &Constants::default());
        assert_eq!(ind, SegmentIndicators::default());
    }

    #[test]
    fn zero_denominator_zeroes_per_user_terms() {
        let seg = segment(3.0, 10, true, "PD_VLY: 100%");
        let ind = compute_indicators(&seg, 0, &Constants::default());
        assert!(ind.fault_count > 0.0);
        assert!(ind.scheduled_count > 0.0);
        assert_eq!(ind.saidi_f, 0.0);
        assert_eq!(ind.saifi_f, 0.0);
        assert_eq!(ind.saidi_s, 0.0);
        assert_eq!(ind.saifi_s, 0.0);
    }

    #[test]
    fn evaluate_uses_group_local_denominator() {
        let constants = Constants::default();
        let segments = vec![
            segment(1.0, 30, true, "PD_VLY: 100%"),
            segment(2.0, 70, false, "PD_JKLYJ: 100%"),
            segment(5.0, 0, false, "PD_JKLYJ: 100%"),
        ];
        assert_eq!(group_total_users(&segments), 100);

        let evaluated = evaluate_segments(segments, &constants);
        let saifi_f: f64 = evaluated.iter().map(|e| e.indicators.saifi_f).sum();
        let expected = 0.09282879 * 0.3 + 2.0 * 0.15337829 * 0.7;
        assert!(close(saifi_f, expected));
        assert_eq!(evaluated[2].indicators, SegmentIndicators::default());
    }
}
