//! Segment rows: numeric coercion, row filtering and automation lookup.
//!
//! Rows arrive already mapped to the field names below, but with the loose
//! typing of a spreadsheet export: numbers may be text, booleans may be the
//! tokens `TRUE`/`FALSE`, cells may be missing. [`normalize_row`] turns one
//! row into a typed [`Segment`] or rejects it.

use crate::construction::{parse_construction, ConstructionMix};
use frel_core::{Constants, RunDiagnostics};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Automation status as found in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutomationFlag {
    Bool(bool),
    Text(String),
}

impl AutomationFlag {
    /// Text counts as automated only when it reads `TRUE` (any case). Anything
    /// else falls back to manual switching and the longer isolation time.
    pub fn is_automated(&self) -> bool {
        match self {
            AutomationFlag::Bool(flag) => *flag,
            AutomationFlag::Text(text) => text.trim().eq_ignore_ascii_case("TRUE"),
        }
    }
}

impl From<bool> for AutomationFlag {
    fn from(flag: bool) -> Self {
        AutomationFlag::Bool(flag)
    }
}

/// A numeric cell that may have been exported as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to a finite number; `None` when the cell is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

/// One input row after column mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegmentRow {
    pub id: String,
    #[serde(default)]
    pub automation: Option<AutomationFlag>,
    #[serde(default)]
    pub length_km: Option<RawValue>,
    #[serde(default)]
    pub user_count: Option<RawValue>,
    #[serde(default)]
    pub construction: Option<String>,
}

impl RawSegmentRow {
    /// Build a fully typed row.
    pub fn new(
        id: impl Into<String>,
        length_km: f64,
        user_count: u64,
        automated: bool,
        construction: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            automation: Some(AutomationFlag::Bool(automated)),
            length_km: Some(RawValue::Number(length_km)),
            user_count: Some(RawValue::Number(user_count as f64)),
            construction: Some(construction.into()),
        }
    }
}

/// A validated segment with its construction mix and isolation time resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: String,
    pub length_km: f64,
    pub user_count: u64,
    pub automated: bool,
    pub descriptor: String,
    pub construction: ConstructionMix,
    /// Hours to isolate a fault, from the automation status
    pub isolation_time_h: f64,
}

impl Segment {
    /// Segments without users stay in the output but contribute nothing.
    pub fn is_valid(&self) -> bool {
        self.user_count > 0
    }

    pub fn fault_rate(&self) -> f64 {
        self.construction.fault_rate
    }
}

/// Why a row was left out of the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    InvalidLength(String),
    InvalidUsers(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::InvalidLength(msg) | RowRejection::InvalidUsers(msg) => f.write_str(msg),
        }
    }
}

fn describe(value: &Option<RawValue>) -> String {
    match value {
        None => "missing".to_string(),
        Some(RawValue::Number(v)) => format!("`{v}`"),
        Some(RawValue::Text(t)) => format!("`{t}`"),
    }
}

fn coerce_length(raw: &Option<RawValue>) -> Result<f64, RowRejection> {
    match raw.as_ref().and_then(RawValue::as_number) {
        Some(length) if length >= 0.0 => Ok(length),
        Some(_) => Err(RowRejection::InvalidLength(format!(
            "length {} is negative",
            describe(raw)
        ))),
        None => Err(RowRejection::InvalidLength(format!(
            "length {} is not numeric",
            describe(raw)
        ))),
    }
}

/// Largest user count accepted on one segment. Keeps group and feeder
/// totals far away from `u64` overflow.
pub const MAX_SEGMENT_USERS: u64 = u32::MAX as u64;

fn coerce_users(raw: &Option<RawValue>) -> Result<u64, RowRejection> {
    match raw.as_ref().and_then(RawValue::as_number) {
        Some(users) if users < 0.0 => Err(RowRejection::InvalidUsers(format!(
            "user count {} is negative",
            describe(raw)
        ))),
        Some(users) if users.fract() != 0.0 => Err(RowRejection::InvalidUsers(format!(
            "user count {} is not a whole number",
            describe(raw)
        ))),
        Some(users) if users > MAX_SEGMENT_USERS as f64 => Err(RowRejection::InvalidUsers(
            format!("user count {} exceeds {}", describe(raw), MAX_SEGMENT_USERS),
        )),
        Some(users) => Ok(users as u64),
        None => Err(RowRejection::InvalidUsers(format!(
            "user count {} is not numeric",
            describe(raw)
        ))),
    }
}

/// Validate one row and resolve its derived fields.
pub fn normalize_row(row: &RawSegmentRow, constants: &Constants) -> Result<Segment, RowRejection> {
    let length_km = coerce_length(&row.length_km)?;
    let user_count = coerce_users(&row.user_count)?;
    let automated = row
        .automation
        .as_ref()
        .is_some_and(AutomationFlag::is_automated);
    let descriptor = row.construction.clone().unwrap_or_default();
    let construction = parse_construction(&descriptor, constants);

    Ok(Segment {
        id: row.id.clone(),
        length_km,
        user_count,
        automated,
        descriptor,
        construction,
        isolation_time_h: constants.isolation_time(automated),
    })
}

/// Normalize a group's rows, dropping invalid ones and recording why.
pub fn normalize_rows(
    group: &str,
    rows: &[RawSegmentRow],
    constants: &Constants,
    diagnostics: &mut RunDiagnostics,
) -> Vec<Segment> {
    diagnostics.stats.rows_read += rows.len();
    let mut segments = Vec::with_capacity(rows.len());

    for row in rows {
        let entity = format!("{}/{}", group, row.id);
        match normalize_row(row, constants) {
            Ok(segment) => {
                let mix = &segment.construction;
                diagnostics.stats.malformed_tokens += mix.malformed_tokens;
                diagnostics.stats.unclassified_tokens += mix.unclassified_tokens;
                if mix.malformed_tokens > 0 {
                    diagnostics.issues.add_warning_with_entity(
                        "construction",
                        &format!("{} malformed construction token(s) ignored", mix.malformed_tokens),
                        &entity,
                    );
                }
                if mix.defaulted {
                    diagnostics.stats.defaulted_constructions += 1;
                    diagnostics.issues.add_warning_with_entity(
                        "construction",
                        "no weighted construction token, assuming 100% overhead",
                        &entity,
                    );
                }
                segments.push(segment);
            }
            Err(rejection) => {
                warn!(segment = %entity, "dropping row: {}", rejection);
                match &rejection {
                    RowRejection::InvalidLength(msg) => {
                        diagnostics.record_dropped_length(&entity, msg)
                    }
                    RowRejection::InvalidUsers(msg) => diagnostics.record_dropped_users(&entity, msg),
                }
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(length: Option<RawValue>, users: Option<RawValue>) -> RawSegmentRow {
        RawSegmentRow {
            id: "S-1".into(),
            automation: None,
            length_km: length,
            user_count: users,
            construction: Some("PD_VLY: 100%".into()),
        }
    }

    #[test]
    fn typed_row_normalizes() {
        let constants = Constants::default();
        let segment =
            normalize_row(&RawSegmentRow::new("S-1", 2.0, 100, true, "PD_VLY-300: 100%"), &constants)
                .unwrap();
        assert_eq!(segment.length_km, 2.0);
        assert_eq!(segment.user_count, 100);
        assert!(segment.automated);
        assert_eq!(segment.isolation_time_h, 0.557);
        assert!(segment.is_valid());
        assert_eq!(segment.construction.cable_weight, 1.0);
    }

    #[test]
    fn text_numbers_are_coerced() {
        let segment = normalize_row(
            &row(Some(" 1.25 ".into()), Some("40".into())),
            &Constants::default(),
        )
        .unwrap();
        assert_eq!(segment.length_km, 1.25);
        assert_eq!(segment.user_count, 40);
    }

    #[test]
    fn oversized_user_count_is_rejected() {
        let constants = Constants::default();
        let err = normalize_row(&row(Some(1.0.into()), Some(1e19.into())), &constants).unwrap_err();
        assert!(matches!(err, RowRejection::InvalidUsers(ref msg) if msg.contains("exceeds")));

        let at_limit = MAX_SEGMENT_USERS as f64;
        let segment = normalize_row(&row(Some(1.0.into()), Some(at_limit.into())), &constants).unwrap();
        assert_eq!(segment.user_count, MAX_SEGMENT_USERS);

        let just_over = (MAX_SEGMENT_USERS + 1) as f64;
        assert!(normalize_row(&row(Some(1.0.into()), Some(just_over.into())), &constants).is_err());
    }

    #[test]
    fn automation_tokens() {
        assert!(AutomationFlag::Text("TRUE".into()).is_automated());
        assert!(AutomationFlag::Text("true".into()).is_automated());
        assert!(AutomationFlag::Text(" True ".into()).is_automated());
        assert!(!AutomationFlag::Text("FALSE".into()).is_automated());
        assert!(!AutomationFlag::Text("yes".into()).is_automated());
        assert!(!AutomationFlag::Text(String::new()).is_automated());
        assert!(AutomationFlag::Bool(true).is_automated());
        assert!(!AutomationFlag::Bool(false).is_automated());
    }

    #[test]
    fn unknown_automation_uses_manual_isolation() {
        let mut r = row(Some(1.0.into()), Some(1.0.into()));
        r.automation = Some(AutomationFlag::Text("maybe".into()));
        let segment = normalize_row(&r, &Constants::default()).unwrap();
        assert!(!segment.automated);
        assert_eq!(segment.isolation_time_h, 2.0);

        r.automation = None;
        let segment = normalize_row(&r, &Constants::default()).unwrap();
        assert_eq!(segment.isolation_time_h, 2.0);
    }

    #[test]
    fn invalid_rows_are_rejected() {
        let constants = Constants::default();
        let cases = [
            (row(Some((-0.5).into()), Some(3.0.into())), true),
            (row(None, Some(3.0.into())), true),
            (row(Some("abc".into()), Some(3.0.into())), true),
            (row(Some(f64::NAN.into()), Some(3.0.into())), true),
            (row(Some(1.0.into()), Some((-1.0).into())), false),
            (row(Some(1.0.into()), None), false),
            (row(Some(1.0.into()), Some("n/a".into())), false),
            (row(Some(1.0.into()), Some(2.5.into())), false),
        ];
        for (r, is_length) in cases {
            match normalize_row(&r, &constants) {
                Err(RowRejection::InvalidLength(_)) => assert!(is_length, "{r:?}"),
                Err(RowRejection::InvalidUsers(_)) => assert!(!is_length, "{r:?}"),
                Ok(_) => panic!("row should be rejected: {r:?}"),
            }
        }
    }

    #[test]
    fn zero_users_and_zero_length_are_kept() {
        let segment = normalize_row(&row(Some(0.0.into()), Some(0.0.into())), &Constants::default())
            .unwrap();
        assert!(!segment.is_valid());
        assert_eq!(segment.length_km, 0.0);
    }

    #[test]
    fn missing_descriptor_defaults_to_overhead() {
        let mut r = row(Some(1.0.into()), Some(1.0.into()));
        r.construction = None;
        let segment = normalize_row(&r, &Constants::default()).unwrap();
        assert!(segment.construction.defaulted);
        assert_eq!(segment.construction.overhead_weight, 1.0);
    }

    #[test]
    fn normalize_rows_records_drops_and_fallbacks() {
        let rows = vec![
            RawSegmentRow::new("A", 1.0, 10, true, "PD_VLY: 100%"),
            row(Some((-1.0).into()), Some(1.0.into())),
            row(Some(1.0.into()), Some("x".into())),
            RawSegmentRow::new("D", 1.0, 5, false, "None: 100%\njunk"),
        ];
        let mut diag = RunDiagnostics::new();
        let segments = normalize_rows("main", &rows, &Constants::default(), &mut diag);

        assert_eq!(segments.len(), 2);
        assert_eq!(diag.stats.rows_read, 4);
        assert_eq!(diag.stats.rows_dropped_invalid_length, 1);
        assert_eq!(diag.stats.rows_dropped_invalid_users, 1);
        assert_eq!(diag.stats.defaulted_constructions, 1);
        assert_eq!(diag.stats.malformed_tokens, 1);
        assert_eq!(diag.stats.unclassified_tokens, 1);
        assert_eq!(diag.issues.issues_by_category("segment").count(), 2);
        assert_eq!(diag.issues.issues_by_category("construction").count(), 2);
    }

    #[test]
    fn rows_deserialize_from_loose_json() {
        let json = r#"[
            {"id": "S-1", "automation": "TRUE", "length_km": "0.8", "user_count": 12, "construction": "PD_JKLYJ: 100%"},
            {"id": "S-2", "automation": false, "length_km": 1.5, "user_count": "3"}
        ]"#;
        let rows: Vec<RawSegmentRow> = serde_json::from_str(json).unwrap();
        let constants = Constants::default();
        let first = normalize_row(&rows[0], &constants).unwrap();
        assert!(first.automated);
        assert_eq!(first.length_km, 0.8);
        assert_eq!(first.construction.overhead_weight, 1.0);

        let second = normalize_row(&rows[1], &constants).unwrap();
        assert!(!second.automated);
        assert_eq!(second.user_count, 3);
        assert!(second.construction.defaulted);
    }
}
