//! Diagnostics for recoverable conditions met during a feeder run.
//!
//! Nothing recorded here stops a calculation. The engine keeps going and the
//! caller receives the issues and counters next to the final summary, e.g.
//! "2 rows dropped (1 invalid length, 1 invalid users)".
//!
//! A dropped row is an error-level issue: that part of the input is gone.
//! Everything the engine could recover (ignored token, overhead fallback,
//! zero-user group, ignored input group) is a warning.
//!
//! Categories in use:
//!
//! - `construction` - malformed or unclassified construction tokens, 100% overhead fallback
//! - `segment` - rows dropped by the normalizer
//! - `group` - groups whose user total is zero
//! - `layout` - input groups that the configuration does not name, or that repeat
//!
//! # Example
//!
//! ```
//! use frel_core::diagnostics::{RunDiagnostics, Severity};
//!
//! let mut diag = RunDiagnostics::new();
//! diag.stats.rows_read = 3;
//! diag.record_dropped_length("S-2", "length `-1` is negative");
//!
//! assert_eq!(diag.stats.rows_dropped(), 1);
//! assert_eq!(diag.issues.error_count(), 1);
//! assert_eq!(diag.issues.issues[0].severity, Severity::Error);
//! ```

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Input was recovered (row dropped, token ignored, fallback applied)
    Warning,
    /// Part of the input could not be used at all
    Error,
}

/// A single diagnostic issue encountered during a run
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Category for grouping (e.g. "construction", "segment", "group")
    pub category: String,
    pub message: String,
    /// Optional entity reference (e.g. "main/S-3")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    /// Add entity reference to the issue
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;

        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }

        Ok(())
    }
}

/// Collection of diagnostic issues
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message).with_entity(entity));
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message).with_entity(entity));
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Get issues filtered by category
    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn summary(&self) -> String {
        match (self.warning_count(), self.error_count()) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => format!("{} warning{}", w, plural(w)),
            (0, e) => format!("{} error{}", e, plural(e)),
            (w, e) => format!("{} warning{}, {} error{}", w, plural(w), e, plural(e)),
        }
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

// ============================================================================
// Run-Specific Counters
// ============================================================================

/// Counters for one feeder run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub rows_read: usize,
    pub rows_dropped_invalid_length: usize,
    pub rows_dropped_invalid_users: usize,
    /// Tokens without a colon or with an unparsable percentage
    pub malformed_tokens: usize,
    /// Tokens named `None` (or with an empty name) that were excluded from weighting
    pub unclassified_tokens: usize,
    /// Segments that fell back to 100% overhead construction
    pub defaulted_constructions: usize,
    /// Groups whose total user count was zero
    pub zero_user_groups: usize,
}

impl RunStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped_invalid_length + self.rows_dropped_invalid_users
    }

    pub fn rows_kept(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_dropped())
    }
}

/// Counters plus issues, returned alongside every feeder report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunDiagnostics {
    pub stats: RunStats,
    pub issues: Diagnostics,
}

impl RunDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a row dropped for a missing, non-numeric or negative length.
    pub fn record_dropped_length(&mut self, entity: &str, message: &str) {
        self.stats.rows_dropped_invalid_length += 1;
        self.issues.add_error_with_entity("segment", message, entity);
    }

    /// Record a row dropped for a missing, non-numeric, fractional or negative user count.
    pub fn record_dropped_users(&mut self, entity: &str, message: &str) {
        self.stats.rows_dropped_invalid_users += 1;
        self.issues.add_error_with_entity("segment", message, entity);
    }

    /// Record a group whose denominator is zero.
    pub fn record_zero_user_group(&mut self, group: &str) {
        self.stats.zero_user_groups += 1;
        self.issues.add_warning_with_entity(
            "group",
            "group has no users; intensity metrics set to 0 and ASAI to 100%",
            group,
        );
    }

    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let rows = if stats.rows_dropped() == 0 {
            format!("{} rows", stats.rows_read)
        } else {
            format!(
                "{} rows, {} dropped ({} invalid length, {} invalid users)",
                stats.rows_read,
                stats.rows_dropped(),
                stats.rows_dropped_invalid_length,
                stats.rows_dropped_invalid_users
            )
        };
        format!("{} | {}", rows, self.issues.summary())
    }
}

impl std::fmt::Display for RunDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run: {}", self.summary())?;
        for issue in &self.issues.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_counts() {
        let mut diag = Diagnostics::new();
        diag.add_warning_with_entity("construction", "token without colon", "main/S-1");
        diag.add_error_with_entity("segment", "unusable row", "main/S-2");
        diag.add_warning_with_entity("group", "no users", "branch");

        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
    }

    #[test]
    fn test_diagnostic_issue_display() {
        let issue = DiagnosticIssue::new(Severity::Warning, "construction", "token ignored")
            .with_entity("main/S-4");
        assert_eq!(
            issue.to_string(),
            "[warning:construction] token ignored (main/S-4)"
        );

        let issue = DiagnosticIssue::new(Severity::Error, "segment", "negative length");
        assert_eq!(issue.to_string(), "[error:segment] negative length");
    }

    #[test]
    fn test_diagnostics_summary() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.summary(), "No issues");

        diag.add_warning_with_entity("group", "no users", "branch");
        assert_eq!(diag.summary(), "1 warning");

        diag.add_error_with_entity("segment", "error", "x");
        assert_eq!(diag.summary(), "1 warning, 1 error");

        diag.add_warning_with_entity("layout", "ignored", "spur");
        assert_eq!(diag.summary(), "2 warnings, 1 error");
    }

    #[test]
    fn test_issues_by_category() {
        let mut diag = Diagnostics::new();
        diag.add_warning_with_entity("construction", "a", "main/S-1");
        diag.add_error_with_entity("segment", "b", "main/S-2");
        diag.add_warning_with_entity("construction", "c", "main/S-3");

        assert_eq!(diag.issues_by_category("construction").count(), 2);
        assert_eq!(diag.issues_by_category("segment").count(), 1);
        assert_eq!(diag.issues_by_category("layout").count(), 0);
    }

    #[test]
    fn test_dropped_rows_are_errors() {
        let mut diag = RunDiagnostics::new();
        diag.stats.rows_read = 12;
        diag.record_dropped_length("main/S-3", "length is negative");
        diag.record_dropped_users("branch/B-7", "user count is not numeric");
        diag.record_zero_user_group("branch");

        assert_eq!(diag.stats.rows_dropped(), 2);
        assert_eq!(diag.stats.rows_kept(), 10);
        assert_eq!(diag.stats.zero_user_groups, 1);
        assert_eq!(
            diag.summary(),
            "12 rows, 2 dropped (1 invalid length, 1 invalid users) | 1 warning, 2 errors"
        );
    }

    #[test]
    fn test_run_diagnostics_serialization() {
        let mut diag = RunDiagnostics::new();
        diag.stats.rows_read = 2;
        diag.record_dropped_length("main/S-9", "length is missing");

        let json = serde_json::to_string_pretty(&diag).unwrap();
        assert!(json.contains("\"rows_read\": 2"));
        assert!(json.contains("\"severity\": \"error\""));
        assert!(json.contains("\"entity\": \"main/S-9\""));
    }
}
