//! Construction-method descriptors: parsing into cable/overhead weights.
//!
//! A descriptor lists the construction types found along a segment, one
//! `NAME: PERCENT%` token per line:
//!
//! ```text
//! PD_JKLYJ-300: 50.00%
//! PD_VLY-8.7/10-3×300: 50.00%
//! ```
//!
//! Names containing `JK` (overhead insulated conductor codes) count as
//! overhead line; every other name counts as cable. A token named `None`
//! marks length of unknown construction and is left out of the weighting
//! entirely, so known weights are renormalized over what is classified.
//!
//! Parsing happens in two steps. [`tokenize`] turns the text into a list of
//! [`TokenOutcome`]s without doing any arithmetic, then [`parse_construction`]
//! folds the weighted tokens into a [`ConstructionMix`].

use frel_core::Constants;
use serde::Serialize;
use std::fmt;

/// Construction bucket a token's weight accumulates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructionKind {
    Cable,
    Overhead,
}

impl ConstructionKind {
    /// Classify a construction name. Any name containing `JK` (case-insensitive)
    /// is overhead, everything else is cable.
    pub fn classify(name: &str) -> Self {
        if name.to_uppercase().contains("JK") {
            ConstructionKind::Overhead
        } else {
            ConstructionKind::Cable
        }
    }
}

/// A classified `(category, weight)` pair; weight is a fraction (50% = 0.5).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionToken {
    pub name: String,
    pub kind: ConstructionKind,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    /// No `:` between name and percentage
    MissingSeparator,
    /// The part after the last `:` is not a non-negative number
    BadPercentage,
}

/// Result of reading one line of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenOutcome {
    Weighted(ConstructionToken),
    /// `None` or an empty name: excluded from weighting and classification
    Unclassified { name: String },
    /// Silently dropped
    Malformed { raw: String, reason: MalformedReason },
}

/// Split a descriptor into tokens. Lines may end in `\n`, `\r\n` or `\r`;
/// blank lines are ignored.
pub fn tokenize(descriptor: &str) -> Vec<TokenOutcome> {
    descriptor
        .split(|c: char| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(read_token)
        .collect()
}

fn read_token(line: &str) -> TokenOutcome {
    // Names can carry colons of their own, the percentage follows the last one.
    let Some((name_raw, percent_raw)) = line.rsplit_once(':') else {
        return TokenOutcome::Malformed {
            raw: line.to_string(),
            reason: MalformedReason::MissingSeparator,
        };
    };

    let name = name_raw.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("NONE") {
        return TokenOutcome::Unclassified {
            name: name.to_string(),
        };
    }

    match parse_percentage(percent_raw) {
        Some(weight) => TokenOutcome::Weighted(ConstructionToken {
            name: name.to_string(),
            kind: ConstructionKind::classify(name),
            weight,
        }),
        None => TokenOutcome::Malformed {
            raw: line.to_string(),
            reason: MalformedReason::BadPercentage,
        },
    }
}

/// `" 71.43 % "` -> `Some(0.7143)`. Negative shares are rejected so that
/// both normalized weights stay within `[0, 1]`.
fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value / 100.0)
}

/// Normalized construction weights of one segment and the resulting fault rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionMix {
    pub tokens: Vec<ConstructionToken>,
    pub cable_weight: f64,
    pub overhead_weight: f64,
    /// Weighted failures per km-year
    pub fault_rate: f64,
    /// True when no weighted token was found and 100% overhead was assumed
    pub defaulted: bool,
    pub malformed_tokens: usize,
    pub unclassified_tokens: usize,
}

impl ConstructionMix {
    /// Human readable split, e.g. `Cable 16.7% + Overhead 83.3%`. Display only.
    pub fn label(&self) -> String {
        format!(
            "Cable {:.1}% + Overhead {:.1}%",
            self.cable_weight * 100.0,
            self.overhead_weight * 100.0
        )
    }
}

impl fmt::Display for ConstructionMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parse a descriptor into normalized weights and a weighted fault rate.
///
/// When the weighted tokens sum to zero or less (empty text, only `None`
/// tokens, only malformed tokens) the segment is treated as pure overhead.
pub fn parse_construction(descriptor: &str, constants: &Constants) -> ConstructionMix {
    let mut tokens = Vec::new();
    let mut malformed_tokens = 0;
    let mut unclassified_tokens = 0;
    let mut cable = 0.0;
    let mut overhead = 0.0;

    for outcome in tokenize(descriptor) {
        match outcome {
            TokenOutcome::Weighted(token) => {
                match token.kind {
                    ConstructionKind::Cable => cable += token.weight,
                    ConstructionKind::Overhead => overhead += token.weight,
                }
                tokens.push(token);
            }
            TokenOutcome::Unclassified { .. } => unclassified_tokens += 1,
            TokenOutcome::Malformed { .. } => malformed_tokens += 1,
        }
    }

    let mut total = cable + overhead;
    let defaulted = total <= 0.0;
    if defaulted {
        cable = 0.0;
        overhead = 1.0;
        total = 1.0;
    }

    let cable_weight = cable / total;
    let overhead_weight = overhead / total;
    let fault_rate =
        cable_weight * constants.cable_fault_rate + overhead_weight * constants.overhead_fault_rate;

    ConstructionMix {
        tokens,
        cable_weight,
        overhead_weight,
        fault_rate,
        defaulted,
        malformed_tokens,
        unclassified_tokens,
    }
}
