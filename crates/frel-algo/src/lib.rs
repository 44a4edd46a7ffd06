//! # frel-algo: Feeder Reliability Indices
//!
//! Computes SAIDI, SAIFI and ASAI for a 10 kV distribution feeder from a
//! segment-level description of its main trunk and branches.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Construction parsing | [`construction`] | [`ConstructionMix`] (cable/overhead weights, fault rate) |
//! | Row normalization | [`segment`] | [`Segment`] (typed, invalid rows dropped) |
//! | Segment indices | [`indicators`] | [`SegmentIndicators`] per segment |
//! | Group aggregation | [`aggregate`] | [`GroupSummary`] |
//! | Feeder combination | [`combine`] | feeder [`SummaryRecord`] |
//! | Orchestration | [`pipeline`] | [`FeederReport`] |
//!
//! Group indices are computed against each group's own user total. The
//! feeder row is a user-weighted mean of the group rows, never a plain sum,
//! and its ASAI is derived from the combined SAIDI.
//!
//! ## Example
//!
//! ```
//! use frel_algo::{run_feeder, FeederInput, RawSegmentRow};
//! use frel_core::ReliabilityConfig;
//!
//! let input = FeederInput::new("F-01")
//!     .with_group(
//!         "main",
//!         vec![RawSegmentRow::new("M-1", 2.0, 100, true, "PD_VLY-300: 100%")],
//!     )
//!     .with_group(
//!         "branch",
//!         vec![RawSegmentRow::new("B-1", 1.0, 20, false, "PD_JKLYJ-150: 100%")],
//!     );
//!
//! let report = run_feeder(&ReliabilityConfig::default(), &input).unwrap();
//! assert_eq!(report.summary_rows().len(), 3);
//! assert_eq!(report.feeder.total_users, 120);
//! ```

pub mod aggregate;
pub mod combine;
pub mod construction;
pub mod indicators;
pub mod pipeline;
pub mod report;
pub mod segment;

pub use aggregate::{asai_percent, summarize_group, GroupSummary};
pub use combine::combine_summaries;
pub use construction::{
    parse_construction, tokenize, ConstructionKind, ConstructionMix, ConstructionToken,
    MalformedReason, TokenOutcome,
};
pub use indicators::{
    compute_indicators, evaluate_segments, group_total_users, EvaluatedSegment, SegmentIndicators,
};
pub use pipeline::{run_feeder, FeederInput, FeederReport, GroupInput, GroupReport};
pub use report::{round_to, SegmentRecord, SummaryRecord, INDICATOR_DECIMALS, LENGTH_DECIMALS};
pub use segment::{
    normalize_row, normalize_rows, AutomationFlag, RawSegmentRow, RawValue, RowRejection, Segment,
    MAX_SEGMENT_USERS,
};
