//! Run configuration: the constants table and the feeder grouping layout.
//!
//! A configuration file is YAML or JSON:
//!
//! ```yaml
//! constants:
//!   cable_fault_rate: 0.09282879      # failures / (km * year)
//!   overhead_fault_rate: 0.15337829   # failures / (km * year)
//!   auto_isolation_time: 0.557        # hours / fault
//!   manual_isolation_time: 2.0        # hours / fault
//!   repair_time: 3.073                # hours / fault
//!   scheduled_outage_rate: 0.0221     # planned outages / (km * year)
//!   scheduled_outage_time: 5.475      # hours / planned outage
//!   annual_hours: 8760                # hours / year
//! groups:
//!   - { key: main, label: Main line }
//!   - { key: branch, label: Branch line }
//! feeder_label: Whole feeder
//! ```
//!
//! The legacy key spellings of older parameter files (`Cable_Fault_Rate`,
//! `Cable_Repair_Time`, `Scheduled_Total_Time`, `Annual_Power_Hours`, ...)
//! are accepted as aliases. Every constant is required; `groups` and
//! `feeder_label` fall back to the main/branch layout.

use crate::error::{FrelError, FrelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Physical and statistical parameters shared by every formula.
///
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// Cable failures per km-year
    #[serde(alias = "Cable_Fault_Rate")]
    pub cable_fault_rate: f64,
    /// Overhead line failures per km-year
    #[serde(alias = "Overhead_Fault_Rate")]
    pub overhead_fault_rate: f64,
    /// Fault isolation hours on an automated segment
    #[serde(alias = "Auto_Isolation_Time")]
    pub auto_isolation_time: f64,
    /// Fault isolation hours on a manually switched segment
    #[serde(alias = "Manual_Isolation_Time")]
    pub manual_isolation_time: f64,
    /// Repair hours per fault, independent of construction type
    #[serde(alias = "Cable_Repair_Time")]
    pub repair_time: f64,
    /// Planned outages per km-year
    #[serde(alias = "Scheduled_Outage_Rate")]
    pub scheduled_outage_rate: f64,
    /// Hours per planned outage
    #[serde(alias = "Scheduled_Total_Time")]
    pub scheduled_outage_time: f64,
    /// Reference hours in the study period (8760 for a common year)
    #[serde(alias = "Annual_Power_Hours")]
    pub annual_hours: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            cable_fault_rate: 0.09282879,
            overhead_fault_rate: 0.15337829,
            auto_isolation_time: 0.557,
            manual_isolation_time: 2.0,
            repair_time: 3.073,
            scheduled_outage_rate: 0.0221,
            scheduled_outage_time: 5.475,
            annual_hours: 8760.0,
        }
    }
}

impl Constants {
    /// Named view over every constant, in declaration order.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("cable_fault_rate", self.cable_fault_rate),
            ("overhead_fault_rate", self.overhead_fault_rate),
            ("auto_isolation_time", self.auto_isolation_time),
            ("manual_isolation_time", self.manual_isolation_time),
            ("repair_time", self.repair_time),
            ("scheduled_outage_rate", self.scheduled_outage_rate),
            ("scheduled_outage_time", self.scheduled_outage_time),
            ("annual_hours", self.annual_hours),
        ]
    }

    /// Every constant must be a positive finite number.
    pub fn validate(&self) -> FrelResult<()> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value <= 0.0 {
                return Err(FrelError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }

    /// Isolation hours for a segment given its automation status.
    pub fn isolation_time(&self, automated: bool) -> f64 {
        if automated {
            self.auto_isolation_time
        } else {
            self.manual_isolation_time
        }
    }
}

/// One named set of segments sharing a user-count denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Key used to match input rows to this group (e.g. "main")
    pub key: String,
    /// Label written to summary records (e.g. "Main line")
    pub label: String,
}

impl GroupSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

fn default_groups() -> Vec<GroupSpec> {
    vec![
        GroupSpec::new("main", "Main line"),
        GroupSpec::new("branch", "Branch line"),
    ]
}

fn default_feeder_label() -> String {
    "Whole feeder".to_string()
}

/// Everything a feeder run needs besides the segment rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    pub constants: Constants,
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupSpec>,
    #[serde(default = "default_feeder_label")]
    pub feeder_label: String,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            constants: Constants::default(),
            groups: default_groups(),
            feeder_label: default_feeder_label(),
        }
    }
}

impl ReliabilityConfig {
    pub fn with_constants(constants: Constants) -> Self {
        Self {
            constants,
            ..Self::default()
        }
    }

    pub fn with_groups(mut self, groups: Vec<GroupSpec>) -> Self {
        self.groups = groups;
        self
    }

    pub fn group(&self, key: &str) -> Option<&GroupSpec> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Check constants and grouping layout. Any failure here is fatal.
    pub fn validate(&self) -> FrelResult<()> {
        self.constants.validate()?;

        if self.groups.is_empty() {
            return Err(FrelError::Config(
                "at least one segment group must be configured".into(),
            ));
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.key.trim().is_empty() {
                return Err(FrelError::Config("group key cannot be empty".into()));
            }
            if !seen.insert(group.key.as_str()) {
                return Err(FrelError::Config(format!(
                    "duplicate group key '{}'",
                    group.key
                )));
            }
        }
        if self.feeder_label.trim().is_empty() {
            return Err(FrelError::Config("feeder_label cannot be empty".into()));
        }
        Ok(())
    }

    pub fn from_yaml_str(data: &str) -> FrelResult<Self> {
        let config: Self = serde_yaml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(data: &str) -> FrelResult<Self> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }
}

/// Load and validate a configuration file, choosing the format by extension.
pub fn load_config_from_path(path: &Path) -> FrelResult<ReliabilityConfig> {
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            ReliabilityConfig::from_yaml_str(&data)
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => ReliabilityConfig::from_json_str(&data),
        _ => {
            let config: ReliabilityConfig = serde_yaml::from_str(&data)
                .or_else(|_| serde_json::from_str(&data))
                .map_err(|err: serde_json::Error| {
                    FrelError::Parse(format!(
                        "'{}' is neither YAML nor JSON: {}",
                        path.display(),
                        err
                    ))
                })?;
            config.validate()?;
            Ok(config)
        }
    }
}
