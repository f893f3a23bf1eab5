//! # checkgroup-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the data structures shared by every grouping layer:
//! evaluated check results, the user-configured grouping rules, and the
//! per-status summaries rolled up by the node tree.
//!
//! ## What belongs here
//! * Pure data structs (results, rules, summaries)
//! * Serialization/Deserialization logic
//!
//! ## What does NOT belong here
//! * Key derivation (use `checkgroup-key`)
//! * Tree construction (use `checkgroup-model`)
//! * File I/O

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResultStatus {
    Alarm,
    Error,
    Info,
    Ok,
    Skip,
    Empty,
}

impl CheckResultStatus {
    pub const ALL: [CheckResultStatus; 6] = [
        CheckResultStatus::Alarm,
        CheckResultStatus::Error,
        CheckResultStatus::Info,
        CheckResultStatus::Ok,
        CheckResultStatus::Skip,
        CheckResultStatus::Empty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckResultStatus::Alarm => "alarm",
            CheckResultStatus::Error => "error",
            CheckResultStatus::Info => "info",
            CheckResultStatus::Ok => "ok",
            CheckResultStatus::Skip => "skip",
            CheckResultStatus::Empty => "empty",
        }
    }
}

impl fmt::Display for CheckResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a check result as produced by the evaluation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckResultType {
    Loading,
    Error,
    Empty,
    #[default]
    Result,
}

/// Control severity. Anything outside the four known levels is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSeverity {
    Critical,
    High,
    Medium,
    Low,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckResultDimension {
    pub key: String,
    pub value: String,
}

impl CheckResultDimension {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tags attached to a control, ordered by key.
pub type CheckTags = BTreeMap<String, String>;

/// Find a dimension by key. Keys are unique within one result.
pub fn find_dimension<'a>(
    dimensions: &'a [CheckResultDimension],
    key: &str,
) -> Option<&'a CheckResultDimension> {
    dimensions.iter().find(|d| d.key == key)
}

/// The control a result was evaluated for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlRef {
    pub name: String,
    pub title: String,
    pub sort: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<CheckSeverity>,
}

/// One ancestor benchmark in a result's trunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkRef {
    pub name: String,
    pub title: String,
    pub sort: String,
}

impl BenchmarkRef {
    pub fn new(sort: impl Into<String>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sort: sort.into(),
            name: name.into(),
            title: title.into(),
        }
    }
}

/// One evaluated check.
///
/// `benchmark_trunk` is ordered root-to-parent; element 0 is the synthetic
/// root benchmark (sort `"0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckResultStatus,
    #[serde(rename = "type", default)]
    pub result_type: CheckResultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<CheckResultDimension>,
    #[serde(default)]
    pub tags: CheckTags,
    pub control: ControlRef,
    #[serde(default)]
    pub benchmark_trunk: Vec<BenchmarkRef>,
}

/// Grouping dimension a rule nests by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDisplayGroupType {
    Benchmark,
    Control,
    Dimension,
    Tag,
    Reason,
    Resource,
    Severity,
    Status,
    Result,
    /// A type this build does not understand.
    #[serde(other)]
    Other,
}

impl CheckDisplayGroupType {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckDisplayGroupType::Benchmark => "benchmark",
            CheckDisplayGroupType::Control => "control",
            CheckDisplayGroupType::Dimension => "dimension",
            CheckDisplayGroupType::Tag => "tag",
            CheckDisplayGroupType::Reason => "reason",
            CheckDisplayGroupType::Resource => "resource",
            CheckDisplayGroupType::Severity => "severity",
            CheckDisplayGroupType::Status => "status",
            CheckDisplayGroupType::Result => "result",
            CheckDisplayGroupType::Other => "other",
        }
    }

    /// Parse a rule type name. Unrecognised names map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "benchmark" => CheckDisplayGroupType::Benchmark,
            "control" => CheckDisplayGroupType::Control,
            "dimension" => CheckDisplayGroupType::Dimension,
            "tag" => CheckDisplayGroupType::Tag,
            "reason" => CheckDisplayGroupType::Reason,
            "resource" => CheckDisplayGroupType::Resource,
            "severity" => CheckDisplayGroupType::Severity,
            "status" => CheckDisplayGroupType::Status,
            "result" => CheckDisplayGroupType::Result,
            _ => CheckDisplayGroupType::Other,
        }
    }

    /// Dimension and tag rules carry a key in `value`; the rest are scalar.
    pub fn is_keyed(self) -> bool {
        matches!(
            self,
            CheckDisplayGroupType::Dimension | CheckDisplayGroupType::Tag
        )
    }
}

impl fmt::Display for CheckDisplayGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One level of the user-configured nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckDisplayGroup {
    #[serde(rename = "type")]
    pub group_type: CheckDisplayGroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CheckDisplayGroup {
    pub fn new(group_type: CheckDisplayGroupType) -> Self {
        Self {
            group_type,
            value: None,
        }
    }

    pub fn keyed(group_type: CheckDisplayGroupType, value: impl Into<String>) -> Self {
        Self {
            group_type,
            value: Some(value.into()),
        }
    }

    pub fn benchmark() -> Self {
        Self::new(CheckDisplayGroupType::Benchmark)
    }

    pub fn control() -> Self {
        Self::new(CheckDisplayGroupType::Control)
    }

    pub fn result() -> Self {
        Self::new(CheckDisplayGroupType::Result)
    }

    pub fn dimension(key: impl Into<String>) -> Self {
        Self::keyed(CheckDisplayGroupType::Dimension, key)
    }

    pub fn tag(key: impl Into<String>) -> Self {
        Self::keyed(CheckDisplayGroupType::Tag, key)
    }
}

/// Counts of results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckSummary {
    pub alarm: usize,
    pub error: usize,
    pub info: usize,
    pub ok: usize,
    pub skip: usize,
    pub empty: usize,
}

impl CheckSummary {
    /// A summary with exactly one count in `status`'s bucket.
    pub fn for_status(status: CheckResultStatus) -> Self {
        let mut summary = Self::default();
        *summary.count_mut(status) += 1;
        summary
    }

    pub fn count(&self, status: CheckResultStatus) -> usize {
        match status {
            CheckResultStatus::Alarm => self.alarm,
            CheckResultStatus::Error => self.error,
            CheckResultStatus::Info => self.info,
            CheckResultStatus::Ok => self.ok,
            CheckResultStatus::Skip => self.skip,
            CheckResultStatus::Empty => self.empty,
        }
    }

    fn count_mut(&mut self, status: CheckResultStatus) -> &mut usize {
        match status {
            CheckResultStatus::Alarm => &mut self.alarm,
            CheckResultStatus::Error => &mut self.error,
            CheckResultStatus::Info => &mut self.info,
            CheckResultStatus::Ok => &mut self.ok,
            CheckResultStatus::Skip => &mut self.skip,
            CheckResultStatus::Empty => &mut self.empty,
        }
    }

    pub fn total(&self) -> usize {
        self.alarm + self.error + self.info + self.ok + self.skip + self.empty
    }
}

impl Add for CheckSummary {
    type Output = CheckSummary;

    fn add(mut self, rhs: CheckSummary) -> CheckSummary {
        self += rhs;
        self
    }
}

impl AddAssign for CheckSummary {
    fn add_assign(&mut self, rhs: CheckSummary) {
        for status in CheckResultStatus::ALL {
            *self.count_mut(status) += rhs.count(status);
        }
    }
}

impl Sum for CheckSummary {
    fn sum<I: Iterator<Item = CheckSummary>>(iter: I) -> Self {
        iter.fold(CheckSummary::default(), Add::add)
    }
}
