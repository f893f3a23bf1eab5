//! Single-responsibility grouping-key derivation for deterministic grouping.
//!
//! Every function here is pure: the same result and rule always produce the
//! same key. Missing fields never fail; they resolve to a sentinel so that
//! "not set" results group together and sort last.

use std::collections::BTreeSet;

use checkgroup_types::{
    CheckDisplayGroup, CheckDisplayGroupType, CheckResult, CheckResultDimension,
    CheckResultStatus, CheckSeverity, CheckTags, find_dimension,
};

pub const DIMENSION_KEY_NOT_SET: &str = "Dimension key not set";
pub const TAG_KEY_NOT_SET: &str = "Tag key not set";
pub const NO_REASON: &str = "No reason specified.";
pub const NO_RESOURCE: &str = "No resource";
pub const UNSPECIFIED_SEVERITY: &str = "Unspecified";
pub const UNKNOWN_STATUS: &str = "Unknown";
pub const OTHER: &str = "Other";

/// Sort value for "not set" entries. Nothing sorts after the last code point.
pub const NOT_SET_SORT: &str = "\u{10FFFF}";

/// Display key for a dimension rule.
#[must_use]
pub fn dimension_key(dimension_key: Option<&str>, dimensions: &[CheckResultDimension]) -> String {
    let Some(key) = dimension_key.filter(|k| !k.is_empty()) else {
        return DIMENSION_KEY_NOT_SET.to_string();
    };
    match find_dimension(dimensions, key) {
        Some(found) => found.value.clone(),
        None => format!("Dimension {key} not set"),
    }
}

/// Display key for a tag rule. An empty tag value counts as not set.
#[must_use]
pub fn tag_key(tag_key: Option<&str>, tags: &CheckTags) -> String {
    let Some(key) = tag_key.filter(|k| !k.is_empty()) else {
        return TAG_KEY_NOT_SET.to_string();
    };
    match tags.get(key).filter(|v| !v.is_empty()) {
        Some(value) => value.clone(),
        None => format!("Tag {key} not set"),
    }
}

#[must_use]
pub fn reason_key(reason: Option<&str>) -> String {
    non_empty(reason).unwrap_or(NO_REASON).to_string()
}

#[must_use]
pub fn resource_key(resource: Option<&str>) -> String {
    non_empty(resource).unwrap_or(NO_RESOURCE).to_string()
}

#[must_use]
pub fn severity_key(severity: Option<CheckSeverity>) -> &'static str {
    match severity {
        Some(CheckSeverity::Critical) => "Critical",
        Some(CheckSeverity::High) => "High",
        Some(CheckSeverity::Medium) => "Medium",
        Some(CheckSeverity::Low) => "Low",
        Some(CheckSeverity::Other) | None => UNSPECIFIED_SEVERITY,
    }
}

/// Critical first, unspecified last.
#[must_use]
pub fn severity_sort_key(severity: Option<CheckSeverity>) -> &'static str {
    match severity {
        Some(CheckSeverity::Critical) => "0",
        Some(CheckSeverity::High) => "1",
        Some(CheckSeverity::Medium) => "2",
        Some(CheckSeverity::Low) => "3",
        Some(CheckSeverity::Other) | None => "4",
    }
}

#[must_use]
pub fn status_key(status: CheckResultStatus) -> &'static str {
    match status {
        CheckResultStatus::Alarm => "Alarm",
        CheckResultStatus::Error => "Error",
        CheckResultStatus::Info => "Info",
        CheckResultStatus::Ok => "OK",
        CheckResultStatus::Skip => "Skip",
        CheckResultStatus::Empty => UNKNOWN_STATUS,
    }
}

/// Error first, unknown last.
#[must_use]
pub fn status_sort_key(status: CheckResultStatus) -> &'static str {
    match status {
        CheckResultStatus::Error => "0",
        CheckResultStatus::Alarm => "1",
        CheckResultStatus::Ok => "2",
        CheckResultStatus::Info => "3",
        CheckResultStatus::Skip => "4",
        CheckResultStatus::Empty => "5",
    }
}

/// Compute the grouping key of `result` under `rule`.
///
/// Rules:
/// - `None` means the result bypasses this nesting level. Only `benchmark`
///   rules produce it, for results whose trunk holds nothing beyond the
///   synthetic root.
/// - `benchmark` groups by the nearest ancestor (last trunk element).
/// - Unrecognised types, and `result`, resolve to `"Other"`.
#[must_use]
pub fn resolve_key(result: &CheckResult, rule: &CheckDisplayGroup) -> Option<String> {
    let key = match rule.group_type {
        CheckDisplayGroupType::Dimension => dimension_key(rule.value.as_deref(), &result.dimensions),
        CheckDisplayGroupType::Tag => tag_key(rule.value.as_deref(), &result.tags),
        CheckDisplayGroupType::Reason => reason_key(result.reason.as_deref()),
        CheckDisplayGroupType::Resource => resource_key(result.resource.as_deref()),
        CheckDisplayGroupType::Severity => severity_key(result.control.severity).to_string(),
        CheckDisplayGroupType::Status => status_key(result.status).to_string(),
        CheckDisplayGroupType::Benchmark => {
            if result.benchmark_trunk.len() <= 1 {
                return None;
            }
            result.benchmark_trunk.last()?.name.clone()
        }
        CheckDisplayGroupType::Control => result.control.name.clone(),
        CheckDisplayGroupType::Result | CheckDisplayGroupType::Other => OTHER.to_string(),
    };
    Some(key)
}

/// Compute the value siblings are ordered by at render time.
#[must_use]
pub fn sort_key(result: &CheckResult, rule: &CheckDisplayGroup) -> String {
    match rule.group_type {
        CheckDisplayGroupType::Dimension => rule
            .value
            .as_deref()
            .filter(|k| !k.is_empty())
            .and_then(|k| find_dimension(&result.dimensions, k))
            .map_or_else(|| NOT_SET_SORT.to_string(), |d| d.value.clone()),
        CheckDisplayGroupType::Tag => rule
            .value
            .as_deref()
            .filter(|k| !k.is_empty())
            .and_then(|k| result.tags.get(k))
            .filter(|v| !v.is_empty())
            .map_or_else(|| NOT_SET_SORT.to_string(), |v| v.clone()),
        CheckDisplayGroupType::Reason => non_empty(result.reason.as_deref())
            .unwrap_or(NOT_SET_SORT)
            .to_string(),
        CheckDisplayGroupType::Resource => non_empty(result.resource.as_deref())
            .unwrap_or(NOT_SET_SORT)
            .to_string(),
        CheckDisplayGroupType::Severity => severity_sort_key(result.control.severity).to_string(),
        CheckDisplayGroupType::Status => status_sort_key(result.status).to_string(),
        CheckDisplayGroupType::Benchmark => result
            .benchmark_trunk
            .last()
            .map_or_else(|| OTHER.to_string(), |b| b.sort.clone()),
        CheckDisplayGroupType::Control => result.control.sort.clone(),
        CheckDisplayGroupType::Result | CheckDisplayGroupType::Other => OTHER.to_string(),
    }
}

/// Values a rule of `group_type` can take across `results`.
///
/// For `dimension` and `tag` these are the available keys (what a rule's
/// `value` may name); for every other type they are the display keys the
/// rule would group by.
#[must_use]
pub fn known_values(results: &[CheckResult], group_type: CheckDisplayGroupType) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for result in results {
        match group_type {
            CheckDisplayGroupType::Dimension => {
                out.extend(result.dimensions.iter().map(|d| d.key.clone()));
            }
            CheckDisplayGroupType::Tag => {
                out.extend(result.tags.keys().cloned());
            }
            CheckDisplayGroupType::Benchmark => {
                out.extend(result.benchmark_trunk.iter().skip(1).map(|b| b.name.clone()));
            }
            CheckDisplayGroupType::Result | CheckDisplayGroupType::Other => {}
            scalar => {
                if let Some(key) = resolve_key(result, &CheckDisplayGroup::new(scalar)) {
                    out.insert(key);
                }
            }
        }
    }
    out
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
