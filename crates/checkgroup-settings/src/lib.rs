//! # checkgroup-settings
//!
//! **Tier 1 (Grouping Settings)**
//!
//! The ordered grouping-rule list and everything needed to load it:
//! defaults, TOML/JSON parsing, the compact query-parameter form used in
//! dashboard URLs, and validation.
//!
//! ## What belongs here
//! * Pure settings types with Serde derive
//! * Default values and conversions
//! * Configuration-time validation
//!
//! ## What does NOT belong here
//! * Grouping logic (use `checkgroup-model`)
//! * Persisting settings

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use checkgroup_types::{CheckDisplayGroup, CheckDisplayGroupType};

/// Errors from loading or validating grouping settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read grouping settings: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse grouping TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse grouping JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown grouping type '{name}' at position {position}")]
    UnknownGroupType { position: usize, name: String },

    #[error("Grouping type '{0}' may only appear once")]
    DuplicateGroupType(CheckDisplayGroupType),

    #[error("Grouping '{group_type}' on key '{value}' appears more than once")]
    DuplicateKeyedGroup {
        group_type: CheckDisplayGroupType,
        value: String,
    },
}

/// Ordered grouping rules, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingSettings {
    pub groupings: Vec<CheckDisplayGroup>,
}

impl Default for GroupingSettings {
    fn default() -> Self {
        Self {
            groupings: default_groupings(),
        }
    }
}

/// Benchmark, then control, then the results themselves.
pub fn default_groupings() -> Vec<CheckDisplayGroup> {
    vec![
        CheckDisplayGroup::benchmark(),
        CheckDisplayGroup::control(),
        CheckDisplayGroup::result(),
    ]
}

impl GroupingSettings {
    pub fn new(groupings: Vec<CheckDisplayGroup>) -> Self {
        Self { groupings }
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    /// Parse the compact form `benchmark,tag|service,control`.
    ///
    /// Each comma-separated entry is `type` or `type|value`. Blank entries
    /// are skipped, so an empty string means "no grouping".
    pub fn from_query_param(param: &str) -> Result<Self, SettingsError> {
        let mut groupings = Vec::new();
        for (position, entry) in param
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .enumerate()
        {
            let (name, value) = match entry.split_once('|') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (entry, None),
            };
            let group_type = CheckDisplayGroupType::parse(name);
            if group_type == CheckDisplayGroupType::Other {
                return Err(SettingsError::UnknownGroupType {
                    position,
                    name: name.to_string(),
                });
            }
            groupings.push(CheckDisplayGroup {
                group_type,
                value: value.filter(|v| !v.is_empty()).map(String::from),
            });
        }
        let settings = Self { groupings };
        settings.validate()?;
        Ok(settings)
    }

    /// Inverse of [`GroupingSettings::from_query_param`].
    pub fn to_query_param(&self) -> String {
        self.groupings
            .iter()
            .map(|g| match &g.value {
                Some(value) => format!("{}|{}", g.group_type, value),
                None => g.group_type.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check the rule list is well formed.
    ///
    /// - No unknown types.
    /// - Scalar types (everything but `dimension` and `tag`) at most once.
    /// - `dimension`/`tag` rules may repeat, but only with distinct keys.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut scalars = BTreeSet::new();
        let mut keyed = BTreeSet::new();
        for (position, group) in self.groupings.iter().enumerate() {
            if group.group_type == CheckDisplayGroupType::Other {
                return Err(SettingsError::UnknownGroupType {
                    position,
                    name: group.group_type.to_string(),
                });
            }
            if group.group_type.is_keyed() {
                let value = group.value.clone().unwrap_or_default();
                if !keyed.insert((group.group_type, value.clone())) {
                    return Err(SettingsError::DuplicateKeyedGroup {
                        group_type: group.group_type,
                        value,
                    });
                }
            } else if !scalars.insert(group.group_type) {
                return Err(SettingsError::DuplicateGroupType(group.group_type));
            }
        }
        Ok(())
    }

    /// The rules that introduce a nesting level (`result` removed).
    pub fn nesting_rules(&self) -> impl Iterator<Item = &CheckDisplayGroup> {
        self.groupings
            .iter()
            .filter(|g| g.group_type != CheckDisplayGroupType::Result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_benchmark_control_result() {
        let settings = GroupingSettings::default();
        assert_eq!(settings.to_query_param(), "benchmark,control,result");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn query_param_with_keys() {
        let settings = GroupingSettings::from_query_param("benchmark, tag|service ,dimension|region")
            .unwrap();
        assert_eq!(
            settings.groupings,
            vec![
                CheckDisplayGroup::benchmark(),
                CheckDisplayGroup::tag("service"),
                CheckDisplayGroup::dimension("region"),
            ]
        );
        assert_eq!(
            settings.to_query_param(),
            "benchmark,tag|service,dimension|region"
        );
    }

    #[test]
    fn empty_query_param_is_no_grouping() {
        let settings = GroupingSettings::from_query_param("").unwrap();
        assert!(settings.groupings.is_empty());
    }

    #[test]
    fn unknown_type_in_query_param() {
        let err = GroupingSettings::from_query_param("benchmark,colour").unwrap_err();
        match err {
            SettingsError::UnknownGroupType { position, name } => {
                assert_eq!(position, 1);
                assert_eq!(name, "colour");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_scalar_is_rejected() {
        let settings = GroupingSettings::new(vec![
            CheckDisplayGroup::control(),
            CheckDisplayGroup::control(),
        ]);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::DuplicateGroupType(CheckDisplayGroupType::Control))
        ));
    }

    #[test]
    fn distinct_tag_keys_are_allowed() {
        let settings = GroupingSettings::new(vec![
            CheckDisplayGroup::tag("service"),
            CheckDisplayGroup::tag("owner"),
        ]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn repeated_tag_key_is_rejected() {
        let settings = GroupingSettings::new(vec![
            CheckDisplayGroup::tag("service"),
            CheckDisplayGroup::tag("service"),
        ]);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::DuplicateKeyedGroup { .. })
        ));
    }

    #[test]
    fn nesting_rules_skip_result() {
        let settings = GroupingSettings::default();
        let types: Vec<_> = settings.nesting_rules().map(|g| g.group_type).collect();
        assert_eq!(
            types,
            vec![CheckDisplayGroupType::Benchmark, CheckDisplayGroupType::Control]
        );
    }
}
