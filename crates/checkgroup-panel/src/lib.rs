//! # checkgroup-panel
//!
//! **Tier 2 (Panel Seeding)**
//!
//! Walks a dashboard panel definition (a benchmark or a single control)
//! and produces the flat list of check results the grouping layer consumes.
//! Every result carries its benchmark trunk, rooted at a synthetic root
//! seeded from the panel metadata.
//!
//! ## What belongs here
//! * Panel definition and metadata types
//! * The benchmark tree and leaf enumeration
//!
//! ## What does NOT belong here
//! * Grouping (use `checkgroup-model`)
//! * Running controls

#![forbid(unsafe_code)]

mod tree;

use std::collections::BTreeMap;

use checkgroup_types::{CheckResultDimension, CheckResultStatus, CheckSeverity, CheckTags};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tree::{BenchmarkChild, BenchmarkTree, ControlPanel};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("No panel metadata for '{0}'")]
    UnknownPanel(String),
    #[error("Panel '{name}' is neither a benchmark nor a control")]
    UnsupportedRoot { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Benchmark,
    Control,
    #[serde(other)]
    Other,
}

/// Execution state of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    #[default]
    Ready,
    Running,
    Complete,
    Error,
}

/// One evaluated row of a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRow {
    pub status: CheckResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<CheckResultDimension>,
}

/// A benchmark or control panel as the dashboard describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelDefinition {
    pub name: String,
    pub panel_type: PanelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<CheckSeverity>,
    #[serde(default)]
    pub tags: CheckTags,
    #[serde(default)]
    pub status: PanelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub rows: Vec<ControlRow>,
    #[serde(default)]
    pub children: Vec<PanelDefinition>,
}

impl PanelDefinition {
    pub fn benchmark(name: impl Into<String>, children: Vec<PanelDefinition>) -> Self {
        Self {
            children,
            ..Self::empty(name.into(), PanelType::Benchmark)
        }
    }

    pub fn control(name: impl Into<String>, rows: Vec<ControlRow>) -> Self {
        Self {
            status: PanelStatus::Complete,
            rows,
            ..Self::empty(name.into(), PanelType::Control)
        }
    }

    fn empty(name: String, panel_type: PanelType) -> Self {
        Self {
            name,
            panel_type,
            title: None,
            description: None,
            severity: None,
            tags: CheckTags::new(),
            status: PanelStatus::Ready,
            error: None,
            rows: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Display metadata for a panel, looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type PanelsMap = BTreeMap<String, PanelMetadata>;
