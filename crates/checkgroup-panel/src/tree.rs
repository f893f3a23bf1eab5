use checkgroup_types::{
    BenchmarkRef, CheckResult, CheckResultStatus, CheckResultType, CheckSeverity, CheckTags,
    ControlRef,
};
use serde::Serialize;
use tracing::debug;

use crate::{ControlRow, PanelDefinition, PanelError, PanelStatus, PanelType, PanelsMap};

/// A benchmark with its nested benchmarks and controls, in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkTree {
    pub sort: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub children: Vec<BenchmarkChild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel_type", rename_all = "snake_case")]
pub enum BenchmarkChild {
    Benchmark(BenchmarkTree),
    Control(ControlPanel),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlPanel {
    pub sort: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<CheckSeverity>,
    pub tags: CheckTags,
    pub status: PanelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rows: Vec<ControlRow>,
}

impl BenchmarkTree {
    /// Seed the synthetic root from `panels` and walk `definition`.
    ///
    /// A control definition becomes the only child of its own root.
    ///
    /// # Errors
    ///
    /// [`PanelError::UnknownPanel`] when `panels` has no entry for the
    /// definition, [`PanelError::UnsupportedRoot`] when it is neither a
    /// benchmark nor a control.
    pub fn from_definition(
        definition: &PanelDefinition,
        panels: &PanelsMap,
    ) -> Result<Self, PanelError> {
        let meta = panels
            .get(&definition.name)
            .ok_or_else(|| PanelError::UnknownPanel(definition.name.clone()))?;

        let children = match definition.panel_type {
            PanelType::Benchmark => nested_children(&definition.children, panels),
            PanelType::Control => vec![BenchmarkChild::Control(ControlPanel::from_definition(
                position_sort(0),
                definition,
                panels,
            ))],
            PanelType::Other => {
                return Err(PanelError::UnsupportedRoot {
                    name: definition.name.clone(),
                });
            }
        };

        let tree = Self {
            sort: "0".to_string(),
            name: meta.name.clone(),
            title: meta.title.clone().unwrap_or_else(|| meta.name.clone()),
            description: meta.description.clone(),
            children,
        };
        debug!(root = tree.name.as_str(), children = tree.children.len(), "seeded benchmark tree");
        Ok(tree)
    }

    fn nested(sort: String, definition: &PanelDefinition, panels: &PanelsMap) -> Self {
        let meta = panels.get(&definition.name);
        Self {
            sort,
            name: definition.name.clone(),
            title: display_title(definition, panels),
            description: definition
                .description
                .clone()
                .or_else(|| meta.and_then(|m| m.description.clone())),
            children: nested_children(&definition.children, panels),
        }
    }

    pub fn benchmark_ref(&self) -> BenchmarkRef {
        BenchmarkRef::new(self.sort.clone(), self.name.clone(), self.title.clone())
    }

    /// Every control result beneath this benchmark, in definition order.
    ///
    /// Each result's trunk runs from this benchmark down to the control's
    /// parent.
    pub fn all_control_results(&self) -> Vec<CheckResult> {
        let mut out = Vec::new();
        let mut trunk = Vec::new();
        self.collect(&mut trunk, &mut out);
        out
    }

    fn collect(&self, trunk: &mut Vec<BenchmarkRef>, out: &mut Vec<CheckResult>) {
        trunk.push(self.benchmark_ref());
        for child in &self.children {
            match child {
                BenchmarkChild::Benchmark(benchmark) => benchmark.collect(trunk, out),
                BenchmarkChild::Control(control) => out.extend(control.results(trunk)),
            }
        }
        trunk.pop();
    }
}

impl ControlPanel {
    fn from_definition(sort: String, definition: &PanelDefinition, panels: &PanelsMap) -> Self {
        Self {
            sort,
            name: definition.name.clone(),
            title: display_title(definition, panels),
            severity: definition.severity,
            tags: definition.tags.clone(),
            status: definition.status,
            error: definition.error.clone(),
            rows: definition.rows.clone(),
        }
    }

    pub fn control_ref(&self) -> ControlRef {
        ControlRef {
            name: self.name.clone(),
            title: self.title.clone(),
            sort: self.sort.clone(),
            severity: self.severity,
        }
    }

    /// Results for this control under `trunk`.
    ///
    /// A running control yields one loading placeholder, a failed control
    /// one error result, and a control without rows one empty result.
    pub fn results(&self, trunk: &[BenchmarkRef]) -> Vec<CheckResult> {
        let placeholder = |status, result_type, reason: Option<String>| CheckResult {
            status,
            result_type,
            reason,
            resource: None,
            dimensions: Vec::new(),
            tags: self.tags.clone(),
            control: self.control_ref(),
            benchmark_trunk: trunk.to_vec(),
        };

        match self.status {
            PanelStatus::Running => {
                vec![placeholder(CheckResultStatus::Empty, CheckResultType::Loading, None)]
            }
            PanelStatus::Error => vec![placeholder(
                CheckResultStatus::Error,
                CheckResultType::Error,
                self.error.clone(),
            )],
            PanelStatus::Ready | PanelStatus::Complete if self.rows.is_empty() => {
                vec![placeholder(CheckResultStatus::Empty, CheckResultType::Empty, None)]
            }
            PanelStatus::Ready | PanelStatus::Complete => self
                .rows
                .iter()
                .map(|row| CheckResult {
                    status: row.status,
                    result_type: CheckResultType::Result,
                    reason: row.reason.clone(),
                    resource: row.resource.clone(),
                    dimensions: row.dimensions.clone(),
                    tags: self.tags.clone(),
                    control: self.control_ref(),
                    benchmark_trunk: trunk.to_vec(),
                })
                .collect(),
        }
    }
}

fn nested_children(children: &[PanelDefinition], panels: &PanelsMap) -> Vec<BenchmarkChild> {
    children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| match child.panel_type {
            PanelType::Benchmark => Some(BenchmarkChild::Benchmark(BenchmarkTree::nested(
                position_sort(i),
                child,
                panels,
            ))),
            PanelType::Control => Some(BenchmarkChild::Control(ControlPanel::from_definition(
                position_sort(i),
                child,
                panels,
            ))),
            PanelType::Other => None,
        })
        .collect()
}

fn display_title(definition: &PanelDefinition, panels: &PanelsMap) -> String {
    definition
        .title
        .clone()
        .or_else(|| panels.get(&definition.name).and_then(|m| m.title.clone()))
        .unwrap_or_else(|| definition.name.clone())
}

fn position_sort(index: usize) -> String {
    format!("{index:05}")
}
