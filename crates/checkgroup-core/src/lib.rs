//! # checkgroup-core
//!
//! This crate is the **primary library interface** for `checkgroup`.
//! It coordinates panel seeding, settings and aggregation to turn a
//! benchmark run into a grouped check tree.
//!
//! If you are embedding `checkgroup` into another Rust application, depend
//! on this crate and `checkgroup-types`. Avoid depending on
//! `checkgroup-model` or `checkgroup-panel` directly unless necessary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use checkgroup_core::{GroupingSession, grouping_workflow};
//! use checkgroup_core::panel::{PanelDefinition, PanelsMap};
//! use checkgroup_core::settings::GroupingSettings;
//!
//! let definition: PanelDefinition = todo!();
//! let panels: PanelsMap = todo!();
//!
//! // One-shot grouping with the default rules
//! let outcome = grouping_workflow(&definition, &panels, &GroupingSettings::default())?;
//! println!("{} top-level groups", outcome.root.children.len());
//!
//! // Long-lived session keeping expand/collapse state across updates
//! let mut session = GroupingSession::new();
//! session.update(&definition, &panels, &GroupingSettings::default().groupings)?;
//! let context = session.context()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod session;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

pub use checkgroup_model as model;
pub use checkgroup_node_state as node_state;
pub use checkgroup_panel as panel;
pub use checkgroup_settings as settings;
pub use checkgroup_types as types;

pub use error::CoreError;
pub use session::{CheckGroupingContext, GroupingSession};

use checkgroup_model::{GroupingError, GroupingOutcome};
use checkgroup_panel::{BenchmarkTree, PanelDefinition, PanelsMap};
use checkgroup_settings::GroupingSettings;
use checkgroup_types::{CheckDisplayGroup, CheckDisplayGroupType, CheckResult};

/// Group already-flattened results by `rules`.
pub fn group_check_results(
    results: &[CheckResult],
    rules: &[CheckDisplayGroup],
) -> Result<GroupingOutcome, GroupingError> {
    checkgroup_model::aggregate(results, rules)
}

/// Runs the complete grouping workflow: Validate -> Seed -> Aggregate.
pub fn grouping_workflow(
    definition: &PanelDefinition,
    panels: &PanelsMap,
    settings: &GroupingSettings,
) -> Result<GroupingOutcome> {
    // 1. Settings
    settings.validate().context("invalid grouping settings")?;

    // 2. Seed the benchmark tree and flatten it
    let benchmark = BenchmarkTree::from_definition(definition, panels)
        .with_context(|| format!("failed to seed benchmark '{}'", definition.name))?;
    let results = benchmark.all_control_results();

    // 3. Aggregate
    checkgroup_model::aggregate(&results, &settings.groupings)
        .context("failed to group check results")
}

/// [`grouping_workflow`] with settings loaded from a TOML or JSON file.
pub fn grouping_workflow_from_file(
    definition: &PanelDefinition,
    panels: &PanelsMap,
    settings_path: &Path,
) -> Result<GroupingOutcome> {
    let settings = GroupingSettings::from_file(settings_path).with_context(|| {
        format!(
            "failed to load grouping settings from {}",
            settings_path.display()
        )
    })?;
    grouping_workflow(definition, panels, &settings)
}

/// Values a grouping rule of `group_type` can take for this panel, as a
/// rule editor would offer them.
pub fn available_values(
    definition: &PanelDefinition,
    panels: &PanelsMap,
    group_type: CheckDisplayGroupType,
) -> Result<BTreeSet<String>> {
    let benchmark = BenchmarkTree::from_definition(definition, panels)
        .with_context(|| format!("failed to seed benchmark '{}'", definition.name))?;
    Ok(checkgroup_key::known_values(
        &benchmark.all_control_results(),
        group_type,
    ))
}
