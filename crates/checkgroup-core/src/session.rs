//! Memoised grouping with persistent node state.

use std::collections::BTreeSet;

use checkgroup_model::{GroupingOutcome, RootNode, aggregate};
use checkgroup_node_state::{NodeStateAction, NodeStates};
use checkgroup_panel::{BenchmarkTree, PanelDefinition, PanelsMap};
use checkgroup_settings::GroupingSettings;
use checkgroup_types::{CheckDisplayGroup, CheckSummary};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;

/// What consumers of a session read: the seeded benchmark, the grouped
/// tree and the current expand/collapse state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckGroupingContext<'a> {
    pub benchmark: &'a BenchmarkTree,
    pub definition: &'a PanelDefinition,
    pub grouping: &'a RootNode,
    pub groupings_config: &'a [CheckDisplayGroup],
    pub first_child_summaries: &'a [CheckSummary],
    pub node_states: &'a NodeStates,
    pub name_collisions: &'a BTreeSet<String>,
}

#[derive(Debug)]
struct Computed {
    fingerprint: blake3::Hash,
    definition: PanelDefinition,
    benchmark: BenchmarkTree,
    groupings_config: Vec<CheckDisplayGroup>,
    outcome: GroupingOutcome,
}

/// Holds the latest grouping for one panel definition.
///
/// Regrouping happens only when the inputs change. Node state survives
/// regrouping and is reset to the fresh seed only when the rule list
/// itself changes.
#[derive(Debug, Default)]
pub struct GroupingSession {
    computed: Option<Computed>,
    node_states: NodeStates,
}

impl GroupingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regroup if `definition`, `panels` or `rules` differ from the last
    /// call. Returns whether a new grouping was computed.
    ///
    /// Rules are validated like loaded settings (no unknown types, no
    /// repeated scalar type, no repeated keyed rule) before anything else.
    /// On error the previous grouping stays in place.
    pub fn update(
        &mut self,
        definition: &PanelDefinition,
        panels: &PanelsMap,
        rules: &[CheckDisplayGroup],
    ) -> Result<bool, CoreError> {
        GroupingSettings::new(rules.to_vec()).validate()?;
        let fingerprint = fingerprint(definition, panels, rules)?;
        if self
            .computed
            .as_ref()
            .is_some_and(|c| c.fingerprint == fingerprint)
        {
            debug!(panel = definition.name.as_str(), "grouping inputs unchanged");
            return Ok(false);
        }

        let benchmark = BenchmarkTree::from_definition(definition, panels)?;
        let outcome = aggregate(&benchmark.all_control_results(), rules)?;
        debug!(
            panel = definition.name.as_str(),
            groups = outcome.root.children.len(),
            "recomputed grouping"
        );

        let rules_changed = self
            .computed
            .as_ref()
            .is_none_or(|c| c.groupings_config != rules);
        if rules_changed {
            info!(rules = rules.len(), "grouping rules changed; resetting node state");
            self.node_states
                .apply(NodeStateAction::ReplaceAll(outcome.node_states.clone().into_map()));
        }

        self.computed = Some(Computed {
            fingerprint,
            definition: definition.clone(),
            benchmark,
            groupings_config: rules.to_vec(),
            outcome,
        });
        Ok(true)
    }

    /// The current grouping.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoActiveGrouping`] before the first successful
    /// [`update`](Self::update).
    pub fn context(&self) -> Result<CheckGroupingContext<'_>, CoreError> {
        let computed = self.computed.as_ref().ok_or(CoreError::NoActiveGrouping)?;
        Ok(CheckGroupingContext {
            benchmark: &computed.benchmark,
            definition: &computed.definition,
            grouping: &computed.outcome.root,
            groupings_config: &computed.groupings_config,
            first_child_summaries: &computed.outcome.first_child_summaries,
            node_states: &self.node_states,
            name_collisions: &computed.outcome.name_collisions,
        })
    }

    pub fn dispatch(&mut self, action: NodeStateAction) {
        self.node_states.apply(action);
    }

    pub fn node_states(&self) -> &NodeStates {
        &self.node_states
    }
}

fn fingerprint(
    definition: &PanelDefinition,
    panels: &PanelsMap,
    rules: &[CheckDisplayGroup],
) -> Result<blake3::Hash, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&serde_json::to_vec(definition)?);
    hasher.update(b"\n");
    hasher.update(&serde_json::to_vec(panels)?);
    hasher.update(b"\n");
    hasher.update(&serde_json::to_vec(rules)?);
    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkgroup_panel::{ControlRow, PanelMetadata};
    use checkgroup_settings::SettingsError;
    use checkgroup_types::{CheckDisplayGroupType, CheckResultStatus};

    fn panels() -> PanelsMap {
        PanelsMap::from([(
            "cis".to_string(),
            PanelMetadata {
                name: "cis".into(),
                title: Some("CIS".into()),
                description: None,
            },
        )])
    }

    fn definition(status: CheckResultStatus) -> PanelDefinition {
        let row = ControlRow {
            status,
            reason: None,
            resource: None,
            dimensions: vec![],
        };
        PanelDefinition::benchmark(
            "cis",
            vec![PanelDefinition::benchmark(
                "iam",
                vec![PanelDefinition::control("mfa", vec![row])],
            )],
        )
    }

    fn rules() -> Vec<CheckDisplayGroup> {
        vec![CheckDisplayGroup::benchmark(), CheckDisplayGroup::control()]
    }

    #[test]
    fn context_before_update_fails() {
        let session = GroupingSession::new();
        assert!(matches!(session.context(), Err(CoreError::NoActiveGrouping)));
    }

    #[test]
    fn identical_inputs_are_memoised() {
        let mut session = GroupingSession::new();
        let def = definition(CheckResultStatus::Ok);
        assert!(session.update(&def, &panels(), &rules()).unwrap());
        assert!(!session.update(&def, &panels(), &rules()).unwrap());
    }

    #[test]
    fn first_update_seeds_node_state() {
        let mut session = GroupingSession::new();
        session
            .update(&definition(CheckResultStatus::Ok), &panels(), &rules())
            .unwrap();
        let names: Vec<&str> = session.node_states().names().collect();
        assert_eq!(names, vec!["cis", "iam", "mfa"]);
    }

    #[test]
    fn data_change_keeps_node_state() {
        let mut session = GroupingSession::new();
        session
            .update(&definition(CheckResultStatus::Ok), &panels(), &rules())
            .unwrap();
        session.dispatch(NodeStateAction::Expand("iam".into()));

        assert!(session
            .update(&definition(CheckResultStatus::Alarm), &panels(), &rules())
            .unwrap());
        assert!(session.node_states().is_expanded("iam"));
    }

    #[test]
    fn rule_change_resets_node_state() {
        let mut session = GroupingSession::new();
        let def = definition(CheckResultStatus::Ok);
        session.update(&def, &panels(), &rules()).unwrap();
        session.dispatch(NodeStateAction::ExpandAll);

        let by_status = vec![CheckDisplayGroup::new(CheckDisplayGroupType::Status)];
        session.update(&def, &panels(), &by_status).unwrap();

        let names: Vec<&str> = session.node_states().names().collect();
        assert_eq!(names, vec!["OK"]);
        assert!(!session.node_states().is_expanded("OK"));
    }

    #[test]
    fn failed_update_keeps_previous_grouping() {
        let mut session = GroupingSession::new();
        let def = definition(CheckResultStatus::Ok);
        session.update(&def, &panels(), &rules()).unwrap();

        let bad = vec![CheckDisplayGroup::new(CheckDisplayGroupType::Other)];
        assert!(matches!(
            session.update(&def, &panels(), &bad),
            Err(CoreError::Settings(SettingsError::UnknownGroupType { position: 0, .. }))
        ));
        assert_eq!(session.context().unwrap().groupings_config, rules().as_slice());
    }

    #[test]
    fn repeated_rule_type_is_rejected() {
        let mut session = GroupingSession::new();
        let def = definition(CheckResultStatus::Ok);
        session.update(&def, &panels(), &rules()).unwrap();
        session.dispatch(NodeStateAction::Expand("iam".into()));

        let twice = vec![CheckDisplayGroup::control(), CheckDisplayGroup::control()];
        assert!(matches!(
            session.update(&def, &panels(), &twice),
            Err(CoreError::Settings(SettingsError::DuplicateGroupType(
                CheckDisplayGroupType::Control
            )))
        ));
        assert_eq!(session.context().unwrap().groupings_config, rules().as_slice());
        assert!(session.node_states().is_expanded("iam"));
    }

    #[test]
    fn repeated_keyed_rule_is_rejected() {
        let mut session = GroupingSession::new();
        let twice = vec![CheckDisplayGroup::tag("env"), CheckDisplayGroup::tag("env")];
        assert!(matches!(
            session.update(&definition(CheckResultStatus::Ok), &panels(), &twice),
            Err(CoreError::Settings(SettingsError::DuplicateKeyedGroup { .. }))
        ));
        assert!(matches!(session.context(), Err(CoreError::NoActiveGrouping)));
    }
}
