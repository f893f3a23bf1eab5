//! # checkgroup-node-state
//!
//! **Tier 1 (Node State)**
//!
//! Tracks which nodes of a grouped check tree are expanded. State is keyed
//! by node name, independently of the tree shape, and only changes through
//! the closed set of [`NodeStateAction`]s.
//!
//! Names are not unique across branches: two nodes that share a name share
//! one entry and toggle together. The aggregator reports names claimed by
//! nodes of different kinds so callers can detect that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub expanded: bool,
}

impl NodeState {
    pub const COLLAPSED: NodeState = NodeState { expanded: false };
    pub const EXPANDED: NodeState = NodeState { expanded: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NodeStateAction {
    /// Discard all state and install the supplied map.
    ReplaceAll(BTreeMap<String, NodeState>),
    CollapseAll,
    ExpandAll,
    Collapse(String),
    Expand(String),
}

/// Expansion state per node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeStates {
    nodes: BTreeMap<String, NodeState>,
}

impl NodeStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry as collapsed, overwriting any previous entry.
    pub fn seed_collapsed(&mut self, name: impl Into<String>) {
        self.nodes.insert(name.into(), NodeState::COLLAPSED);
    }

    pub fn apply(&mut self, action: NodeStateAction) {
        match action {
            NodeStateAction::ReplaceAll(nodes) => self.nodes = nodes,
            NodeStateAction::CollapseAll => self.set_all(false),
            NodeStateAction::ExpandAll => self.set_all(true),
            NodeStateAction::Collapse(name) => self.set(name, false),
            NodeStateAction::Expand(name) => self.set(name, true),
        }
    }

    fn set_all(&mut self, expanded: bool) {
        for state in self.nodes.values_mut() {
            state.expanded = expanded;
        }
    }

    fn set(&mut self, name: String, expanded: bool) {
        self.nodes.entry(name).or_default().expanded = expanded;
    }

    pub fn get(&self, name: &str) -> Option<NodeState> {
        self.nodes.get(name).copied()
    }

    /// Unknown names read as collapsed.
    pub fn is_expanded(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.expanded)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeState)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn into_map(self) -> BTreeMap<String, NodeState> {
        self.nodes
    }
}

impl From<BTreeMap<String, NodeState>> for NodeStates {
    fn from(nodes: BTreeMap<String, NodeState>) -> Self {
        Self { nodes }
    }
}
