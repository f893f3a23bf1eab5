//! The grouped check tree.

use serde::Serialize;

use checkgroup_types::{CheckDisplayGroupType, CheckResult, CheckSummary};

/// One node of the grouped tree.
///
/// Group variants own their children; leaf variants wrap exactly one
/// [`CheckResult`], the variant chosen by the result's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckNode {
    Root(RootNode),
    Benchmark(BenchmarkNode),
    KeyValuePair(KeyValuePairNode),
    Control(ControlNode),
    ControlResult(ResultLeaf),
    ControlRunning(ResultLeaf),
    ControlError(ResultLeaf),
    ControlEmptyResult(ResultLeaf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootNode {
    pub children: Vec<CheckNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkNode {
    pub sort: String,
    pub name: String,
    pub title: String,
    pub children: Vec<CheckNode>,
}

/// Generic grouping node for dimension, tag, reason, resource, severity
/// and status rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValuePairNode {
    pub category: CheckDisplayGroupType,
    /// Dimension/tag key, or the category name for scalar types.
    pub key: String,
    /// Human-readable value, used as the label.
    pub key_display: String,
    pub sort_value: String,
    pub children: Vec<CheckNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlNode {
    pub sort: String,
    pub name: String,
    pub title: String,
    pub children: Vec<CheckNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLeaf {
    pub result: CheckResult,
}

impl RootNode {
    pub fn summary(&self) -> CheckSummary {
        self.children.iter().map(CheckNode::summary).sum()
    }

    /// Summaries of the top-level groups, in tree order.
    pub fn first_child_summaries(&self) -> Vec<CheckSummary> {
        self.children.iter().map(CheckNode::summary).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(CheckNode::leaf_count).sum()
    }

    /// Indented outline of the tree, one node per line, root omitted.
    pub fn outline(&self) -> Vec<String> {
        let mut out = Vec::new();
        for child in &self.children {
            child.outline_into(0, &mut out);
        }
        out
    }
}

impl BenchmarkNode {
    /// Absorb `other`'s children, skipping any whose name is already present.
    pub fn merge(&mut self, other: BenchmarkNode) {
        for child in other.children {
            if self.children.iter().any(|c| c.name() == child.name()) {
                continue;
            }
            self.children.push(child);
        }
    }
}

impl CheckNode {
    pub fn name(&self) -> &str {
        match self {
            CheckNode::Root(_) => "root",
            CheckNode::Benchmark(b) => &b.name,
            CheckNode::KeyValuePair(kv) => &kv.key_display,
            CheckNode::Control(c) => &c.name,
            CheckNode::ControlResult(l)
            | CheckNode::ControlRunning(l)
            | CheckNode::ControlError(l)
            | CheckNode::ControlEmptyResult(l) => &l.result.control.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CheckNode::Root(_) => "Root",
            CheckNode::Benchmark(b) => &b.title,
            CheckNode::KeyValuePair(kv) => &kv.key_display,
            CheckNode::Control(c) => &c.title,
            CheckNode::ControlResult(l)
            | CheckNode::ControlRunning(l)
            | CheckNode::ControlError(l)
            | CheckNode::ControlEmptyResult(l) => &l.result.control.title,
        }
    }

    /// Value siblings are ordered by when displayed.
    pub fn sort_key(&self) -> &str {
        match self {
            CheckNode::Root(_) => "0",
            CheckNode::Benchmark(b) => &b.sort,
            CheckNode::KeyValuePair(kv) => &kv.sort_value,
            CheckNode::Control(c) => &c.sort,
            CheckNode::ControlResult(l)
            | CheckNode::ControlRunning(l)
            | CheckNode::ControlError(l)
            | CheckNode::ControlEmptyResult(l) => &l.result.control.sort,
        }
    }

    pub fn children(&self) -> &[CheckNode] {
        match self {
            CheckNode::Root(r) => &r.children,
            CheckNode::Benchmark(b) => &b.children,
            CheckNode::KeyValuePair(kv) => &kv.children,
            CheckNode::Control(c) => &c.children,
            CheckNode::ControlResult(_)
            | CheckNode::ControlRunning(_)
            | CheckNode::ControlError(_)
            | CheckNode::ControlEmptyResult(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<CheckNode>> {
        match self {
            CheckNode::Root(r) => Some(&mut r.children),
            CheckNode::Benchmark(b) => Some(&mut b.children),
            CheckNode::KeyValuePair(kv) => Some(&mut kv.children),
            CheckNode::Control(c) => Some(&mut c.children),
            _ => None,
        }
    }

    pub(crate) fn into_children(self) -> Vec<CheckNode> {
        match self {
            CheckNode::Root(r) => r.children,
            CheckNode::Benchmark(b) => b.children,
            CheckNode::KeyValuePair(kv) => kv.children,
            CheckNode::Control(c) => c.children,
            _ => Vec::new(),
        }
    }

    /// The wrapped result, for leaf variants.
    pub fn result(&self) -> Option<&CheckResult> {
        match self {
            CheckNode::ControlResult(l)
            | CheckNode::ControlRunning(l)
            | CheckNode::ControlError(l)
            | CheckNode::ControlEmptyResult(l) => Some(&l.result),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.result().is_some()
    }

    /// Status counts over this subtree.
    ///
    /// A leaf counts its own status once; every other node is the
    /// pointwise sum of its children.
    pub fn summary(&self) -> CheckSummary {
        match self.result() {
            Some(result) => CheckSummary::for_status(result.status),
            None => self.children().iter().map(CheckNode::summary).sum(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children().iter().map(CheckNode::leaf_count).sum()
    }

    /// Children ordered by sort key, then name. Ties keep tree order.
    pub fn sorted_children(&self) -> Vec<&CheckNode> {
        let mut children: Vec<&CheckNode> = self.children().iter().collect();
        children.sort_by(|a, b| {
            a.sort_key()
                .cmp(b.sort_key())
                .then_with(|| a.name().cmp(b.name()))
        });
        children
    }

    fn outline_into(&self, depth: usize, out: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        match self.result() {
            Some(result) => out.push(format!("{indent}{} ({})", self.name(), result.status)),
            None => out.push(format!("{indent}{}", self.name())),
        }
        for child in self.children() {
            child.outline_into(depth + 1, out);
        }
    }
}
