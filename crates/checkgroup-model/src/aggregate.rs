//! Multi-level aggregation of check results into a grouped tree.

use std::collections::{BTreeSet, HashMap};

use checkgroup_key::resolve_key;
use checkgroup_node_state::NodeStates;
use checkgroup_types::{
    CheckDisplayGroup, CheckDisplayGroupType, CheckResult, CheckSummary,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::arena::{NodeArena, NodeId, ROOT};
use crate::error::GroupingError;
use crate::factory::{leaf_node, make_node};
use crate::node::{CheckNode, RootNode};
use crate::trunk::BenchmarkChildrenLookup;

/// Everything one aggregation pass produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingOutcome {
    pub root: RootNode,
    /// Every grouping node name seeded as collapsed.
    pub node_states: NodeStates,
    /// Summaries of the top-level groups, in tree order.
    pub first_child_summaries: Vec<CheckSummary>,
    /// Node-state names claimed by nodes of more than one category. Such
    /// nodes share one expand/collapse entry.
    pub name_collisions: BTreeSet<String>,
}

/// A group at one nesting position: the node it fills plus the groups
/// already opened beneath it.
struct Bucket {
    container: NodeId,
    sub: HashMap<String, usize>,
}

impl Bucket {
    fn new(container: NodeId) -> Self {
        Self {
            container,
            sub: HashMap::new(),
        }
    }
}

/// Identity of the group a result joins under `rule`.
///
/// Benchmark groups are told apart by their whole trunk, so two benchmarks
/// sharing a name under different ancestors stay separate groups.
fn bucket_key(result: &CheckResult, rule: &CheckDisplayGroup, key: String) -> String {
    if rule.group_type != CheckDisplayGroupType::Benchmark {
        return key;
    }
    result
        .benchmark_trunk
        .iter()
        .skip(1)
        .map(|b| b.name.as_str())
        .collect::<Vec<_>>()
        .join("\u{0}")
}

/// Tracks which category first claimed each node-state name.
#[derive(Default)]
struct NameClaims {
    claims: HashMap<String, CheckDisplayGroupType>,
    collisions: BTreeSet<String>,
}

impl NameClaims {
    fn claim(&mut self, name: &str, category: CheckDisplayGroupType) {
        match self.claims.get(name) {
            Some(&first) if first != category => {
                if self.collisions.insert(name.to_string()) {
                    debug!(name, first = %first, second = %category, "node-state name shared across categories");
                }
            }
            Some(_) => {}
            None => {
                self.claims.insert(name.to_string(), category);
            }
        }
    }
}

/// Group `results` by `rules`, outermost rule first.
///
/// `result` rules are ignored; they only mark where leaves sit in the
/// configured list. A result whose key for a rule is `None` skips that
/// level. Every result ends as exactly one leaf.
///
/// # Errors
///
/// Returns [`GroupingError::UnknownGroupType`] if any rule has an unknown
/// type. Rules are checked before any node is built.
pub fn aggregate(
    results: &[CheckResult],
    rules: &[CheckDisplayGroup],
) -> Result<GroupingOutcome, GroupingError> {
    let rules: Vec<&CheckDisplayGroup> = rules
        .iter()
        .filter(|r| r.group_type != CheckDisplayGroupType::Result)
        .collect();
    if let Some(bad) = rules
        .iter()
        .find(|r| r.group_type == CheckDisplayGroupType::Other)
    {
        return Err(GroupingError::UnknownGroupType(bad.group_type));
    }

    let mut arena = NodeArena::new(CheckNode::Root(RootNode::default()));
    let mut lookup = BenchmarkChildrenLookup::new();
    let mut buckets = vec![Bucket::new(ROOT)];
    let mut node_states = NodeStates::new();
    let mut names = NameClaims::default();

    for result in results {
        let mut current = 0;
        for (depth, rule) in rules.iter().enumerate() {
            let Some(key) = resolve_key(result, rule) else {
                continue;
            };

            if rule.group_type == CheckDisplayGroupType::Benchmark {
                for benchmark in &result.benchmark_trunk {
                    node_states.seed_collapsed(benchmark.name.as_str());
                    names.claim(&benchmark.name, CheckDisplayGroupType::Benchmark);
                }
            } else {
                node_states.seed_collapsed(key.as_str());
                names.claim(&key, rule.group_type);
            }

            let group = bucket_key(result, rule, key);
            if let Some(&next) = buckets[current].sub.get(&group) {
                current = next;
                continue;
            }

            let parent = buckets[current].container;
            let Some(container) = make_node(&mut arena, &mut lookup, parent, result, rule)? else {
                continue;
            };

            trace!(depth, group = group.as_str(), "opened group");
            buckets.push(Bucket::new(container));
            let next = buckets.len() - 1;
            buckets[current].sub.insert(group, next);
            current = next;
        }

        arena.attach(buckets[current].container, leaf_node(result));
    }

    debug!(
        results = results.len(),
        rules = rules.len(),
        nodes = arena.len(),
        "aggregated check results"
    );

    let root = RootNode {
        children: arena.materialize().into_children(),
    };
    let first_child_summaries = root.first_child_summaries();
    Ok(GroupingOutcome {
        root,
        node_states,
        first_child_summaries,
        name_collisions: names.collisions,
    })
}
