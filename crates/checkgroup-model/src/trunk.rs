//! Benchmark trunk merging.
//!
//! A result's trunk is its full ancestor path. Results sharing a prefix of
//! that path under the same parent must share the prefix's nodes, so every
//! benchmark node created during a pass is registered and reused by later
//! results reaching the same benchmark from the same parent.

use std::collections::{HashMap, HashSet};

use checkgroup_types::BenchmarkRef;
use tracing::warn;

use crate::arena::{NodeArena, NodeId};
use crate::node::{BenchmarkNode, CheckNode};

const FALLBACK: &str = "Other";

/// (parent node, benchmark name) to the benchmark node under that parent.
///
/// One lookup serves the whole aggregation pass. It is keyed by parent as
/// well as name: a benchmark grouped under one status never absorbs the
/// children of the same-named benchmark under another status, and a
/// benchmark reached through a different ancestor gets its own node rather
/// than a second parent.
pub(crate) type BenchmarkChildrenLookup = HashMap<(NodeId, String), NodeId>;

/// Build or reuse the nodes for `trunk` (synthetic root excluded) beneath
/// `parent`, outermost first. Returns the innermost node, or `None` for an
/// empty trunk.
pub(crate) fn merge_trunk(
    arena: &mut NodeArena,
    lookup: &mut BenchmarkChildrenLookup,
    parent: NodeId,
    trunk: &[BenchmarkRef],
) -> Option<NodeId> {
    if trunk.is_empty() {
        return None;
    }
    let mut seen = HashSet::new();
    if let Some(repeated) = trunk
        .iter()
        .map(|b| non_empty_or_other(&b.name))
        .find(|name| !seen.insert(*name))
    {
        warn!(benchmark = repeated, "benchmark repeats within its own trunk");
    }
    Some(descend(arena, lookup, parent, trunk))
}

fn descend(
    arena: &mut NodeArena,
    lookup: &mut BenchmarkChildrenLookup,
    parent: NodeId,
    trunk: &[BenchmarkRef],
) -> NodeId {
    let Some((current, tail)) = trunk.split_first() else {
        return parent;
    };
    let key = (parent, non_empty_or_other(&current.name).to_string());
    let id = match lookup.get(&key) {
        Some(&existing) => existing,
        None => {
            let id = arena.attach(parent, benchmark_shell(current));
            lookup.insert(key, id);
            id
        }
    };
    descend(arena, lookup, id, tail)
}

fn benchmark_shell(benchmark: &BenchmarkRef) -> CheckNode {
    CheckNode::Benchmark(BenchmarkNode {
        sort: non_empty_or_other(&benchmark.sort).to_string(),
        name: non_empty_or_other(&benchmark.name).to_string(),
        title: non_empty_or_other(&benchmark.title).to_string(),
        children: Vec::new(),
    })
}

fn non_empty_or_other(s: &str) -> &str {
    if s.is_empty() { FALLBACK } else { s }
}
