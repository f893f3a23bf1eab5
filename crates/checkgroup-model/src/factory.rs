//! Grouping node construction per rule type.

use checkgroup_key::{
    DIMENSION_KEY_NOT_SET, TAG_KEY_NOT_SET, dimension_key, reason_key, resource_key,
    severity_key, sort_key, status_key, tag_key,
};
use checkgroup_types::{CheckDisplayGroup, CheckDisplayGroupType, CheckResult, CheckResultType};

use crate::arena::{NodeArena, NodeId};
use crate::error::GroupingError;
use crate::node::{CheckNode, ControlNode, KeyValuePairNode, ResultLeaf};
use crate::trunk::{BenchmarkChildrenLookup, merge_trunk};

/// Build the node(s) a rule introduces for `result` beneath `parent` and
/// return the node the next level goes into.
///
/// Benchmark rules hand the trunk (synthetic root excluded) to the trunk
/// merger; a trunk with nothing beyond the root introduces no level and
/// yields `None`.
pub(crate) fn make_node(
    arena: &mut NodeArena,
    lookup: &mut BenchmarkChildrenLookup,
    parent: NodeId,
    result: &CheckResult,
    rule: &CheckDisplayGroup,
) -> Result<Option<NodeId>, GroupingError> {
    if rule.group_type == CheckDisplayGroupType::Benchmark {
        let trunk = result.benchmark_trunk.get(1..).unwrap_or_default();
        return Ok(merge_trunk(arena, lookup, parent, trunk));
    }
    let shell = group_shell(result, rule)?;
    Ok(Some(arena.attach(parent, shell)))
}

/// Childless node for every non-benchmark rule type.
pub fn group_shell(result: &CheckResult, rule: &CheckDisplayGroup) -> Result<CheckNode, GroupingError> {
    let key_value = |key: String, key_display: String| {
        CheckNode::KeyValuePair(KeyValuePairNode {
            category: rule.group_type,
            key,
            key_display,
            sort_value: sort_key(result, rule),
            children: Vec::new(),
        })
    };

    let node = match rule.group_type {
        CheckDisplayGroupType::Dimension => key_value(
            rule.value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DIMENSION_KEY_NOT_SET.to_string()),
            dimension_key(rule.value.as_deref(), &result.dimensions),
        ),
        CheckDisplayGroupType::Tag => key_value(
            rule.value
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| TAG_KEY_NOT_SET.to_string()),
            tag_key(rule.value.as_deref(), &result.tags),
        ),
        CheckDisplayGroupType::Reason => {
            key_value("reason".into(), reason_key(result.reason.as_deref()))
        }
        CheckDisplayGroupType::Resource => {
            key_value("resource".into(), resource_key(result.resource.as_deref()))
        }
        CheckDisplayGroupType::Severity => key_value(
            "severity".into(),
            severity_key(result.control.severity).to_string(),
        ),
        CheckDisplayGroupType::Status => {
            key_value("status".into(), status_key(result.status).to_string())
        }
        CheckDisplayGroupType::Control => CheckNode::Control(ControlNode {
            sort: result.control.sort.clone(),
            name: result.control.name.clone(),
            title: result.control.title.clone(),
            children: Vec::new(),
        }),
        other @ (CheckDisplayGroupType::Benchmark
        | CheckDisplayGroupType::Result
        | CheckDisplayGroupType::Other) => return Err(GroupingError::UnknownGroupType(other)),
    };
    Ok(node)
}

/// Terminal node wrapping one result, chosen by its type.
pub fn leaf_node(result: &CheckResult) -> CheckNode {
    let leaf = ResultLeaf {
        result: result.clone(),
    };
    match result.result_type {
        CheckResultType::Loading => CheckNode::ControlRunning(leaf),
        CheckResultType::Error => CheckNode::ControlError(leaf),
        CheckResultType::Empty => CheckNode::ControlEmptyResult(leaf),
        CheckResultType::Result => CheckNode::ControlResult(leaf),
    }
}
