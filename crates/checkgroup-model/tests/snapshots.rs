//! Insta snapshot tests for the grouped tree shape.
//!
//! Outlines keep the snapshots readable; the node JSON snapshot pins the
//! serialized field names.

use checkgroup_model::{CheckNode, aggregate, group_shell};
use checkgroup_types::{
    BenchmarkRef, CheckDisplayGroup, CheckDisplayGroupType, CheckResult, CheckResultDimension,
    CheckResultStatus, CheckResultType, CheckSeverity, CheckTags, ControlRef,
};

fn check(
    control: &str,
    status: CheckResultStatus,
    severity: CheckSeverity,
    region: Option<&str>,
    trunk: &[&str],
) -> CheckResult {
    let mut benchmark_trunk = vec![BenchmarkRef::new("0", "root", "Root")];
    benchmark_trunk.extend(
        trunk
            .iter()
            .enumerate()
            .map(|(i, n)| BenchmarkRef::new(format!("{i:05}"), *n, n.to_uppercase())),
    );
    CheckResult {
        status,
        result_type: CheckResultType::Result,
        reason: None,
        resource: Some(format!("arn:{control}")),
        dimensions: region
            .map(|r| vec![CheckResultDimension::new("region", r)])
            .unwrap_or_default(),
        tags: CheckTags::new(),
        control: ControlRef {
            name: control.into(),
            title: control.to_uppercase(),
            sort: "00000".into(),
            severity: Some(severity),
        },
        benchmark_trunk,
    }
}

fn fixture() -> Vec<CheckResult> {
    vec![
        check("s3_public", CheckResultStatus::Alarm, CheckSeverity::High, Some("eu"), &["cis", "s3"]),
        check("s3_logging", CheckResultStatus::Ok, CheckSeverity::Low, Some("us"), &["cis", "s3"]),
        check("iam_mfa", CheckResultStatus::Error, CheckSeverity::Critical, None, &["cis", "iam"]),
    ]
}

#[test]
fn snapshot_default_grouping_outline() {
    let rules = vec![
        CheckDisplayGroup::benchmark(),
        CheckDisplayGroup::control(),
        CheckDisplayGroup::result(),
    ];
    let outline = aggregate(&fixture(), &rules).unwrap().root.outline();
    insta::assert_json_snapshot!(outline, @r#"
    [
      "cis",
      "  s3",
      "    s3_public",
      "      s3_public (alarm)",
      "    s3_logging",
      "      s3_logging (ok)",
      "  iam",
      "    iam_mfa",
      "      iam_mfa (error)"
    ]
    "#);
}

#[test]
fn snapshot_dimension_then_status_outline() {
    let rules = vec![
        CheckDisplayGroup::dimension("region"),
        CheckDisplayGroup::new(CheckDisplayGroupType::Status),
    ];
    let outline = aggregate(&fixture(), &rules).unwrap().root.outline();
    insta::assert_json_snapshot!(outline, @r#"
    [
      "eu",
      "  Alarm",
      "    s3_public (alarm)",
      "us",
      "  OK",
      "    s3_logging (ok)",
      "Dimension region not set",
      "  Error",
      "    iam_mfa (error)"
    ]
    "#);
}

#[test]
fn snapshot_key_value_node_json() {
    let result = &fixture()[0];
    let node = group_shell(result, &CheckDisplayGroup::dimension("region")).unwrap();
    assert!(matches!(node, CheckNode::KeyValuePair(_)));
    insta::assert_json_snapshot!(node, @r#"
    {
      "type": "key_value_pair",
      "category": "dimension",
      "key": "region",
      "key_display": "eu",
      "sort_value": "eu",
      "children": []
    }
    "#);
}
