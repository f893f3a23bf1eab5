//! End-to-end workflow tests: panel definition in, grouped tree out.

use std::io::Write;

use checkgroup_core::node_state::NodeStateAction;
use checkgroup_core::panel::{ControlRow, PanelDefinition, PanelMetadata, PanelsMap};
use checkgroup_core::settings::GroupingSettings;
use checkgroup_core::types::{
    CheckDisplayGroup, CheckDisplayGroupType, CheckResultDimension, CheckResultStatus,
    CheckSeverity,
};
use checkgroup_core::{
    CoreError, GroupingSession, available_values, grouping_workflow, grouping_workflow_from_file,
};

fn panels() -> PanelsMap {
    ["aws", "aws.s3", "aws.iam"]
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                PanelMetadata {
                    name: name.to_string(),
                    title: Some(name.to_uppercase()),
                    description: None,
                },
            )
        })
        .collect()
}

fn row(status: CheckResultStatus, region: &str) -> ControlRow {
    ControlRow {
        status,
        reason: None,
        resource: Some(format!("arn:{region}")),
        dimensions: vec![CheckResultDimension::new("region", region)],
    }
}

fn control(name: &str, severity: CheckSeverity, rows: Vec<ControlRow>) -> PanelDefinition {
    let mut control = PanelDefinition::control(name, rows);
    control.severity = Some(severity);
    control
}

fn definition() -> PanelDefinition {
    PanelDefinition::benchmark(
        "aws",
        vec![
            PanelDefinition::benchmark(
                "aws.s3",
                vec![control(
                    "s3_public",
                    CheckSeverity::High,
                    vec![
                        row(CheckResultStatus::Alarm, "eu"),
                        row(CheckResultStatus::Ok, "us"),
                    ],
                )],
            ),
            PanelDefinition::benchmark(
                "aws.iam",
                vec![control(
                    "iam_mfa",
                    CheckSeverity::Critical,
                    vec![row(CheckResultStatus::Ok, "eu")],
                )],
            ),
        ],
    )
}

#[test]
fn default_settings_group_by_benchmark_then_control() {
    let outcome =
        grouping_workflow(&definition(), &panels(), &GroupingSettings::default()).unwrap();

    assert_eq!(
        outcome.root.outline(),
        vec![
            "aws.s3",
            "  s3_public",
            "    s3_public (alarm)",
            "    s3_public (ok)",
            "aws.iam",
            "  iam_mfa",
            "    iam_mfa (ok)",
        ]
    );
    assert_eq!(outcome.first_child_summaries[0].alarm, 1);
    assert_eq!(outcome.first_child_summaries[0].ok, 1);
    assert_eq!(outcome.first_child_summaries[1].ok, 1);
}

#[test]
fn invalid_settings_are_reported_with_context() {
    let settings = GroupingSettings::new(vec![
        CheckDisplayGroup::control(),
        CheckDisplayGroup::control(),
    ]);
    let err = grouping_workflow(&definition(), &panels(), &settings).unwrap_err();
    assert!(err.to_string().contains("invalid grouping settings"));
}

#[test]
fn unknown_panel_is_reported_with_context() {
    let err =
        grouping_workflow(&definition(), &PanelsMap::new(), &GroupingSettings::default())
            .unwrap_err();
    assert!(err.to_string().contains("failed to seed benchmark 'aws'"));
}

#[test]
fn settings_file_drives_the_workflow() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[[groupings]]
type = "dimension"
value = "region"

[[groupings]]
type = "severity"
"#
    )
    .unwrap();

    let outcome = grouping_workflow_from_file(&definition(), &panels(), file.path()).unwrap();
    assert_eq!(
        outcome.root.outline(),
        vec![
            "eu",
            "  High",
            "    s3_public (alarm)",
            "  Critical",
            "    iam_mfa (ok)",
            "us",
            "  High",
            "    s3_public (ok)",
        ]
    );
}

#[test]
fn missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = grouping_workflow_from_file(&definition(), &panels(), &dir.path().join("nope.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("failed to load grouping settings"));
}

#[test]
fn available_values_lists_dimension_keys_and_benchmarks() {
    let keys = available_values(&definition(), &panels(), CheckDisplayGroupType::Dimension).unwrap();
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["region"]);

    let benchmarks =
        available_values(&definition(), &panels(), CheckDisplayGroupType::Benchmark).unwrap();
    assert_eq!(
        benchmarks.into_iter().collect::<Vec<_>>(),
        vec!["aws.iam", "aws.s3"]
    );
}

#[test]
fn session_tracks_state_across_updates() {
    let mut session = GroupingSession::new();
    assert!(matches!(session.context(), Err(CoreError::NoActiveGrouping)));

    let rules = GroupingSettings::default().groupings;
    session.update(&definition(), &panels(), &rules).unwrap();
    session.dispatch(NodeStateAction::Expand("aws.s3".into()));

    let context = session.context().unwrap();
    assert!(context.node_states.is_expanded("aws.s3"));
    assert!(!context.node_states.is_expanded("aws.iam"));
    assert_eq!(context.benchmark.name, "aws");
    assert_eq!(context.grouping.children.len(), 2);
    assert!(context.name_collisions.is_empty());

    session.dispatch(NodeStateAction::CollapseAll);
    assert!(session.node_states().iter().all(|(_, s)| !s.expanded));
}
