//! CLI integration tests: run the stackgraph binary against fixture directories.
//! Uses CARGO_BIN_EXE_stackgraph when set (e.g. by `cargo test`).

mod common;

use common::fixtures::{modav_core_stack, subscription, write_subscriptions};
use serde_json::json;
use std::process::Command;

fn bin() -> Option<std::path::PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_stackgraph").map(std::path::PathBuf::from)
}

#[test]
fn test_cli_help_succeeds() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin).arg("--help").output().expect("run --help");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("stackgraph"));
    assert!(stdout.contains("--stacks-dir"));
}

#[test]
fn test_cli_fails_when_stack_root_missing() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(&bin)
        .args(["--stacks-dir", "/nonexistent/stacks/12345"])
        .output()
        .expect("run with missing root");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("/nonexistent/stacks/12345"));
}

#[test]
fn test_cli_writes_graph_to_stdout() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let stacks = dir.path().join("stacks");
    modav_core_stack().write(&stacks);
    let subs = dir.path().join("subs.json");
    write_subscriptions(
        &subs,
        json!([subscription(
            "sqs",
            "arn:aws:sns:eu-west-1:111:live-modav-events",
            "arn:aws:sqs:eu-west-1:111:modav-ingest-XYZ123"
        )]),
    );

    let out = Command::new(&bin)
        .arg("--stacks-dir")
        .arg(&stacks)
        .arg("--subscriptions")
        .arg(&subs)
        .output()
        .expect("run stackgraph");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("digraph aws {\n"));
    assert!(stdout.ends_with("}\n"));
    assert!(stdout.contains(
        "  live_modav_Worker_AB12CD -> arn_aws_sqs_eu_west_1_111_modav_ingest_XYZ123\n"
    ));
    assert!(stdout.contains(
        "  arn_aws_sns_eu_west_1_111_live_modav_events -> arn_aws_sqs_eu_west_1_111_modav_ingest_XYZ123\n"
    ));
}

#[test]
fn test_cli_output_file_matches_stdout() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let stacks = dir.path().join("stacks");
    modav_core_stack().write(&stacks);
    let target = dir.path().join("aws.dot");

    let to_file = Command::new(&bin)
        .arg("--stacks-dir")
        .arg(&stacks)
        .arg("--output")
        .arg(&target)
        .output()
        .expect("run with --output");
    assert!(to_file.status.success());
    assert!(to_file.stdout.is_empty());

    let to_stdout = Command::new(&bin)
        .arg("--stacks-dir")
        .arg(&stacks)
        .output()
        .expect("run to stdout");
    assert_eq!(std::fs::read(&target).unwrap(), to_stdout.stdout);
}
