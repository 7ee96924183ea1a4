//! Integration test: replay a scenario file through the binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn replay(args: &[&str]) -> Output {
    let log_file = std::env::temp_dir().join("festagram_ui_replay_cli.log");
    Command::new(env!("CARGO_BIN_EXE_festagram-ui"))
        .args(args)
        .arg("--config")
        .arg("/nonexistent/festagram-ui/config.toml")
        .arg("--log-file")
        .arg(log_file)
        .env_remove("FESTAGRAM_UI_DEBOUNCE_MS")
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn replay_prints_effects_as_json_lines() {
    let scenario = fixture("events_page.json");
    let output = replay(&[scenario.to_str().expect("utf-8 path")]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    insta::assert_snapshot!(stdout, @r#"
    {"at":0,"effect":"annotate_timestamp","target":"event-7","label":"in 2 days"}
    {"at":10,"effect":"show_field_error","field":{"form":"login","field":"username"},"message":"This field is required"}
    {"at":10,"effect":"show_field_error","field":{"form":"login","field":"password"},"message":"This field is required"}
    {"at":10,"effect":"aggregate_failure_notice","message":"Please fix the errors in the form"}
    {"at":10,"submission":"login","allowed":false}
    {"at":20,"effect":"confirm","message":"Are you sure you want to cancel your registration for this event?","accepted":false}
    {"at":20,"submission":"cancel","allowed":false}
    {"at":400,"effect":"set_loading","region":{"kind":"search_results"},"loading":true}
    {"at":700,"effect":"navigate_to","url":"https://festagram.example/events?search=jazz"}
    "#);
}

#[test]
fn replay_stops_at_until() {
    let scenario = fixture("events_page.json");
    let output = replay(&[scenario.to_str().expect("utf-8 path"), "--until", "500"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let last = stdout.lines().last().expect("some output");
    assert!(
        last.contains(r#""effect":"set_loading""#),
        "Navigation at 700 ms is past the horizon, got: {last}"
    );
    assert!(!stdout.contains("navigate_to"));
}

#[test]
fn missing_scenario_fails_with_message() {
    let output = replay(&["/nonexistent/festagram/scenario.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("scenario"),
        "Expected scenario error on stderr, got: {stderr}"
    );
}
