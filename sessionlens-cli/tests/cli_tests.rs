// CLI Tests
// Drive the built binary end to end: arguments, exit codes and report files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sessionlens(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sessionlens"));
    cmd.env_remove("SESSIONLENS_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home);
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    sessionlens(dir.path()).args(args).output().expect("failed to run sessionlens")
}

fn write_log(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_no_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {}", stderr);
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_two_arguments_rejected() {
    let dir = TempDir::new().unwrap();
    let first = write_log(&dir, "a.log", "UI x\n");
    let second = write_log(&dir, "b.log", "UI y\n");
    let output = run(&dir, &[&first, &second]);

    assert!(!output.status.success());
    assert!(!dir.path().join("a.json").exists());
    assert!(!dir.path().join("b.json").exists());
}

#[test]
fn test_missing_log_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.log");
    let output = run(&dir, &[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("❌ Log file not found:"), "stdout was: {}", stdout);
    assert!(!dir.path().join("nope.json").exists());
}

#[test]
fn test_user_action_session() {
    let dir = TempDir::new().unwrap();
    let log = write_log(
        &dir,
        "session.log",
        "[10:00:00.000] UserAction: Home: tap_play | song=A\n[10:00:05.000] UserAction: Home: tap_pause",
    );
    let output = run(&dir, &[&log]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("🔍 Parsing log file...\n📊 Analyzing data...\n💾 Detailed report saved to: "));
    assert!(stdout.contains("Session Duration: 5.0 seconds"));
    assert!(stdout.contains("Actions per Minute: 24.0"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("session.json")).unwrap()).unwrap();
    assert_eq!(json["total_log_lines"], 2);
    assert_eq!(json["user_behavior"]["total_actions"], 2);
    assert_eq!(json["user_behavior"]["most_used_screens"], serde_json::json!([["Home", 2]]));
    assert_eq!(json["user_behavior"]["session_duration_seconds"], 5.0);
    assert_eq!(json["user_behavior"]["actions_per_minute"], 24.0);
}

#[test]
fn test_empty_log_exits_zero() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "empty.log", "");
    let output = run(&dir, &[&log]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("empty.json")).unwrap()).unwrap();
    assert_eq!(json["user_behavior"], serde_json::json!({}));
    assert_eq!(json["performance"], serde_json::json!({}));
    assert_eq!(json["errors"], serde_json::json!({ "total_errors": 0 }));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ NO ERRORS DETECTED"));
}

#[test]
fn test_explicit_config_changes_top_n() {
    let dir = TempDir::new().unwrap();
    let config = write_log(&dir, "report.toml", "[report]\ntop_screens = 1\n");
    let log = write_log(
        &dir,
        "session.log",
        "[10:00:00.000] UserAction: Home: a\n[10:00:01.000] UserAction: Search: b\n",
    );
    let output = run(&dir, &["--config", &config, &log]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("session.json")).unwrap()).unwrap();
    assert_eq!(json["user_behavior"]["most_used_screens"], serde_json::json!([["Home", 1]]));
    assert_eq!(json["user_behavior"]["unique_screens"], 2);
}

#[test]
fn test_config_cannot_grow_fixed_lists() {
    let dir = TempDir::new().unwrap();
    let config = write_log(&dir, "report.toml", "[report]\nslowest_operations = 20\nerror_samples = 50\n");
    let lines: Vec<String> = (1..=12)
        .map(|i| format!("[10:00:{:02}.000] Performance: sync: {}ms [FAILED]", i, i * 10))
        .collect();
    let log = write_log(&dir, "session.log", &lines.join("\n"));
    let output = run(&dir, &["--config", &config, &log]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("session.json")).unwrap()).unwrap();
    assert_eq!(json["performance"]["slowest_operations"].as_array().unwrap().len(), 5);
    assert_eq!(json["performance"]["slowest_operations"][0]["duration"], 120);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "session.log", "UI x\n");
    let missing = dir.path().join("missing.toml");
    let output = run(&dir, &["--config", missing.to_str().unwrap(), &log]);

    assert!(!output.status.success());
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_json_log_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "session.json", "UI x\n");
    let output = run(&dir, &[&log]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&log).unwrap(), "UI x\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("❌ Report would overwrite the log file:"), "stdout was: {}", stdout);
    assert!(stdout.contains("--output <FILE>"));
}

#[test]
fn test_json_log_with_output_flag() {
    let dir = TempDir::new().unwrap();
    let log = write_log(&dir, "session.json", "[10:00:00.000] UserAction: Home: tap_play\n");
    let target = dir.path().join("session.report.json");
    let output = run(&dir, &["--output", target.to_str().unwrap(), &log]);
    assert!(output.status.success());

    assert_eq!(fs::read_to_string(&log).unwrap(), "[10:00:00.000] UserAction: Home: tap_play\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("💾 Detailed report saved to: {}", target.display())));
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(json["user_behavior"]["total_actions"], 1);
}
