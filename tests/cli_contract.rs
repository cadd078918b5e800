use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn run_bol(dir: &Path, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bol-validate"));
    cmd.current_dir(dir).args(args);
    cmd.output().expect("run bol-validate")
}

fn write_trace(doc: &Value) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("tmpdir");
    let path = tmp.path().join("trace.json");
    fs::write(&path, serde_json::to_vec_pretty(doc).expect("serialize")).expect("write trace");
    (tmp, path)
}

fn passing_trace() -> Value {
    json!({
        "bol_version": "1.0",
        "trace_id": "T-cli",
        "task": {"class": "A"},
        "phases": [
            {"phase": 0, "context": {"known": [], "unknown": [], "assumptions": []}},
            {"phase": 1, "hypotheses": ["h"]},
            {"phase": 2, "failures": []},
            {"phase": 3, "gates": [], "decision_attempt": {"requested": false}},
            {"phase": 4, "audit": {"conformance": "conformant"}}
        ]
    })
}

#[test]
fn valid_trace_exits_zero_with_pass_banner() {
    let (tmp, path) = write_trace(&passing_trace());
    let out = run_bol(tmp.path(), &[path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "BOL VALIDATION: PASS");
}

#[test]
fn invalid_trace_exits_one_with_numbered_violations() {
    let mut doc = passing_trace();
    doc["phases"][4]["audit"] = json!({});
    doc["phases"][2]["failures"] = json!([{"type": "context_loss"}]);
    let (tmp, path) = write_trace(&doc);

    let out = run_bol(tmp.path(), &[path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "BOL VALIDATION: FAIL",
            "1. PHASE 4 must include audit block",
            "2. Failure must include correction",
        ]
    );
}

#[test]
fn missing_argument_is_usage_error() {
    let tmp = TempDir::new().expect("tmpdir");
    let out = run_bol(tmp.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("BOL VALIDATION"));
}

#[test]
fn extra_argument_is_usage_error() {
    let (tmp, path) = write_trace(&passing_trace());
    let p = path.to_str().unwrap();
    let out = run_bol(tmp.path(), &[p, p]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("BOL VALIDATION"));
}

#[test]
fn unreadable_or_malformed_input_exits_two() {
    let tmp = TempDir::new().expect("tmpdir");
    let out = run_bol(tmp.path(), &["does-not-exist.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read trace"));

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{ not json").expect("write");
    let out = run_bol(tmp.path(), &[bad.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read JSON"));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("BOL VALIDATION"));
}

#[test]
fn json_format_reports_rules() {
    let mut doc = passing_trace();
    doc["task"]["class"] = json!("B");
    let (tmp, path) = write_trace(&doc);

    let out = run_bol(tmp.path(), &["--format", "json", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&out.stdout).expect("json report");
    assert_eq!(report["status"], "FAIL");
    assert_eq!(report["trace_id"], "T-cli");
    assert_eq!(report["violations"][0]["rule"], "RISK_REQUIRED");
    assert_eq!(report["violations"][0]["pass"], "policy");
    assert_eq!(report["trace_sha256"].as_str().map(str::len), Some(64));
}

#[test]
fn verbose_prints_pass_summary_to_stderr() {
    let (tmp, path) = write_trace(&passing_trace());
    let out = run_bol(tmp.path(), &["-v", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("validate: pass structural violations=0"));
    assert!(stderr.contains("validate: pass referential violations=0"));
    assert!(stderr.contains("validate: pass policy violations=0"));
}
