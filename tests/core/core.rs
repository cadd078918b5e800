use bol_validate::core::index::TraceIndex;
use bol_validate::core::loader;
use bol_validate::core::trace::Phases;
use bol_validate::core::validate::{PassKind, Rule, validate_trace};
use bol_validate::validate;
use serde_json::{Value, json};
use std::fs;
use tempfile::tempdir;

fn class_c_trace() -> Value {
    json!({
        "bol_version": "1.0",
        "trace_id": "T-2024-0042",
        "task": {"class": "C", "summary": "rotate production database credentials"},
        "phases": [
            {
                "phase": 0,
                "context": {
                    "known": ["credentials expire in 7 days"],
                    "unknown": [],
                    "assumptions": ["rotation window is approved"]
                },
                "artifacts": [
                    {"id": "art-runbook", "type": "Document"},
                    {"id": "art-ticket", "type": "Ticket"}
                ]
            },
            {
                "phase": 1,
                "hypotheses": ["rotation can be done without downtime"],
                "checks": [
                    {"id": "chk-staging", "status": "pass", "artifacts": ["art-runbook"]}
                ]
            },
            {"phase": 2, "failures": []},
            {
                "phase": 3,
                "risk": {"level": "high"},
                "gates": [
                    {"id": "gate-human", "required_artifacts": ["art-ticket", "art-ack"], "human_required": true}
                ],
                "artifacts": [{"id": "art-ack", "type": "HumanConfirmation"}],
                "decision_attempt": {
                    "requested": true,
                    "decision": {
                        "owner": "sre-oncall",
                        "timestamp": "2024-06-01T09:30:00Z",
                        "artifacts": ["art-runbook", "art-ack"],
                        "based_on_checks": ["chk-staging"],
                        "result": "approved"
                    }
                }
            },
            {"phase": 4, "audit": {"conformance": "conformant"}}
        ]
    })
}

#[test]
fn complete_class_c_trace_passes() {
    let report = validate_trace(&class_c_trace());
    assert!(report.passed(), "unexpected violations: {:?}", report.messages());
}

#[test]
fn pass_scenario_with_minimal_class_a_trace() {
    let doc = json!({
        "bol_version": "1.0",
        "trace_id": "T-min",
        "task": {"class": "A"},
        "phases": [
            {"phase": 0, "context": {"known": [], "unknown": [], "assumptions": []}},
            {"phase": 1, "hypotheses": ["only one"]},
            {"phase": 2},
            {"phase": 3},
            {"phase": 4, "audit": {"conformance": "conformant"}}
        ]
    });
    assert!(validate(&doc).is_empty());
}

#[test]
fn validation_is_deterministic() {
    let mut doc = class_c_trace();
    doc["phases"][0]["context"]["unknown"] = json!(["blast radius"]);
    doc["phases"][1]["checks"] = json!([
        {"id": "chk-z", "status": "blocked", "artifacts": ["art-missing"]},
        {"id": "chk-a", "status": "blocked", "artifacts": ["art-runbook"]},
        {"id": "chk-m", "status": "weird", "artifacts": []}
    ]);
    doc["phases"][2]["failures"] = json!([{"type": "overconfidence"}]);

    let first = validate(&doc);
    let second = validate(&doc);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn one_violation_per_unresolved_reference() {
    let mut doc = class_c_trace();
    doc["phases"][1]["checks"][0]["artifacts"] = json!(["m1", "art-runbook", "m2"]);
    doc["phases"][3]["gates"][0]["required_artifacts"] = json!(["m3"]);
    doc["phases"][3]["decision_attempt"]["decision"]["artifacts"] = json!(["m4", "m5"]);
    doc["phases"][3]["decision_attempt"]["decision"]["based_on_checks"] = json!(["chk-staging", "chk-x"]);

    let report = validate_trace(&doc);
    let referential: Vec<&str> = report
        .violations
        .iter()
        .filter(|v| v.pass == PassKind::Referential)
        .map(|v| v.message.as_str())
        .collect();
    assert_eq!(
        referential,
        vec![
            "Check chk-staging references missing Artifact id: m1",
            "Check chk-staging references missing Artifact id: m2",
            "Gate gate-human requires missing Artifact id: m3",
            "Decision references missing Artifact id: m4",
            "Decision references missing Artifact id: m5",
            "Decision references missing Check id: chk-x",
        ]
    );
    assert_eq!(report.violations.len(), referential.len());
}

#[test]
fn approval_with_failures_is_rejected() {
    let mut doc = class_c_trace();
    doc["phases"][2]["failures"] = json!([
        {"type": "unchecked_assumption", "correction": "verified window with change board"}
    ]);
    let rules: Vec<Rule> = validate_trace(&doc).violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec![Rule::ApprovedWithFailures]);
}

#[test]
fn blocked_ids_named_match_blocked_set() {
    let mut doc = class_c_trace();
    doc["phases"][1]["checks"] = json!([
        {"id": "chk-staging", "status": "pass", "artifacts": ["art-runbook"]},
        {"id": "chk-zeta", "status": "blocked", "artifacts": ["art-runbook"]},
        {"id": "chk-alpha", "status": "blocked", "artifacts": ["art-runbook"]}
    ]);
    let phases_value = doc["phases"].clone();
    let phases = Phases::new(phases_value.as_array().unwrap());
    let blocked = TraceIndex::build(&phases).blocked_checks();
    assert_eq!(blocked, vec!["chk-alpha", "chk-zeta"]);

    let messages = validate(&doc);
    assert_eq!(
        messages,
        vec!["Blocked checks exist [chk-alpha, chk-zeta]; Decision must be blocked".to_string()]
    );
}

#[test]
fn class_c_unknowns_force_block() {
    let mut doc = class_c_trace();
    doc["phases"][0]["context"]["unknown"] = json!(["replica lag during rotation"]);
    let rules: Vec<Rule> = validate_trace(&doc).violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec![Rule::UnknownsMustBlock]);

    doc["phases"][3]["decision_attempt"]["decision"]["result"] = json!("blocked");
    assert!(validate(&doc).is_empty());
}

#[test]
fn swapped_phases_report_only_the_order() {
    let mut doc = class_c_trace();
    doc["phases"].as_array_mut().unwrap().swap(2, 3);
    assert_eq!(
        validate(&doc),
        vec!["Phases must be exactly [0,1,2,3,4] in order; got [0, 1, 3, 2, 4]".to_string()]
    );
}

#[test]
fn loader_feeds_validator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.json");
    fs::write(&path, serde_json::to_vec_pretty(&class_c_trace()).unwrap()).unwrap();

    let loaded = loader::load_trace(&path).unwrap();
    assert!(validate_trace(&loaded.document).passed());
}
