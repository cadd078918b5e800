//! Policy pass: trace-level rules that need the full cross-phase picture.
//!
//! - Every failure carries an allowed type and a correction.
//! - Class B and C tasks declare a risk block with an allowed level.
//! - A human-required gate needs a `HumanConfirmation` artifact somewhere.
//! - An evaluated decision is complete, and is `blocked` whenever class C
//!   has open unknowns or any check is blocked. It is never `approved`
//!   while failures are recorded.

use crate::core::trace::{DECISION_FIELDS, TaskClass, describe};
use crate::core::validate::{Rule, ValidationContext, Violation};

pub fn check(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    check_failures(cx, out);
    check_risk(cx, out);
    check_human_gates(cx, out);
    check_decision(cx, out);
}

fn check_failures(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    for failure in cx.phases.failures().failures() {
        if failure.kind().is_none() {
            out.push(Violation::new(
                Rule::InvalidFailureType,
                format!("Failure has invalid type: {}", describe(failure.kind_raw())),
            ));
        }
        if !failure.has_correction() {
            out.push(Violation::new(
                Rule::FailureWithoutCorrection,
                "Failure must include correction",
            ));
        }
    }
}

fn check_risk(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    let Some(class) = cx.task_class.filter(|c| c.requires_risk()) else {
        return;
    };
    match cx.phases.decision_phase().risk() {
        None => out.push(Violation::new(
            Rule::RiskRequired,
            format!("TaskClass {} requires Risk in PHASE 3", class.as_str()),
        )),
        Some(risk) if risk.level().is_none() => out.push(Violation::new(
            Rule::InvalidRiskLevel,
            format!("Invalid Risk.level: {}", describe(risk.level_raw())),
        )),
        Some(_) => {}
    }
}

fn check_human_gates(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    if cx.index.has_human_confirmation() {
        return;
    }
    for gate in cx.phases.decision_phase().gates() {
        if gate.human_required() {
            out.push(Violation::new(
                Rule::HumanConfirmationRequired,
                format!(
                    "Gate {} is human-required but no HumanConfirmation Artifact exists",
                    gate.label()
                ),
            ));
        }
    }
}

fn check_decision(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    let Some(decision) = cx.phases.decision_phase().requested_decision() else {
        return;
    };

    for field in DECISION_FIELDS {
        if !decision.has(field) {
            out.push(Violation::new(
                Rule::DecisionFieldMissing,
                format!("Decision missing required field: {}", field),
            ));
        }
    }

    let blocked = decision.result_is("blocked");

    if cx.task_class == Some(TaskClass::C) && cx.phases.context().has_unknowns() && !blocked {
        out.push(Violation::new(
            Rule::UnknownsMustBlock,
            "TaskClass C with non-empty Context.unknown must block Decision",
        ));
    }

    let blocked_checks = cx.index.blocked_checks();
    if !blocked_checks.is_empty() && !blocked {
        let ids = blocked_checks.join(", ");
        out.push(Violation::new(
            Rule::BlockedChecksMustBlock,
            format!("Blocked checks exist [{}]; Decision must be blocked", ids),
        ));
    }

    if cx.phases.failures().has_failures() && decision.result_is("approved") {
        out.push(Violation::new(
            Rule::ApprovedWithFailures,
            "Decision cannot be approved while failures exist (unless explicitly resolved)",
        ));
    }
}
