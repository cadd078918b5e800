//! Structural pass: document shape independent of cross-references.

use crate::core::trace::{
    CONTEXT_FIELDS, Phase, PhaseNumber, Phases, PhasesField, REQUIRED_TOP_LEVEL, Trace, describe,
};
use crate::core::validate::{Rule, ValidationContext, Violation};
use serde_json::Value;

/// Top-level checks. Returns the phase sequence, or `None` when `phases`
/// is not a list and no phase-dependent check can run.
pub fn check_document<'a>(trace: &Trace<'a>, out: &mut Vec<Violation>) -> Option<Phases<'a>> {
    for key in REQUIRED_TOP_LEVEL {
        if !trace.has_field(key) {
            out.push(Violation::new(
                Rule::MissingTopLevelField,
                format!("Missing top-level field: {}", key),
            ));
        }
    }

    if trace.task_class().is_none() {
        out.push(Violation::new(
            Rule::InvalidTaskClass,
            format!(
                "Invalid or missing TaskClass: {}",
                describe(trace.task_class_raw())
            ),
        ));
    }

    match trace.phases_field() {
        PhasesField::Absent => Some(Phases::default()),
        PhasesField::List(items) => Some(Phases::new(items)),
        PhasesField::NotAList => {
            out.push(Violation::new(Rule::PhasesNotList, "phases must be a list"));
            None
        }
    }
}

/// Phase ordering plus the per-phase presence checks.
pub fn check_phases(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    if !cx.phases.is_canonical_order() {
        out.push(Violation::new(
            Rule::PhaseOrder,
            format!(
                "Phases must be exactly [0,1,2,3,4] in order; got {}",
                render_sequence(&cx.phases.observed_numbers())
            ),
        ));
    }

    // Audit is reported last, after every other phase.
    for number in PhaseNumber::ALL {
        match cx.phases.phase(number) {
            Phase::Context(context) => {
                if !context.is_declared() {
                    out.push(Violation::new(
                        Rule::MissingContext,
                        "PHASE 0 must declare Context",
                    ));
                    continue;
                }
                let fields = context.context();
                for key in CONTEXT_FIELDS {
                    if !fields.contains(key) {
                        out.push(Violation::new(
                            Rule::ContextFieldMissing,
                            format!("Context missing field: {}", key),
                        ));
                    }
                }
            }
            Phase::Hypotheses(hypotheses) => {
                if !hypotheses.is_declared() {
                    out.push(Violation::new(
                        Rule::MissingHypotheses,
                        "PHASE 1 must declare at least one Hypothesis",
                    ));
                }
            }
            // Failures and the risk/gate/decision phase carry no shape-only
            // rules; the referential and policy passes own them.
            Phase::Failures(_) | Phase::RiskGateDecision(_) => {}
            Phase::Audit(audit) => {
                if !audit.is_declared() {
                    out.push(Violation::new(
                        Rule::MissingAudit,
                        "PHASE 4 must include audit block",
                    ));
                } else if audit.conformance().is_none() {
                    out.push(Violation::new(
                        Rule::InvalidConformance,
                        "Audit.conformance must be 'conformant' or 'non-conformant'",
                    ));
                }
            }
        }
    }
}

fn render_sequence(observed: &[Option<&Value>]) -> String {
    let items = observed
        .iter()
        .map(|v| describe(*v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", items)
}
