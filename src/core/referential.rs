//! Referential pass: every id a check, gate or evaluated decision names
//! must resolve against the global indexes.

use crate::core::index::IdIndex;
use crate::core::trace::{CheckRefs, describe};
use crate::core::validate::{Rule, ValidationContext, Violation};
use serde_json::Value;

pub fn check(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    check_checks(cx, out);
    check_gates(cx, out);
    check_decision(cx, out);
}

fn check_checks(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    for (cid, check) in cx.index.checks.iter() {
        if check.status().is_none() {
            out.push(Violation::new(
                Rule::InvalidCheckStatus,
                format!(
                    "Check {} has invalid status: {}",
                    cid,
                    describe(check.status_raw())
                ),
            ));
        }
        match check.artifact_refs() {
            CheckRefs::Empty => out.push(Violation::new(
                Rule::CheckWithoutArtifacts,
                format!("Check {} must reference at least one Artifact", cid),
            )),
            CheckRefs::List(refs) => {
                for aid in unresolved(refs, &cx.index.artifacts) {
                    out.push(Violation::new(
                        Rule::CheckMissingArtifact,
                        format!("Check {} references missing Artifact id: {}", cid, aid),
                    ));
                }
            }
        }
    }
}

fn check_gates(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    for gate in cx.phases.decision_phase().gates() {
        for aid in unresolved(gate.required_artifacts(), &cx.index.artifacts) {
            out.push(Violation::new(
                Rule::GateMissingArtifact,
                format!("Gate {} requires missing Artifact id: {}", gate.label(), aid),
            ));
        }
    }
}

fn check_decision(cx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
    let Some(decision) = cx.phases.decision_phase().requested_decision() else {
        return;
    };
    for aid in unresolved(decision.artifacts(), &cx.index.artifacts) {
        out.push(Violation::new(
            Rule::DecisionMissingArtifact,
            format!("Decision references missing Artifact id: {}", aid),
        ));
    }
    for cid in unresolved(decision.based_on_checks(), &cx.index.checks) {
        out.push(Violation::new(
            Rule::DecisionMissingCheck,
            format!("Decision references missing Check id: {}", cid),
        ));
    }
}

/// Rendered references that do not resolve, in reference order.
fn unresolved<'r, T>(
    refs: &'r [Value],
    index: &'r IdIndex<'_, T>,
) -> impl Iterator<Item = String> + 'r {
    refs.iter()
        .filter(|r| !index.resolves(r))
        .map(|r| describe(Some(r)))
}
