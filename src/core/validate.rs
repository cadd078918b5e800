//! Trace validation harness.
//!
//! Runs the structural, referential and policy passes over one loaded
//! document, in that order, appending to a single ordered violation list.
//!
//! - **Validation is deterministic**: the same document always yields the same
//!   violations in the same order.
//! - **No short-circuit**: every rule runs, except that a `phases` field that
//!   is not a list stops all phase-dependent checks.
//! - **Violations are data**: a failing trace is a successful validation run.

use crate::core::index::TraceIndex;
use crate::core::trace::{Phases, TaskClass, Trace};
use crate::core::{policy, referential, structural};
use serde::Serialize;
use serde_json::Value;

/// Which pass discovered a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Structural,
    Referential,
    Policy,
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Referential => write!(f, "referential"),
            Self::Policy => write!(f, "policy"),
        }
    }
}

/// Stable code for each rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    MissingTopLevelField,
    InvalidTaskClass,
    PhasesNotList,
    PhaseOrder,
    MissingContext,
    ContextFieldMissing,
    MissingHypotheses,
    MissingAudit,
    InvalidConformance,
    InvalidCheckStatus,
    CheckWithoutArtifacts,
    CheckMissingArtifact,
    GateMissingArtifact,
    DecisionMissingArtifact,
    DecisionMissingCheck,
    InvalidFailureType,
    FailureWithoutCorrection,
    RiskRequired,
    InvalidRiskLevel,
    HumanConfirmationRequired,
    DecisionFieldMissing,
    UnknownsMustBlock,
    BlockedChecksMustBlock,
    ApprovedWithFailures,
}

impl Rule {
    pub fn pass(self) -> PassKind {
        match self {
            Self::MissingTopLevelField
            | Self::InvalidTaskClass
            | Self::PhasesNotList
            | Self::PhaseOrder
            | Self::MissingContext
            | Self::ContextFieldMissing
            | Self::MissingHypotheses
            | Self::MissingAudit
            | Self::InvalidConformance => PassKind::Structural,
            Self::InvalidCheckStatus
            | Self::CheckWithoutArtifacts
            | Self::CheckMissingArtifact
            | Self::GateMissingArtifact
            | Self::DecisionMissingArtifact
            | Self::DecisionMissingCheck => PassKind::Referential,
            Self::InvalidFailureType
            | Self::FailureWithoutCorrection
            | Self::RiskRequired
            | Self::InvalidRiskLevel
            | Self::HumanConfirmationRequired
            | Self::DecisionFieldMissing
            | Self::UnknownsMustBlock
            | Self::BlockedChecksMustBlock
            | Self::ApprovedWithFailures => PassKind::Policy,
        }
    }
}

/// Individual violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub pass: PassKind,
    pub rule: Rule,
    pub message: String,
}

impl Violation {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            pass: rule.pass(),
            rule,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Read-only state shared by the phase-dependent passes.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    pub task_class: Option<TaskClass>,
    pub phases: Phases<'a>,
    pub index: TraceIndex<'a>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(trace: Trace<'a>, phases: Phases<'a>) -> Self {
        let index = TraceIndex::build(&phases);
        Self {
            task_class: trace.task_class(),
            phases,
            index,
        }
    }
}

/// Violations found by one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pass: PassKind,
    pub violations: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    #[serde(skip)]
    pub passes: Vec<PassSummary>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    fn run_pass<T>(&mut self, pass: PassKind, f: impl FnOnce(&mut Vec<Violation>) -> T) -> T {
        let before = self.violations.len();
        let out = f(&mut self.violations);
        self.passes.push(PassSummary {
            pass,
            violations: self.violations.len() - before,
        });
        out
    }
}

/// Validate a loaded trace document.
pub fn validate_trace(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let trace = Trace::new(document);

    let cx = report.run_pass(PassKind::Structural, |out| {
        let phases = structural::check_document(&trace, out)?;
        let cx = ValidationContext::new(trace, phases);
        structural::check_phases(&cx, out);
        Some(cx)
    });
    let Some(cx) = cx else {
        return report;
    };

    report.run_pass(PassKind::Referential, |out| referential::check(&cx, out));
    report.run_pass(PassKind::Policy, |out| policy::check(&cx, out));
    report
}

/// Validate a document and return only the violation messages.
pub fn validate(document: &Value) -> Vec<String> {
    validate_trace(document).messages()
}
