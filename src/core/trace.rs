//! Typed, borrowed views over a loaded BOL trace document.
//!
//! The document stays a `serde_json::Value`; every accessor here tolerates
//! missing keys and wrong JSON types so the passes can report shape problems
//! as violations instead of panicking. A mapping that is absent (or not a
//! mapping) reads as an empty one.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level keys every trace must carry.
pub const REQUIRED_TOP_LEVEL: [&str; 4] = ["bol_version", "trace_id", "task", "phases"];
/// Keys PHASE 0 context must declare (empty sequences are fine).
pub const CONTEXT_FIELDS: [&str; 3] = ["known", "unknown", "assumptions"];
/// Fields an evaluated decision must carry with a non-empty value.
pub const DECISION_FIELDS: [&str; 5] = ["owner", "timestamp", "artifacts", "based_on_checks", "result"];
/// Artifact type that satisfies a human-required gate.
pub const HUMAN_CONFIRMATION: &str = "HumanConfirmation";

/// Key/value lookups over an optional JSON mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        Self(value.and_then(Value::as_object))
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|m| m.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.is_some_and(|m| m.contains_key(key))
    }

    /// Present with a non-empty value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Items of a sequence field; any other JSON type yields nothing.
    pub fn items(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// `true` only when the field is the JSON literal `true`.
    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }
}

/// JSON emptiness: null, false, zero, "", [] and {} are all empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a field value for a violation message.
///
/// An absent field is `missing`; strings print bare; every other JSON value
/// prints as its JSON text (`null`, `7`, `true`, `["a"]`).
pub fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Identity of an artifact or check: any non-empty scalar `id`.
///
/// Keyed by canonical JSON text, so `5` and `"5"` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityId<'a> {
    value: &'a Value,
    key: String,
}

impl<'a> EntityId<'a> {
    pub fn of(value: &'a Value) -> Option<Self> {
        let scalar = matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_));
        (scalar && is_truthy(value)).then(|| Self {
            value,
            key: Self::key_of(value),
        })
    }

    /// Lookup key for an id or a reference to one.
    pub fn key_of(value: &Value) -> String {
        value.to_string()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for EntityId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&describe(Some(self.value)))
    }
}

/// Deserialize a closed enumeration from a field, `None` if absent or not a member.
pub fn parse_enum<'a, T: Deserialize<'a>>(value: Option<&'a Value>) -> Option<T> {
    value.and_then(|v| T::deserialize(v).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TaskClass {
    A,
    B,
    C,
}

impl TaskClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    pub fn requires_risk(self) -> bool {
        matches!(self, Self::B | Self::C)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    ContextLoss,
    MissingArtifact,
    InvariantViolation,
    Overconfidence,
    UncheckedAssumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Conformance {
    Conformant,
    NonConformant,
}

/// Root of a trace document.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    fields: Fields<'a>,
}

/// Shape of the root `phases` field.
#[derive(Debug, Clone, Copy)]
pub enum PhasesField<'a> {
    Absent,
    NotAList,
    List(&'a [Value]),
}

impl<'a> Trace<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self {
            fields: Fields::of(Some(document)),
        }
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains(key)
    }

    pub fn trace_id(&self) -> Option<&'a str> {
        self.fields.str("trace_id")
    }

    pub fn task_class_raw(&self) -> Option<&'a Value> {
        Fields::of(self.fields.get("task")).get("class")
    }

    pub fn task_class(&self) -> Option<TaskClass> {
        parse_enum(self.task_class_raw())
    }

    pub fn phases_field(&self) -> PhasesField<'a> {
        match self.fields.get("phases") {
            None => PhasesField::Absent,
            Some(Value::Array(items)) => PhasesField::List(items),
            Some(_) => PhasesField::NotAList,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PhaseNumber {
    Context = 0,
    Hypotheses = 1,
    Failures = 2,
    RiskGateDecision = 3,
    Audit = 4,
}

impl PhaseNumber {
    pub const ALL: [PhaseNumber; 5] = [
        Self::Context,
        Self::Hypotheses,
        Self::Failures,
        Self::RiskGateDecision,
        Self::Audit,
    ];

    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

/// Numeric `phase` value of an entry, accepting integral floats.
fn phase_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// The mapping entries of the `phases` sequence.
#[derive(Debug, Clone, Default)]
pub struct Phases<'a> {
    entries: Vec<&'a Map<String, Value>>,
}

impl<'a> Phases<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self {
            entries: items.iter().filter_map(Value::as_object).collect(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = Fields<'a>> + '_ {
        self.entries.iter().map(|m| Fields(Some(*m)))
    }

    /// Raw `phase` values in document order, non-mapping entries skipped.
    pub fn observed_numbers(&self) -> Vec<Option<&'a Value>> {
        self.entries.iter().map(|m| m.get("phase")).collect()
    }

    pub fn is_canonical_order(&self) -> bool {
        let observed = self.observed_numbers();
        observed.len() == PhaseNumber::ALL.len()
            && observed
                .iter()
                .zip(PhaseNumber::ALL)
                .all(|(got, want)| got.and_then(phase_number) == Some(want.as_u64()))
    }

    /// First entry declaring `number`; empty when none does.
    fn lookup(&self, number: PhaseNumber) -> Fields<'a> {
        let found = self.entries.iter().copied().find(|m| {
            m.get("phase").and_then(phase_number) == Some(number.as_u64())
        });
        Fields(found)
    }

    pub fn phase(&self, number: PhaseNumber) -> Phase<'a> {
        let fields = self.lookup(number);
        match number {
            PhaseNumber::Context => Phase::Context(ContextPhase(fields)),
            PhaseNumber::Hypotheses => Phase::Hypotheses(HypothesesPhase(fields)),
            PhaseNumber::Failures => Phase::Failures(FailuresPhase(fields)),
            PhaseNumber::RiskGateDecision => Phase::RiskGateDecision(DecisionPhase(fields)),
            PhaseNumber::Audit => Phase::Audit(AuditPhase(fields)),
        }
    }

    pub fn context(&self) -> ContextPhase<'a> {
        ContextPhase(self.lookup(PhaseNumber::Context))
    }

    pub fn failures(&self) -> FailuresPhase<'a> {
        FailuresPhase(self.lookup(PhaseNumber::Failures))
    }

    pub fn decision_phase(&self) -> DecisionPhase<'a> {
        DecisionPhase(self.lookup(PhaseNumber::RiskGateDecision))
    }
}

/// One of the five fixed phases, keyed by phase number.
#[derive(Debug, Clone, Copy)]
pub enum Phase<'a> {
    Context(ContextPhase<'a>),
    Hypotheses(HypothesesPhase<'a>),
    Failures(FailuresPhase<'a>),
    RiskGateDecision(DecisionPhase<'a>),
    Audit(AuditPhase<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ContextPhase<'a>(Fields<'a>);

impl<'a> ContextPhase<'a> {
    pub fn is_declared(&self) -> bool {
        self.0.has("context")
    }

    pub fn context(&self) -> Fields<'a> {
        Fields::of(self.0.get("context"))
    }

    pub fn has_unknowns(&self) -> bool {
        self.context().has("unknown")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HypothesesPhase<'a>(Fields<'a>);

impl<'a> HypothesesPhase<'a> {
    pub fn is_declared(&self) -> bool {
        matches!(self.0.get("hypotheses"), Some(Value::Array(items)) if !items.is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FailuresPhase<'a>(Fields<'a>);

impl<'a> FailuresPhase<'a> {
    pub fn failures(self) -> impl Iterator<Item = Failure<'a>> {
        self.0
            .items("failures")
            .iter()
            .map(|v| Failure(Fields::of(Some(v))))
    }

    pub fn has_failures(&self) -> bool {
        !self.0.items("failures").is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Failure<'a>(Fields<'a>);

impl<'a> Failure<'a> {
    pub fn kind_raw(&self) -> Option<&'a Value> {
        self.0.get("type")
    }

    pub fn kind(&self) -> Option<FailureType> {
        parse_enum(self.kind_raw())
    }

    pub fn has_correction(&self) -> bool {
        self.0.has("correction")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionPhase<'a>(Fields<'a>);

impl<'a> DecisionPhase<'a> {
    /// `None` when no non-empty risk block is declared.
    pub fn risk(&self) -> Option<Risk<'a>> {
        self.0
            .get("risk")
            .filter(|v| is_truthy(v))
            .map(|v| Risk(Fields::of(Some(v))))
    }

    pub fn gates(self) -> impl Iterator<Item = Gate<'a>> {
        self.0
            .items("gates")
            .iter()
            .map(|v| Gate(Fields::of(Some(v))))
    }

    /// The decision, only when the attempt was requested and carries one.
    pub fn requested_decision(&self) -> Option<Decision<'a>> {
        let attempt = Fields::of(self.0.get("decision_attempt"));
        if !attempt.has("requested") {
            return None;
        }
        attempt
            .get("decision")
            .filter(|v| is_truthy(v))
            .map(|v| Decision(Fields::of(Some(v))))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Risk<'a>(Fields<'a>);

impl<'a> Risk<'a> {
    pub fn level_raw(&self) -> Option<&'a Value> {
        self.0.get("level")
    }

    pub fn level(&self) -> Option<RiskLevel> {
        parse_enum(self.level_raw())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Gate<'a>(Fields<'a>);

impl<'a> Gate<'a> {
    pub fn label(&self) -> String {
        match self.0.get("id") {
            None => "<no-id>".to_string(),
            some => describe(some),
        }
    }

    pub fn required_artifacts(&self) -> &'a [Value] {
        self.0.items("required_artifacts")
    }

    pub fn human_required(&self) -> bool {
        self.0.is_true("human_required")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Decision<'a>(Fields<'a>);

impl<'a> Decision<'a> {
    pub fn has(&self, field: &str) -> bool {
        self.0.has(field)
    }

    pub fn artifacts(&self) -> &'a [Value] {
        self.0.items("artifacts")
    }

    pub fn based_on_checks(&self) -> &'a [Value] {
        self.0.items("based_on_checks")
    }

    pub fn result_is(&self, expected: &str) -> bool {
        self.0.str("result") == Some(expected)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuditPhase<'a>(Fields<'a>);

impl<'a> AuditPhase<'a> {
    pub fn is_declared(&self) -> bool {
        self.0.has("audit")
    }

    pub fn conformance(&self) -> Option<Conformance> {
        parse_enum(Fields::of(self.0.get("audit")).get("conformance"))
    }
}

/// Evidence object declared in any phase's `artifacts`.
#[derive(Debug, Clone, Copy)]
pub struct Artifact<'a>(Fields<'a>);

impl<'a> Artifact<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        Self(Fields::of(Some(value)))
    }

    pub fn id(&self) -> Option<EntityId<'a>> {
        self.0.get("id").and_then(EntityId::of)
    }

    pub fn is_human_confirmation(&self) -> bool {
        self.0.str("type") == Some(HUMAN_CONFIRMATION)
    }
}

/// Verification result declared in any phase's `checks`.
#[derive(Debug, Clone, Copy)]
pub struct Check<'a>(Fields<'a>);

/// Shape of a check's `artifacts` reference list.
#[derive(Debug, Clone, Copy)]
pub enum CheckRefs<'a> {
    Empty,
    List(&'a [Value]),
}

impl<'a> Check<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        Self(Fields::of(Some(value)))
    }

    pub fn id(&self) -> Option<EntityId<'a>> {
        self.0.get("id").and_then(EntityId::of)
    }

    pub fn status_raw(&self) -> Option<&'a Value> {
        self.0.get("status")
    }

    pub fn status(&self) -> Option<CheckStatus> {
        parse_enum(self.status_raw())
    }

    pub fn artifact_refs(&self) -> CheckRefs<'a> {
        match self.0.get("artifacts") {
            Some(Value::Array(items)) if !items.is_empty() => CheckRefs::List(items),
            _ => CheckRefs::Empty,
        }
    }
}
