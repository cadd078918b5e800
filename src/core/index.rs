//! Global artifact and check indexes.
//!
//! Built once per validation run from every phase's `artifacts` and `checks`
//! sequences. Entries without a non-empty scalar id are skipped. A duplicate
//! id keeps the position of its first declaration and the content of its last.

use crate::core::trace::{Artifact, Check, CheckStatus, EntityId, Phases};
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Insertion-ordered id map with last-write-wins values.
#[derive(Debug, Clone)]
pub struct IdIndex<'a, T> {
    entries: Vec<(EntityId<'a>, T)>,
    positions: FxHashMap<String, usize>,
}

impl<'a, T> Default for IdIndex<'a, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: FxHashMap::default(),
        }
    }
}

impl<'a, T> IdIndex<'a, T> {
    pub fn insert(&mut self, id: EntityId<'a>, item: T) {
        match self.positions.get(id.key()) {
            Some(&pos) => self.entries[pos].1 = item,
            None => {
                self.positions.insert(id.key().to_string(), self.entries.len());
                self.entries.push((id, item));
            }
        }
    }

    /// Whether a reference value names an indexed id of the same JSON type.
    pub fn resolves(&self, reference: &Value) -> bool {
        self.positions.contains_key(&EntityId::key_of(reference))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId<'a>, &T)> + '_ {
        self.entries.iter().map(|(id, item)| (id, item))
    }

    #[cfg(test)]
    fn get(&self, reference: &Value) -> Option<&T> {
        self.positions
            .get(&EntityId::key_of(reference))
            .map(|&pos| &self.entries[pos].1)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TraceIndex<'a> {
    pub artifacts: IdIndex<'a, Artifact<'a>>,
    pub checks: IdIndex<'a, Check<'a>>,
}

impl<'a> TraceIndex<'a> {
    pub fn build(phases: &Phases<'a>) -> Self {
        let mut index = Self::default();
        for phase in phases.entries() {
            for value in phase.items("artifacts") {
                let artifact = Artifact::from_value(value);
                if let Some(id) = artifact.id() {
                    index.artifacts.insert(id, artifact);
                }
            }
            for value in phase.items("checks") {
                let check = Check::from_value(value);
                if let Some(id) = check.id() {
                    index.checks.insert(id, check);
                }
            }
        }
        index
    }

    pub fn has_human_confirmation(&self) -> bool {
        self.artifacts
            .iter()
            .any(|(_, artifact)| artifact.is_human_confirmation())
    }

    /// Rendered ids of indexed checks whose status is `blocked`, ordered by
    /// their canonical JSON key.
    pub fn blocked_checks(&self) -> Vec<String> {
        let mut blocked: Vec<&EntityId<'a>> = self
            .checks
            .iter()
            .filter(|(_, check)| check.status() == Some(CheckStatus::Blocked))
            .map(|(id, _)| id)
            .collect();
        blocked.sort_by(|a, b| a.key().cmp(b.key()));
        blocked.into_iter().map(ToString::to_string).collect()
    }
}
