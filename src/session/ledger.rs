//! Action ledger: the ordered log of recorded actions and their counts.
//!
//! The ledger is chronological. Toggle deactivation removes the most recent
//! record of the same kind, wherever it sits in the log.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::model::{ActionKind, ActionRecord};

/// Per-kind counts. Every counted kind is always present, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts(BTreeMap<ActionKind, u32>);

impl Default for Counts {
    fn default() -> Self {
        Self(ActionKind::COUNTED.into_iter().map(|k| (k, 0)).collect())
    }
}

impl Counts {
    pub fn get(&self, kind: ActionKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Counts in export column order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, u32)> + '_ {
        ActionKind::COUNTED.into_iter().map(|k| (k, self.get(k)))
    }

    fn set(&mut self, kind: ActionKind, value: u32) {
        if let Some(count) = self.0.get_mut(&kind) {
            *count = value;
        }
    }

    fn increment(&mut self, kind: ActionKind) {
        if let Some(count) = self.0.get_mut(&kind) {
            *count += 1;
        }
    }
}

// Serialized as a JSON object in export column order, not key order.
impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ActionKind::COUNTED.len()))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(kind.name(), &count)?;
        }
        map.end()
    }
}

/// Ordered log of recorded actions plus the per-kind counts derived from it.
#[derive(Debug, Clone, Default)]
pub struct ActionLedger {
    records: Vec<ActionRecord>,
    counts: Counts,
}

impl ActionLedger {
    /// Append a record. Toggle activations set their count to 1; everything
    /// else increments.
    pub fn append(&mut self, record: ActionRecord) {
        if record.toggled {
            self.counts.set(record.kind, 1);
        } else {
            self.counts.increment(record.kind);
        }
        self.records.push(record);
    }

    /// Remove the most recent record of `kind` and zero its count.
    ///
    /// Backward scan; the ledger is bounded by match length.
    pub fn remove_last(&mut self, kind: ActionKind) -> Option<ActionRecord> {
        let index = self.records.iter().rposition(|r| r.kind == kind)?;
        self.counts.set(kind, 0);
        Some(self.records.remove(index))
    }

    pub fn count(&self, kind: ActionKind) -> u32 {
        self.counts.get(kind)
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Records in chronological order.
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Records newest first, the way a timeline shows them.
    pub fn recent(&self) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
