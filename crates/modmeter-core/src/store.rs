//! Process-wide invocation counters.
//!
//! `CounterStore` is the only shared mutable state in the metrics pipeline. A
//! single `Mutex` guards the whole map so that `snapshot_and_clear` is one
//! indivisible step relative to concurrent `increment` calls: an increment
//! either lands in the returned snapshot or in the emptied store, never both
//! and never neither. Critical sections do no I/O and no allocation beyond the
//! map entry itself.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Immutable point-in-time copy of the counters, ordered by metric name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, u64>);

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn into_inner(self) -> BTreeMap<String, u64> {
        self.0
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<HashMap<String, u64>> for Snapshot {
    fn from(map: HashMap<String, u64>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

/// Lock-protected mapping from metric name to invocation count.
#[derive(Debug, Default)]
pub struct CounterStore {
    counts: Mutex<HashMap<String, u64>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written (every
    // mutation is a single entry update), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add 1 to `name`, inserting it with 1 if absent.
    pub fn increment(&self, name: &str) {
        let mut counts = self.lock();
        match counts.get_mut(name) {
            Some(v) => *v = v.saturating_add(1),
            None => {
                counts.insert(name.to_owned(), 1);
            }
        }
    }

    /// Point read. `None` for a name never incremented since the last clear.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.lock().get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current counts. Does not clear.
    pub fn snapshot(&self) -> Snapshot {
        let copy = self.lock().clone();
        Snapshot::from(copy)
    }

    /// Take every count and leave the store empty, atomically.
    pub fn snapshot_and_clear(&self) -> Snapshot {
        let taken = std::mem::take(&mut *self.lock());
        Snapshot::from(taken)
    }

    /// Add a previously taken snapshot back on top of whatever has been
    /// counted since. Used to restore counts after a failed report.
    pub fn merge(&self, snapshot: Snapshot) {
        if snapshot.is_empty() {
            return;
        }
        let mut counts = self.lock();
        for (name, v) in snapshot.into_inner() {
            let slot = counts.entry(name).or_insert(0);
            *slot = slot.saturating_add(v);
        }
    }
}
