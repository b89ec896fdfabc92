//! Occupancy history for state machines.
//!
//! The engine appends one record per state it occupies: the bootstrap
//! state, the target of every successful transition, and the initial
//! state again after a reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What put the machine into a state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryCause {
    /// The state was the first one registered.
    Bootstrap,
    /// A transition fired on this trigger.
    Trigger(String),
    /// The machine was reset to its initial state.
    Reset,
}

/// Record of a single state occupancy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Name of the occupied state
    pub state: String,
    /// When the state became current
    pub entered_at: DateTime<Utc>,
    /// What put the machine there
    pub cause: EntryCause,
}

/// Ordered, append-only log of every state the machine has occupied.
///
/// Records are only ever appended, except on reset, which starts a
/// fresh log for the initial state. Once a machine has any state, its
/// history is never empty and the last record always names the current
/// state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, state: impl Into<String>, cause: EntryCause) {
        self.entries.push(HistoryEntry {
            state: state.into(),
            entered_at: Utc::now(),
            cause,
        });
    }

    pub(crate) fn reset_to(&mut self, state: impl Into<String>) {
        self.entries.clear();
        self.record(state, EntryCause::Reset);
    }

    /// All recorded entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The state names in occupancy order.
    pub fn path(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.state.as_str()).collect()
    }

    /// Name of the most recently occupied state, if any.
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.state.as_str())
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no state has been occupied yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elapsed time between the first and last entry.
    ///
    /// Returns `None` while the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let elapsed = last.entered_at.signed_duration_since(first.entered_at);
            elapsed.to_std().ok()
        } else {
            None
        }
    }
}
