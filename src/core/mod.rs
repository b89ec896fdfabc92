//! Core building blocks of a machine.
//!
//! This module contains the pieces a machine is assembled from:
//! - State definitions via the `State` trait
//! - Guard predicates for transition control
//! - Transition edges with guards and actions
//! - Occupancy history

mod guard;
mod history;
mod state;
mod transition;

pub use guard::{BoxError, Guard};
pub use history::{EntryCause, History, HistoryEntry};
pub use state::{ScriptedState, State};
pub use transition::{ActionError, ScriptedTransition, Transition};
