//! Turnstile: an embeddable, trigger-driven finite state machine engine.
//!
//! A machine is assembled from named states and guarded transitions,
//! then driven by symbolic triggers. Guards veto transitions, actions
//! mutate a caller-owned context, and listeners observe every outcome.
//!
//! # Core Concepts
//!
//! - **State**: a named position with entry and exit hooks
//! - **Transition**: a `(source, target, trigger)` edge with an optional
//!   guard and action
//! - **Context**: a caller-owned value lent to every hook
//! - **History**: an append-only, timestamped log of occupied states
//! - **Events**: named observation points with listener fan-out
//!
//! # Example
//!
//! ```rust
//! use turnstile::{ScriptedState, ScriptedTransition, StateMachine, TransitionResult};
//!
//! #[derive(Default)]
//! struct Review {
//!     approvals: u32,
//! }
//!
//! let mut machine: StateMachine<Review> = StateMachine::new(Review::default());
//! machine.add_state(ScriptedState::new("draft"), true).unwrap();
//! machine.add_state(ScriptedState::new("review"), false).unwrap();
//! machine.add_state(ScriptedState::new("approved"), false).unwrap();
//!
//! machine
//!     .add_transition(ScriptedTransition::new("draft", "review", "submit"))
//!     .unwrap();
//! machine
//!     .add_transition(
//!         ScriptedTransition::new("review", "review", "add_approval")
//!             .perform(|review: &mut Review, _| review.approvals += 1),
//!     )
//!     .unwrap();
//! machine
//!     .add_transition(
//!         ScriptedTransition::new("review", "approved", "approve")
//!             .when(|review: &Review, _| review.approvals >= 2),
//!     )
//!     .unwrap();
//!
//! assert_eq!(machine.trigger("submit", None).unwrap(), TransitionResult::Success);
//! assert_eq!(
//!     machine.trigger("approve", None).unwrap(),
//!     TransitionResult::FailedGuardCondition
//! );
//! machine.trigger("add_approval", None).unwrap();
//! machine.trigger("add_approval", None).unwrap();
//! assert_eq!(machine.trigger("approve", None).unwrap(), TransitionResult::Success);
//!
//! assert_eq!(machine.current_state_name().unwrap(), "approved");
//! assert_eq!(
//!     machine.history().path(),
//!     vec!["draft", "review", "review", "review", "approved"]
//! );
//! ```

pub mod core;
pub mod events;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{
    ActionError, BoxError, EntryCause, Guard, History, HistoryEntry, ScriptedState,
    ScriptedTransition, State, Transition,
};
pub use crate::events::{EventKind, Listener, MachineEvent};
pub use crate::machine::{DefinitionError, StateMachine, TransitionResult};
