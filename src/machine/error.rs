//! Configuration errors raised while defining or querying a machine.

use thiserror::Error;

/// Errors raised by machine assembly and by queries on an empty machine.
///
/// Runtime transition outcomes are never reported here; they are values
/// of `TransitionResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("state '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("state '{state}' already has a transition for trigger '{trigger}'")]
    DuplicateTransition { state: String, trigger: String },

    #[error("state '{name}' is not registered")]
    InvalidState { name: String },

    #[error("no initial state has been designated")]
    NoInitialState,
}
