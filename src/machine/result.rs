//! Outcome codes for trigger dispatch.

/// Outcome of a single trigger dispatch.
///
/// Every runtime outcome is reported through this enum rather than
/// through `Err`; only configuration problems surface as
/// `DefinitionError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionResult {
    /// The transition fired and the machine advanced.
    Success,
    /// The guard vetoed the transition.
    FailedGuardCondition,
    /// Reserved for validation outcomes ahead of guard evaluation.
    /// `trigger` does not currently produce it.
    FailedValidation,
    /// The action failed; the machine stayed in its source state.
    FailedAction,
    /// The current state has no transition for the trigger.
    InvalidTransition,
    /// The transition named a target the machine does not know.
    InvalidState,
}

impl TransitionResult {
    /// Whether the machine advanced.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
