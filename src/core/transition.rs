//! Transition contract, the scripted implementation, and action failures.

use super::guard::{BoxError, Guard};
use thiserror::Error;
use tracing::warn;

/// Error returned when a transition's action fails.
///
/// Carries the trigger whose action failed and chains the underlying
/// cause through `source()`.
#[derive(Debug, Error)]
#[error("action for trigger '{trigger}' failed: {source}")]
pub struct ActionError {
    trigger: String,
    #[source]
    source: BoxError,
}

impl ActionError {
    /// Wrap an underlying failure, tagging it with the trigger name.
    pub fn new(trigger: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            trigger: trigger.into(),
            source: source.into(),
        }
    }

    /// Name of the trigger whose action failed.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }
}

/// A directed edge between two states, fired by a named trigger.
///
/// `source`, `target` and `trigger` identify the edge; a machine holds
/// at most one transition per `(source, trigger)` pair. `can_transit`
/// consults the guard and `execute` runs the action. Both default to
/// permissive no-ops so custom implementations only override what they
/// need.
pub trait Transition<C, E = ()>: Send + Sync {
    /// Name of the state this transition leaves.
    fn source(&self) -> &str;

    /// Name of the state this transition enters.
    fn target(&self) -> &str;

    /// Trigger that fires this transition.
    fn trigger(&self) -> &str;

    /// Whether the transition may fire given the context and event.
    ///
    /// Implementations must not mutate anything. A precondition that
    /// cannot be evaluated reads as `false`.
    fn can_transit(&self, _context: &C, _event: Option<&E>) -> bool {
        true
    }

    /// Run the transition's action.
    ///
    /// Called after the source state has been exited. An `Err` here
    /// leaves the machine in its source state.
    fn execute(&self, _context: &mut C, _event: Option<&E>) -> Result<(), ActionError> {
        Ok(())
    }
}

type ActionFn<C, E> = Box<dyn Fn(&mut C, Option<&E>) -> Result<(), BoxError> + Send + Sync>;

/// A `Transition` assembled from closures.
///
/// # Example
///
/// ```rust
/// use turnstile::core::{ScriptedTransition, Transition};
///
/// struct Till {
///     balance: i64,
/// }
///
/// let withdraw = ScriptedTransition::new("open", "open", "withdraw")
///     .when(|till: &Till, amount: Option<&i64>| {
///         amount.is_some_and(|a| till.balance >= *a)
///     })
///     .perform(|till: &mut Till, amount: Option<&i64>| {
///         if let Some(amount) = amount {
///             till.balance -= amount;
///         }
///     });
///
/// let mut till = Till { balance: 100 };
/// assert!(withdraw.can_transit(&till, Some(&60)));
/// withdraw.execute(&mut till, Some(&60)).unwrap();
/// assert_eq!(till.balance, 40);
/// assert!(!withdraw.can_transit(&till, Some(&60)));
/// ```
pub struct ScriptedTransition<C, E = ()> {
    source: String,
    target: String,
    trigger: String,
    guard: Option<Guard<C, E>>,
    action: Option<ActionFn<C, E>>,
}

impl<C, E> ScriptedTransition<C, E> {
    /// Create an unguarded, action-less transition.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            trigger: trigger.into(),
            guard: None,
            action: None,
        }
    }

    /// Attach a guard, replacing any previous one.
    pub fn with_guard(mut self, guard: Guard<C, E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attach a plain boolean guard predicate.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.with_guard(Guard::new(predicate))
    }

    /// Attach a fallible action, replacing any previous one.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, Option<&E>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Attach an action that cannot fail.
    pub fn perform<F>(self, action: F) -> Self
    where
        F: Fn(&mut C, Option<&E>) + Send + Sync + 'static,
    {
        self.with_action(move |context, event| {
            action(context, event);
            Ok(())
        })
    }
}

impl<C, E> Transition<C, E> for ScriptedTransition<C, E> {
    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn trigger(&self) -> &str {
        &self.trigger
    }

    // A guard that errors reads as false: transitions never fire on a
    // broken precondition.
    fn can_transit(&self, context: &C, event: Option<&E>) -> bool {
        let Some(guard) = &self.guard else {
            return true;
        };
        match guard.check(context, event) {
            Ok(allowed) => allowed,
            Err(error) => {
                warn!(
                    source = %self.source,
                    trigger = %self.trigger,
                    error = %error,
                    "guard evaluation failed, treating as false"
                );
                false
            }
        }
    }

    fn execute(&self, context: &mut C, event: Option<&E>) -> Result<(), ActionError> {
        match &self.action {
            None => Ok(()),
            Some(action) => action(context, event)
                .map_err(|source| ActionError::new(self.trigger.clone(), source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accessors_return_edge_names() {
        let transition: ScriptedTransition<()> =
            ScriptedTransition::new("draft", "review", "submit");

        assert_eq!(transition.source(), "draft");
        assert_eq!(transition.target(), "review");
        assert_eq!(transition.trigger(), "submit");
    }

    #[test]
    fn unguarded_transition_is_always_permitted() {
        let transition: ScriptedTransition<u32> = ScriptedTransition::new("a", "b", "go");

        assert!(transition.can_transit(&0, None));
    }

    #[test]
    fn when_predicate_vetoes_transition() {
        let transition: ScriptedTransition<u32> =
            ScriptedTransition::new("a", "b", "go").when(|count: &u32, _| *count >= 3);

        assert!(!transition.can_transit(&1, None));
        assert!(transition.can_transit(&3, None));
    }

    #[test]
    fn erroring_guard_reads_as_false() {
        let transition: ScriptedTransition<u32> = ScriptedTransition::new("a", "b", "go")
            .with_guard(Guard::fallible(|_, _| Err("sensor offline".into())));

        assert!(!transition.can_transit(&0, None));
    }

    #[test]
    fn execute_without_action_is_a_noop() {
        let transition: ScriptedTransition<u32> = ScriptedTransition::new("a", "b", "go");
        let mut context = 9;

        transition.execute(&mut context, None).unwrap();

        assert_eq!(context, 9);
    }

    #[test]
    fn perform_action_mutates_context() {
        let transition: ScriptedTransition<u32> = ScriptedTransition::new("a", "b", "go")
            .perform(|count: &mut u32, _| *count += 1);

        let mut context = 0;
        transition.execute(&mut context, None).unwrap();
        transition.execute(&mut context, None).unwrap();

        assert_eq!(context, 2);
    }

    #[test]
    fn failing_action_names_its_trigger() {
        let transition: ScriptedTransition<()> = ScriptedTransition::new("a", "b", "publish")
            .with_action(|_, _| Err("disk full".into()));

        let error = transition.execute(&mut (), None).unwrap_err();

        assert_eq!(error.trigger(), "publish");
        assert!(error.to_string().contains("publish"));
        assert!(error.to_string().contains("disk full"));
    }

    #[test]
    fn action_receives_event_payload() {
        let transition: ScriptedTransition<Vec<u32>, u32> =
            ScriptedTransition::new("a", "b", "record").perform(|seen: &mut Vec<u32>, event| {
                if let Some(value) = event {
                    seen.push(*value);
                }
            });

        let mut seen = Vec::new();
        transition.execute(&mut seen, Some(&42)).unwrap();

        assert_eq!(seen, vec![42]);
    }
}
