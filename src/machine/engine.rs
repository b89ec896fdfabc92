//! The trigger-driven machine engine.

use crate::core::{EntryCause, History, State, Transition};
use crate::events::{EventKind, Listener, ListenerRegistry, MachineEvent};
use crate::machine::error::DefinitionError;
use crate::machine::result::TransitionResult;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, error};
use uuid::Uuid;

/// A finite state machine driven by named triggers.
///
/// A machine owns a caller-supplied context value of type `C` and is
/// assembled from states and transitions. Triggers may carry an event
/// payload of type `E`, which is lent to guards and actions untouched.
///
/// Configuration problems (duplicate names, unknown states, queries on
/// an empty machine) surface as `DefinitionError`. Runtime outcomes of
/// `trigger` are values of `TransitionResult` and never raised.
///
/// # Example
///
/// ```rust
/// use turnstile::{ScriptedState, ScriptedTransition, StateMachine, TransitionResult};
///
/// let mut machine: StateMachine<u32> = StateMachine::new(0);
/// machine.add_state(ScriptedState::new("locked"), true).unwrap();
/// machine.add_state(ScriptedState::new("unlocked"), false).unwrap();
/// machine
///     .add_transition(
///         ScriptedTransition::new("locked", "unlocked", "coin")
///             .perform(|coins: &mut u32, _| *coins += 1),
///     )
///     .unwrap();
///
/// let outcome = machine.trigger("coin", None).unwrap();
/// assert_eq!(outcome, TransitionResult::Success);
/// assert_eq!(machine.current_state_name().unwrap(), "unlocked");
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct StateMachine<C, E = ()> {
    id: Uuid,
    context: C,
    states: HashMap<String, Box<dyn State<C>>>,
    outgoing: HashMap<String, HashMap<String, Box<dyn Transition<C, E>>>>,
    initial: Option<String>,
    current: Option<String>,
    history: History,
    listeners: ListenerRegistry,
}

impl<C, E> StateMachine<C, E> {
    /// Create an empty machine owning the given context.
    pub fn new(context: C) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            states: HashMap::new(),
            outgoing: HashMap::new(),
            initial: None,
            current: None,
            history: History::new(),
            listeners: ListenerRegistry::default(),
        }
    }

    /// This machine's instance id, as carried in its log fields.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Shared view of the caller-owned context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable view of the caller-owned context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// The occupancy history so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Name of the current state.
    ///
    /// Fails with `NoInitialState` while the machine has no states.
    pub fn current_state_name(&self) -> Result<&str, DefinitionError> {
        self.current.as_deref().ok_or(DefinitionError::NoInitialState)
    }

    /// Name of the designated initial state, if any.
    pub fn initial_state_name(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// Register a state.
    ///
    /// The very first state registered immediately becomes current: the
    /// machine enters it, records it in history, and fires its entry
    /// hook. This happens whether or not `is_initial` is set. A state
    /// added with `is_initial`, or while no initial state is designated
    /// yet, becomes the initial state `reset` returns to.
    pub fn add_state(
        &mut self,
        state: impl State<C> + 'static,
        is_initial: bool,
    ) -> Result<(), DefinitionError> {
        let name = state.name().to_string();
        if self.states.contains_key(&name) {
            return Err(DefinitionError::DuplicateState { name });
        }

        let bootstrap = self.states.is_empty();
        self.states.insert(name.clone(), Box::new(state));
        self.outgoing.insert(name.clone(), HashMap::new());

        if is_initial || self.initial.is_none() {
            self.initial = Some(name.clone());
        }
        debug!(machine = %self.id, state = %name, is_initial, "state registered");

        if bootstrap {
            self.current = Some(name.clone());
            self.history.record(name.clone(), EntryCause::Bootstrap);
            if let Some(state) = self.states.get(&name) {
                state.on_enter(&mut self.context);
            }
            debug!(machine = %self.id, state = %name, "entered bootstrap state");
        }

        Ok(())
    }

    /// Register a transition.
    ///
    /// Both endpoints must already be registered, and the source state
    /// must not yet have a transition for this trigger.
    pub fn add_transition(
        &mut self,
        transition: impl Transition<C, E> + 'static,
    ) -> Result<(), DefinitionError> {
        let source = transition.source().to_string();
        let target = transition.target().to_string();
        let trigger = transition.trigger().to_string();

        if !self.states.contains_key(&source) {
            return Err(DefinitionError::InvalidState { name: source });
        }
        if !self.states.contains_key(&target) {
            return Err(DefinitionError::InvalidState { name: target });
        }

        let edges = self.outgoing.entry(source.clone()).or_default();
        if edges.contains_key(&trigger) {
            return Err(DefinitionError::DuplicateTransition {
                state: source,
                trigger,
            });
        }
        edges.insert(trigger.clone(), Box::new(transition));

        debug!(
            machine = %self.id,
            source = %source,
            target = %target,
            trigger = %trigger,
            "transition registered"
        );
        Ok(())
    }

    /// Dispatch a trigger against the current state.
    ///
    /// Fails with `NoInitialState` while the machine has no states;
    /// every other outcome is reported in the returned
    /// `TransitionResult`.
    pub fn trigger(
        &mut self,
        trigger: &str,
        event: Option<&E>,
    ) -> Result<TransitionResult, DefinitionError> {
        let Some(current) = self.current.clone() else {
            return Err(DefinitionError::NoInitialState);
        };

        let Some(transition) = self
            .outgoing
            .get(&current)
            .and_then(|edges| edges.get(trigger))
        else {
            debug!(
                machine = %self.id,
                state = %current,
                trigger = %trigger,
                "no transition for trigger"
            );
            self.listeners.emit(&MachineEvent::InvalidTransition {
                state: current,
                trigger: trigger.to_string(),
            });
            return Ok(TransitionResult::InvalidTransition);
        };

        if !transition.can_transit(&self.context, event) {
            self.listeners.emit(&MachineEvent::GuardFailed {
                state: current,
                trigger: trigger.to_string(),
            });
            return Ok(TransitionResult::FailedGuardCondition);
        }

        // Re-resolve the target by name: a custom transition may report
        // a target the machine never registered.
        let target = transition.target().to_string();
        if !self.states.contains_key(&target) {
            self.listeners
                .emit(&MachineEvent::InvalidState { state: target });
            return Ok(TransitionResult::InvalidState);
        }

        self.listeners.emit(&MachineEvent::TransitionStart {
            source: current.clone(),
            target: target.clone(),
            trigger: trigger.to_string(),
        });

        if let Some(state) = self.states.get(&current) {
            state.on_exit(&mut self.context);
        }

        if let Err(action_error) = transition.execute(&mut self.context, event) {
            self.listeners.emit(&MachineEvent::TransitionError {
                source: current.clone(),
                target: target.clone(),
                trigger: trigger.to_string(),
                error: action_error.to_string(),
            });
            error!(
                machine = %self.id,
                source = %current,
                target = %target,
                trigger = %trigger,
                error = %action_error,
                "transition action failed"
            );
            // The machine never left the source state; re-run its entry
            // hook to mirror the exit that already happened.
            if let Some(state) = self.states.get(&current) {
                state.on_enter(&mut self.context);
            }
            return Ok(TransitionResult::FailedAction);
        }

        self.current = Some(target.clone());
        self.history
            .record(target.clone(), EntryCause::Trigger(trigger.to_string()));
        if let Some(state) = self.states.get(&target) {
            state.on_enter(&mut self.context);
        }
        self.listeners.emit(&MachineEvent::TransitionComplete {
            source: current.clone(),
            target: target.clone(),
            trigger: trigger.to_string(),
        });
        debug!(
            machine = %self.id,
            source = %current,
            target = %target,
            trigger = %trigger,
            "transition complete"
        );
        Ok(TransitionResult::Success)
    }

    /// Whether the current state has a transition for this trigger.
    ///
    /// Consults the edge table only; guards are not evaluated.
    pub fn can_trigger(&self, trigger: &str) -> Result<bool, DefinitionError> {
        let current = self
            .current
            .as_deref()
            .ok_or(DefinitionError::NoInitialState)?;
        Ok(self
            .outgoing
            .get(current)
            .is_some_and(|edges| edges.contains_key(trigger)))
    }

    /// All trigger names the current state has transitions for,
    /// regardless of whether their guards would pass.
    pub fn permitted_triggers(&self) -> Result<HashSet<String>, DefinitionError> {
        let current = self
            .current
            .as_deref()
            .ok_or(DefinitionError::NoInitialState)?;
        Ok(self
            .outgoing
            .get(current)
            .map(|edges| edges.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// Return the machine to its initial state.
    ///
    /// Exits the current state, starts a fresh single-entry history for
    /// the initial state, and fires its entry hook. Fails with
    /// `NoInitialState` if no initial state was ever designated.
    pub fn reset(&mut self) -> Result<(), DefinitionError> {
        let Some(initial) = self.initial.clone() else {
            return Err(DefinitionError::NoInitialState);
        };

        if let Some(current) = self.current.clone() {
            if let Some(state) = self.states.get(&current) {
                state.on_exit(&mut self.context);
            }
        }

        self.current = Some(initial.clone());
        self.history.reset_to(initial.clone());
        if let Some(state) = self.states.get(&initial) {
            state.on_enter(&mut self.context);
        }
        self.listeners.emit(&MachineEvent::Reset {
            initial: initial.clone(),
        });
        debug!(machine = %self.id, initial = %initial, "machine reset");
        Ok(())
    }

    /// Subscribe a listener to one event kind.
    ///
    /// Listeners fire in registration order and cannot change the
    /// outcome of the operation that emitted the event.
    pub fn add_event_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.subscribe(kind, listener);
    }

    /// Remove a previously subscribed listener.
    ///
    /// Matching is by `Arc` pointer identity; the first matching
    /// registration is dropped. Unknown listeners are ignored.
    pub fn remove_event_listener(&mut self, kind: EventKind, listener: &Listener) {
        self.listeners.unsubscribe(kind, listener);
    }
}

impl<C, E> fmt::Debug for StateMachine<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&String> = self.states.keys().collect();
        states.sort();
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("initial", &self.initial)
            .field("states", &states)
            .finish_non_exhaustive()
    }
}
