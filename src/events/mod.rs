//! Named machine events and listener fan-out.
//!
//! A machine announces what it does through a fixed set of named
//! events. Callers subscribe listeners per event kind; listeners are
//! observation-only and cannot change the outcome of an operation.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// The kinds of events a machine announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A transition passed its guard and is about to run.
    TransitionStart,
    /// A transition ran to completion and the machine advanced.
    TransitionComplete,
    /// A guard vetoed a transition.
    GuardFailed,
    /// The current state has no transition for the requested trigger.
    InvalidTransition,
    /// A transition named a target the machine does not know.
    InvalidState,
    /// A transition's action failed.
    TransitionError,
    /// The machine returned to its initial state.
    Reset,
}

/// A machine event together with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MachineEvent {
    TransitionStart {
        source: String,
        target: String,
        trigger: String,
    },
    TransitionComplete {
        source: String,
        target: String,
        trigger: String,
    },
    GuardFailed {
        state: String,
        trigger: String,
    },
    InvalidTransition {
        state: String,
        trigger: String,
    },
    InvalidState {
        state: String,
    },
    TransitionError {
        source: String,
        target: String,
        trigger: String,
        error: String,
    },
    Reset {
        initial: String,
    },
}

impl MachineEvent {
    /// The kind slot this event is delivered on.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TransitionStart { .. } => EventKind::TransitionStart,
            Self::TransitionComplete { .. } => EventKind::TransitionComplete,
            Self::GuardFailed { .. } => EventKind::GuardFailed,
            Self::InvalidTransition { .. } => EventKind::InvalidTransition,
            Self::InvalidState { .. } => EventKind::InvalidState,
            Self::TransitionError { .. } => EventKind::TransitionError,
            Self::Reset { .. } => EventKind::Reset,
        }
    }
}

/// Callback invoked when a subscribed event fires.
///
/// Listener identity is `Arc` pointer identity: keep a clone of the
/// `Arc` to remove the listener later.
pub type Listener = Arc<dyn Fn(&MachineEvent) + Send + Sync>;

/// Per-kind listener registration. Delivery follows registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    slots: HashMap<EventKind, Vec<Listener>>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(&mut self, kind: EventKind, listener: Listener) {
        self.slots.entry(kind).or_default().push(listener);
    }

    /// Remove the first registration matching the listener, by pointer
    /// identity. Unknown listeners are ignored.
    pub(crate) fn unsubscribe(&mut self, kind: EventKind, listener: &Listener) {
        if let Some(listeners) = self.slots.get_mut(&kind) {
            if let Some(index) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
                listeners.remove(index);
            }
        }
    }

    /// Deliver an event to every listener subscribed to its kind.
    ///
    /// A panicking listener is reported and skipped; delivery continues
    /// with the remaining listeners.
    pub(crate) fn emit(&self, event: &MachineEvent) {
        let Some(listeners) = self.slots.get(&event.kind()) else {
            return;
        };
        for listener in listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                error!(
                    kind = ?event.kind(),
                    reason = panic_message(panic.as_ref()),
                    "event listener panicked"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn start_event() -> MachineEvent {
        MachineEvent::TransitionStart {
            source: "a".to_string(),
            target: "b".to_string(),
            trigger: "go".to_string(),
        }
    }

    #[test]
    fn every_event_maps_to_its_kind() {
        let cases = [
            (start_event(), EventKind::TransitionStart),
            (
                MachineEvent::TransitionComplete {
                    source: "a".to_string(),
                    target: "b".to_string(),
                    trigger: "go".to_string(),
                },
                EventKind::TransitionComplete,
            ),
            (
                MachineEvent::GuardFailed {
                    state: "a".to_string(),
                    trigger: "go".to_string(),
                },
                EventKind::GuardFailed,
            ),
            (
                MachineEvent::InvalidTransition {
                    state: "a".to_string(),
                    trigger: "go".to_string(),
                },
                EventKind::InvalidTransition,
            ),
            (
                MachineEvent::InvalidState {
                    state: "ghost".to_string(),
                },
                EventKind::InvalidState,
            ),
            (
                MachineEvent::TransitionError {
                    source: "a".to_string(),
                    target: "b".to_string(),
                    trigger: "go".to_string(),
                    error: "boom".to_string(),
                },
                EventKind::TransitionError,
            ),
            (
                MachineEvent::Reset {
                    initial: "a".to_string(),
                },
                EventKind::Reset,
            ),
        ];

        for (event, kind) in cases {
            assert_eq!(event.kind(), kind);
        }
    }

    #[test]
    fn emit_delivers_in_registration_order() {
        let order: Arc<Mutex<Vec<&str>>> = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::default();

        let first = Arc::clone(&order);
        registry.subscribe(
            EventKind::TransitionStart,
            Arc::new(move |_| first.lock().unwrap().push("first")),
        );
        let second = Arc::clone(&order);
        registry.subscribe(
            EventKind::TransitionStart,
            Arc::new(move |_| second.lock().unwrap().push("second")),
        );

        registry.emit(&start_event());

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn emit_only_reaches_matching_kind() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::default();

        let counter = Arc::clone(&count);
        registry.subscribe(
            EventKind::Reset,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        registry.emit(&start_event());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        registry.emit(&MachineEvent::Reset {
            initial: "a".to_string(),
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_stop_delivery() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::default();

        registry.subscribe(
            EventKind::TransitionStart,
            Arc::new(|_| panic!("listener blew up")),
        );
        let counter = Arc::clone(&count);
        registry.subscribe(
            EventKind::TransitionStart,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        registry.emit(&start_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_first_matching_registration() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::default();

        let counter = Arc::clone(&count);
        let listener: Listener = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.subscribe(EventKind::TransitionStart, Arc::clone(&listener));
        registry.subscribe(EventKind::TransitionStart, Arc::clone(&listener));

        registry.unsubscribe(EventKind::TransitionStart, &listener);
        registry.emit(&start_event());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribing_unknown_listener_is_a_noop() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::default();

        let counter = Arc::clone(&count);
        registry.subscribe(
            EventKind::TransitionStart,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let stranger: Listener = Arc::new(|_| {});
        registry.unsubscribe(EventKind::TransitionStart, &stranger);
        registry.unsubscribe(EventKind::Reset, &stranger);

        registry.emit(&start_event());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emit_without_subscribers_is_a_noop() {
        let registry = ListenerRegistry::default();
        registry.emit(&start_event());
    }
}
