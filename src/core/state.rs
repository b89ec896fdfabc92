//! State contract and the closure-scripted implementation.
//!
//! A state is a named position in a machine. The engine invokes the
//! entry and exit hooks as the machine moves through it.

/// A named state with entry and exit hooks.
///
/// The engine calls `on_enter` whenever this state becomes current,
/// including when it is the very first state registered, and `on_exit`
/// whenever the machine moves away from it. Both hooks receive the
/// machine's context value and default to no-ops.
///
/// States are identified by `name`, which must be unique within a
/// machine and stable for the lifetime of the state.
///
/// # Example
///
/// ```rust
/// use turnstile::core::State;
///
/// struct Counters {
///     entries: u32,
/// }
///
/// struct Recording;
///
/// impl State<Counters> for Recording {
///     fn name(&self) -> &str {
///         "recording"
///     }
///
///     fn on_enter(&self, context: &mut Counters) {
///         context.entries += 1;
///     }
/// }
///
/// let state = Recording;
/// let mut context = Counters { entries: 0 };
/// state.on_enter(&mut context);
/// assert_eq!(state.name(), "recording");
/// assert_eq!(context.entries, 1);
/// ```
pub trait State<C>: Send + Sync {
    /// The state's unique name within its machine.
    fn name(&self) -> &str;

    /// Hook invoked when the machine enters this state.
    ///
    /// Default implementation does nothing.
    fn on_enter(&self, _context: &mut C) {}

    /// Hook invoked when the machine leaves this state.
    ///
    /// Default implementation does nothing.
    fn on_exit(&self, _context: &mut C) {}
}

type StateHook<C> = Box<dyn Fn(&mut C) + Send + Sync>;

/// A `State` assembled from closures.
///
/// Scripted states carry their name as data, so whole machines can be
/// configured at runtime without defining a type per state.
///
/// # Example
///
/// ```rust
/// use turnstile::core::{ScriptedState, State};
///
/// let state = ScriptedState::new("armed")
///     .with_enter(|count: &mut u32| *count += 1);
///
/// let mut count = 0;
/// state.on_enter(&mut count);
/// assert_eq!(state.name(), "armed");
/// assert_eq!(count, 1);
/// ```
pub struct ScriptedState<C> {
    name: String,
    enter: Option<StateHook<C>>,
    exit: Option<StateHook<C>>,
}

impl<C> ScriptedState<C> {
    /// Create a state with the given name and no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enter: None,
            exit: None,
        }
    }

    /// Attach an entry hook, replacing any previous one.
    pub fn with_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    /// Attach an exit hook, replacing any previous one.
    pub fn with_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(hook));
        self
    }
}

impl<C> State<C> for ScriptedState<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_enter(&self, context: &mut C) {
        if let Some(hook) = &self.enter {
            hook(context);
        }
    }

    fn on_exit(&self, context: &mut C) {
        if let Some(hook) = &self.exit {
            hook(context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl State<u32> for Idle {
        fn name(&self) -> &str {
            "idle"
        }
    }

    #[test]
    fn scripted_state_reports_name() {
        let state: ScriptedState<()> = ScriptedState::new("draft");
        assert_eq!(state.name(), "draft");
    }

    #[test]
    fn trait_hooks_default_to_noops() {
        let state = Idle;
        let mut context = 7;

        state.on_enter(&mut context);
        state.on_exit(&mut context);

        assert_eq!(context, 7);
    }

    #[test]
    fn scripted_state_without_hooks_leaves_context_alone() {
        let state: ScriptedState<Vec<&str>> = ScriptedState::new("review");
        let mut context = vec!["seed"];

        state.on_enter(&mut context);
        state.on_exit(&mut context);

        assert_eq!(context, vec!["seed"]);
    }

    #[test]
    fn enter_hook_mutates_context() {
        let state = ScriptedState::new("open")
            .with_enter(|log: &mut Vec<String>| log.push("entered".to_string()));

        let mut log = Vec::new();
        state.on_enter(&mut log);

        assert_eq!(log, vec!["entered"]);
    }

    #[test]
    fn exit_hook_mutates_context() {
        let state = ScriptedState::new("open")
            .with_exit(|log: &mut Vec<String>| log.push("left".to_string()));

        let mut log = Vec::new();
        state.on_exit(&mut log);

        assert_eq!(log, vec!["left"]);
    }

    #[test]
    fn both_hooks_compose_on_one_state() {
        let state = ScriptedState::new("gate")
            .with_enter(|log: &mut Vec<&str>| log.push("in"))
            .with_exit(|log: &mut Vec<&str>| log.push("out"));

        let mut log = Vec::new();
        state.on_enter(&mut log);
        state.on_exit(&mut log);
        state.on_enter(&mut log);

        assert_eq!(log, vec!["in", "out", "in"]);
    }
}
