//! Guard predicates that veto transitions.
//!
//! Guards are boolean functions over the machine context and the current
//! event payload. A transition with a guard only fires when the guard
//! returns `true`.

/// Boxed error type carried by fallible guards and actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type GuardFn<C, E> = Box<dyn Fn(&C, Option<&E>) -> Result<bool, BoxError> + Send + Sync>;

/// Predicate that decides whether a transition may fire.
///
/// Guards read the context and the event payload; they never mutate
/// either. Evaluation may fail, and the caller decides how a failed
/// evaluation is interpreted.
///
/// # Example
///
/// ```rust
/// use turnstile::core::Guard;
///
/// struct Review {
///     approvals: u32,
/// }
///
/// let enough_approvals: Guard<Review> =
///     Guard::new(|review: &Review, _| review.approvals >= 2);
///
/// let review = Review { approvals: 3 };
/// assert_eq!(enough_approvals.check(&review, None).unwrap(), true);
/// ```
pub struct Guard<C, E = ()> {
    predicate: GuardFn<C, E>,
}

impl<C, E> Guard<C, E> {
    /// Create a guard from a plain boolean predicate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnstile::core::Guard;
    ///
    /// let positive: Guard<i64> = Guard::new(|balance: &i64, _| *balance > 0);
    ///
    /// assert!(positive.check(&10, None).unwrap());
    /// assert!(!positive.check(&-3, None).unwrap());
    /// ```
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(move |context, event| Ok(predicate(context, event))),
        }
    }

    /// Create a guard from a predicate that can fail.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnstile::core::Guard;
    ///
    /// let parsed: Guard<String> = Guard::fallible(|raw: &String, _| {
    ///     let value: i32 = raw.parse()?;
    ///     Ok(value > 0)
    /// });
    ///
    /// assert!(parsed.check(&"5".to_string(), None).unwrap());
    /// assert!(parsed.check(&"five".to_string(), None).is_err());
    /// ```
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&C, Option<&E>) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the context and event payload.
    pub fn check(&self, context: &C, event: Option<&E>) -> Result<bool, BoxError> {
        (self.predicate)(context, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_allows_when_predicate_holds() {
        let guard: Guard<u32> = Guard::new(|count: &u32, _| *count >= 2);

        assert!(guard.check(&5, None).unwrap());
        assert!(!guard.check(&1, None).unwrap());
    }

    #[test]
    fn guard_reads_event_payload() {
        let guard: Guard<(), u32> = Guard::new(|_, amount| amount.is_some_and(|a| *a >= 100));

        assert!(guard.check(&(), Some(&150)).unwrap());
        assert!(!guard.check(&(), Some(&50)).unwrap());
        assert!(!guard.check(&(), None).unwrap());
    }

    #[test]
    fn fallible_guard_surfaces_error() {
        let guard: Guard<String> = Guard::fallible(|raw: &String, _| {
            let value: i32 = raw.parse()?;
            Ok(value > 0)
        });

        assert!(guard.check(&"12".to_string(), None).unwrap());
        assert!(guard.check(&"garbage".to_string(), None).is_err());
    }

    #[test]
    fn guard_is_deterministic() {
        let guard: Guard<u32> = Guard::new(|count: &u32, _| *count % 2 == 0);

        let first = guard.check(&4, None).unwrap();
        let second = guard.check(&4, None).unwrap();

        assert_eq!(first, second);
    }
}
