//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the machine context. They decide
//! whether a transition may proceed at the moment an event is dispatched.

use std::fmt;
use std::rc::Rc;

/// Pure predicate that decides whether a guarded transition may proceed.
///
/// Guards read the context as it is at dispatch time. They must not
/// dispatch events or update context themselves; doing so is not prevented
/// but the resulting order of operations is unspecified.
///
/// # Example
///
/// ```rust
/// use statebox::core::Guard;
///
/// struct Lock {
///     has_key: bool,
/// }
///
/// let has_key = Guard::new(|lock: &Lock| lock.has_key);
///
/// assert!(has_key.check(&Lock { has_key: true }));
/// assert!(!has_key.check(&Lock { has_key: false }));
/// ```
pub struct Guard<C> {
    predicate: Rc<dyn Fn(&C) -> bool>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Check if the guard allows a transition under this context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        count: u32,
        enabled: bool,
    }

    #[test]
    fn guard_reads_context() {
        let guard = Guard::new(|c: &Counter| c.enabled);

        assert!(guard.check(&Counter {
            count: 0,
            enabled: true
        }));
        assert!(!guard.check(&Counter::default()));
    }

    #[test]
    fn guard_is_deterministic() {
        let context = Counter {
            count: 3,
            enabled: true,
        };
        let guard = Guard::new(|c: &Counter| c.count > 2);

        assert_eq!(guard.check(&context), guard.check(&context));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::new(|c: &Counter| c.count % 2 == 0);
        let cloned = guard.clone();

        let even = Counter {
            count: 4,
            enabled: false,
        };
        let odd = Counter {
            count: 5,
            enabled: false,
        };

        assert_eq!(guard.check(&even), cloned.check(&even));
        assert_eq!(guard.check(&odd), cloned.check(&odd));
        assert!(!cloned.check(&odd));
    }
}
