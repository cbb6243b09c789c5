//! Context updates.
//!
//! A context update replaces the machine context wholesale. There is no merge
//! step: whatever the updater returns becomes the new context.

use std::fmt;

/// Caller-supplied transform from the current context to its replacement.
pub struct ContextUpdate<C> {
    updater: Box<dyn FnOnce(&C) -> C>,
}

impl<C> ContextUpdate<C> {
    /// Wrap an updater. It runs at most once, against the context current
    /// at the time the update is reduced.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statebox::core::ContextUpdate;
    ///
    /// let update = ContextUpdate::new(|count: &u32| count + 1);
    /// assert_eq!(update.apply(&41), 42);
    /// ```
    pub fn new<F>(updater: F) -> Self
    where
        F: FnOnce(&C) -> C + 'static,
    {
        Self {
            updater: Box::new(updater),
        }
    }

    /// Consume the update, producing the replacement context.
    pub fn apply(self, context: &C) -> C {
        (self.updater)(context)
    }
}

impl<C> fmt::Debug for ContextUpdate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContextUpdate(..)")
    }
}

/// Apply `update` to `context`, returning the new context.
pub fn apply_update<C>(context: &C, update: ContextUpdate<C>) -> C {
    update.apply(context)
}
