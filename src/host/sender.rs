//! Handle passed to entry and cleanup effects.

use super::shared::Shared;
use super::{InstanceId, Outcome};
use crate::core::{Action, EventId, MachineSnapshot};
use std::fmt;
use std::rc::Weak;
use tracing::trace;

/// Dispatch and context-update handle given to effects.
///
/// A sender does not keep its machine alive. Once the instance is
/// deactivated or dropped, everything sent through it is ignored.
pub struct Sender<C> {
    shared: Weak<Shared<C>>,
}

impl<C> Sender<C> {
    pub(crate) fn new(shared: Weak<Shared<C>>) -> Self {
        Self { shared }
    }

    /// A sender attached to no machine.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self { shared: Weak::new() }
    }
}

impl<C: fmt::Debug + 'static> Sender<C> {
    /// Dispatch an event. From inside an effect this queues the event; it
    /// is processed before the dispatch that ran the effect returns.
    pub fn send(&self, event: impl Into<EventId>) -> Outcome {
        self.submit(Action::event(event))
    }

    /// Replace the context with `updater`'s result. Never changes the state
    /// value and never runs effects.
    pub fn update_context<F>(&self, updater: F) -> Outcome
    where
        F: FnOnce(&C) -> C + 'static,
    {
        self.submit(Action::update_context(updater))
    }

    /// The machine's committed snapshot, if it is still alive.
    pub fn snapshot(&self) -> Option<MachineSnapshot<C>> {
        self.shared
            .upgrade()
            .filter(|shared| shared.is_active())
            .map(|shared| {
                let snapshot = shared.snapshot.borrow().clone();
                snapshot
            })
    }

    pub fn instance_id(&self) -> Option<InstanceId> {
        self.shared.upgrade().map(|shared| shared.id)
    }

    pub fn is_active(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.is_active())
    }

    fn submit(&self, action: Action<C>) -> Outcome {
        match self.shared.upgrade() {
            Some(shared) => shared.submit(action),
            None => {
                trace!(?action, "machine dropped, ignoring action");
                Outcome::Ignored
            }
        }
    }
}

impl<C> Clone for Sender<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<C> fmt::Debug for Sender<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}
