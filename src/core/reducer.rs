//! The machine reducer.
//!
//! `reduce` is a pure function from (configuration, snapshot, action) to the
//! next step. It never runs effects; the host decides what to do with the
//! step it gets back.

use super::context::{apply_update, ContextUpdate};
use super::snapshot::MachineSnapshot;
use super::transition::{resolve, Resolution};
use super::EventId;
use crate::config::MachineConfig;
use std::fmt;

/// Something submitted to a machine.
///
/// Context updates travel as their own variant, so no event name can ever
/// be mistaken for one.
pub enum Action<C> {
    Event(EventId),
    UpdateContext(ContextUpdate<C>),
}

impl<C> Action<C> {
    /// An event to resolve against the current state.
    pub fn event(event: impl Into<EventId>) -> Self {
        Action::Event(event.into())
    }

    /// A directive replacing the context with `updater`'s result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statebox::core::Action;
    ///
    /// let action = Action::update_context(|count: &u32| count + 1);
    /// assert!(matches!(action, Action::UpdateContext(_)));
    /// ```
    pub fn update_context<F>(updater: F) -> Self
    where
        F: FnOnce(&C) -> C + 'static,
    {
        Action::UpdateContext(ContextUpdate::new(updater))
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Action::UpdateContext(_) => f.write_str("UpdateContext(..)"),
        }
    }
}

/// Why an event left the machine untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoChange {
    /// The current state declares no transition for the event.
    Unhandled,
    /// The transition's guard rejected the context.
    Denied,
}

/// Result of reducing one action.
pub enum Step<C> {
    /// Nothing changed; the caller keeps its existing snapshot.
    Unchanged(NoChange),

    /// The event resolved to a target. The value may equal the previous one.
    Transitioned(MachineSnapshot<C>),

    /// The context was replaced; value and next events are untouched.
    ContextUpdated(MachineSnapshot<C>),
}

impl<C> Step<C> {
    /// The snapshot to commit, if any.
    pub fn snapshot(&self) -> Option<&MachineSnapshot<C>> {
        match self {
            Step::Unchanged(_) => None,
            Step::Transitioned(snapshot) | Step::ContextUpdated(snapshot) => Some(snapshot),
        }
    }

    /// Whether the step changed the state value, and so runs effects.
    pub fn is_transition(&self) -> bool {
        matches!(self, Step::Transitioned(_))
    }
}

impl<C: fmt::Debug> fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Unchanged(reason) => f.debug_tuple("Unchanged").field(reason).finish(),
            Step::Transitioned(s) => f.debug_tuple("Transitioned").field(s).finish(),
            Step::ContextUpdated(s) => f.debug_tuple("ContextUpdated").field(s).finish(),
        }
    }
}

/// Reduce `action` against `snapshot`.
pub fn reduce<C>(
    config: &MachineConfig<C>,
    snapshot: &MachineSnapshot<C>,
    action: Action<C>,
) -> Step<C> {
    match action {
        Action::UpdateContext(update) => {
            Step::ContextUpdated(snapshot.with_context(apply_update(snapshot.context(), update)))
        }
        Action::Event(event) => {
            match resolve(config, snapshot.value(), &event, snapshot.context()) {
                Resolution::Target(next) => Step::Transitioned(snapshot.enter(config, next)),
                Resolution::Unhandled => Step::Unchanged(NoChange::Unhandled),
                Resolution::Denied => Step::Unchanged(NoChange::Denied),
            }
        }
    }
}
