//! Transitions and the transition resolver.
//!
//! Resolution is pure: it looks up the transition registered for an event in
//! the current state, applies its guard against the context, and reports
//! either a target state or why nothing happens.

use super::guard::Guard;
use super::StateId;
use crate::config::MachineConfig;
use std::fmt;

/// Where an event leads from the state that declares it.
pub enum Transition<C> {
    /// Unconditional transition to a target state.
    To(StateId),

    /// Transition that only proceeds while `guard` holds.
    ///
    /// A missing guard behaves exactly like [`Transition::To`].
    Guarded {
        target: StateId,
        guard: Option<Guard<C>>,
    },
}

impl<C> Transition<C> {
    /// Create a guarded transition from a predicate over the context.
    pub fn guarded<F>(target: impl Into<StateId>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Transition::Guarded {
            target: target.into(),
            guard: Some(Guard::new(predicate)),
        }
    }

    /// The state this transition points at.
    pub fn target(&self) -> &str {
        match self {
            Transition::To(target) => target,
            Transition::Guarded { target, .. } => target,
        }
    }

    /// The guard attached to this transition, if any.
    pub fn guard(&self) -> Option<&Guard<C>> {
        match self {
            Transition::To(_) => None,
            Transition::Guarded { guard, .. } => guard.as_ref(),
        }
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        match self {
            Transition::To(target) => Transition::To(target.clone()),
            Transition::Guarded { target, guard } => Transition::Guarded {
                target: target.clone(),
                guard: guard.clone(),
            },
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::To(target) => f.debug_tuple("To").field(target).finish(),
            Transition::Guarded { target, guard } => f
                .debug_struct("Guarded")
                .field("target", target)
                .field("guarded", &guard.is_some())
                .finish(),
        }
    }
}

impl<C> From<&str> for Transition<C> {
    fn from(target: &str) -> Self {
        Transition::To(target.to_string())
    }
}

impl<C> From<String> for Transition<C> {
    fn from(target: String) -> Self {
        Transition::To(target)
    }
}

/// Result of resolving an event against the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The event resolves to this state. It may equal the current state,
    /// which still counts as a transition.
    Target(StateId),

    /// The current state declares no transition for the event.
    Unhandled,

    /// A transition exists but its guard rejected the current context.
    Denied,
}

impl Resolution {
    /// Whether this resolution leaves the machine untouched.
    pub fn is_no_change(&self) -> bool {
        !matches!(self, Resolution::Target(_))
    }
}

/// Resolve `event` from the state `current` under `context`.
///
/// Unknown events are not errors; they resolve to [`Resolution::Unhandled`]
/// so callers can dispatch speculatively.
pub fn resolve<C>(
    config: &MachineConfig<C>,
    current: &str,
    event: &str,
    context: &C,
) -> Resolution {
    let Some(transition) = config.state(current).and_then(|node| node.transition(event)) else {
        return Resolution::Unhandled;
    };

    match transition {
        Transition::To(target) => Resolution::Target(target.clone()),
        Transition::Guarded { target, guard } => {
            if guard.as_ref().is_none_or(|g| g.check(context)) {
                Resolution::Target(target.clone())
            } else {
                Resolution::Denied
            }
        }
    }
}
