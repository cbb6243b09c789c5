//! Machine configuration.
//!
//! A [`MachineConfig`] is the immutable table a machine instance runs
//! against: the initial state plus a registry of [`StateNode`]s keyed by
//! state id. Configurations are only produced by [`MachineBuilder::build`]
//! (directly or through a [`MachineDefinition`]), which validates every
//! transition target up front, so a `MachineConfig` value is always
//! internally consistent.

pub mod builder;
pub mod definition;
pub mod error;

pub use builder::MachineBuilder;
pub use definition::{Bindings, MachineDefinition, StateDefinition, TransitionDefinition};
pub use error::{ConfigError, ConfigErrors};

use crate::core::{EventId, StateId, Transition};
use crate::effects::{CleanupEffect, EntryEffect};
use crate::host::Sender;
use indexmap::IndexMap;
use std::fmt;

/// One state of a machine: the events it accepts and its entry effect.
///
/// A node without transitions accepts no events. Events keep the order in
/// which they were declared.
pub struct StateNode<C> {
    on: IndexMap<EventId, Transition<C>>,
    effect: Option<EntryEffect<C>>,
}

impl<C> StateNode<C> {
    /// Create a terminal node with no entry effect.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statebox::StateNode;
    ///
    /// let node: StateNode<()> = StateNode::new().on("GO", "running");
    /// assert_eq!(node.events().collect::<Vec<_>>(), ["GO"]);
    /// ```
    pub fn new() -> Self {
        Self {
            on: IndexMap::new(),
            effect: None,
        }
    }

    /// Accept `event`, moving unconditionally to `target`.
    pub fn on(self, event: impl Into<EventId>, target: impl Into<StateId>) -> Self {
        self.on_transition(event, Transition::To(target.into()))
    }

    /// Accept `event`, moving to `target` only while `guard` holds.
    pub fn on_guarded<F>(
        self,
        event: impl Into<EventId>,
        target: impl Into<StateId>,
        guard: F,
    ) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.on_transition(event, Transition::guarded(target, guard))
    }

    /// Register a prepared transition. Declaring the same event twice keeps
    /// its original position and the later transition.
    pub fn on_transition(mut self, event: impl Into<EventId>, transition: Transition<C>) -> Self {
        self.on.insert(event.into(), transition);
        self
    }

    /// Set the effect run each time the machine enters this state.
    ///
    /// The effect may return a [`CleanupEffect`], run once when the machine
    /// leaves the state or is torn down.
    pub fn effect<F>(self, effect: F) -> Self
    where
        F: Fn(&Sender<C>) -> Option<CleanupEffect<C>> + 'static,
    {
        self.entry_effect(EntryEffect::new(effect))
    }

    /// Set an already wrapped entry effect, such as one shared between
    /// several states.
    pub fn entry_effect(mut self, effect: EntryEffect<C>) -> Self {
        self.effect = Some(effect);
        self
    }

    /// The transition registered for `event`, if any.
    pub fn transition(&self, event: &str) -> Option<&Transition<C>> {
        self.on.get(event)
    }

    /// Every transition with its event, in declaration order.
    pub fn transitions(&self) -> impl Iterator<Item = (&EventId, &Transition<C>)> {
        self.on.iter()
    }

    /// Accepted events, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = &EventId> {
        self.on.keys()
    }

    /// The entry effect, if one is set.
    pub fn entry(&self) -> Option<&EntryEffect<C>> {
        self.effect.as_ref()
    }

    /// A terminal node accepts no events.
    pub fn is_terminal(&self) -> bool {
        self.on.is_empty()
    }
}

impl<C> Default for StateNode<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StateNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("on", &self.on)
            .field("effect", &self.effect.is_some())
            .finish()
    }
}

/// Validated, immutable machine configuration.
pub struct MachineConfig<C> {
    pub(crate) initial: StateId,
    pub(crate) states: IndexMap<StateId, StateNode<C>>,
    pub(crate) debug: bool,
}

impl<C> MachineConfig<C> {
    /// Start building a configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statebox::{MachineConfig, StateNode};
    ///
    /// let config = MachineConfig::<()>::builder()
    ///     .initial("idle")
    ///     .state("idle", StateNode::new().on("START", "running"))
    ///     .state("running", StateNode::new())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.initial(), "idle");
    /// assert_eq!(config.events_for("idle"), ["START"]);
    /// ```
    pub fn builder() -> MachineBuilder<C> {
        MachineBuilder::new()
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// The node configured for `id`.
    pub fn state(&self, id: &str) -> Option<&StateNode<C>> {
        self.states.get(id)
    }

    /// State ids in declaration order.
    pub fn state_ids(&self) -> impl Iterator<Item = &StateId> {
        self.states.keys()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Whether dispatches should be reported to the tracing sink.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Events accepted in state `id`; empty for terminal or unknown states.
    pub fn events_for(&self, id: &str) -> Vec<EventId> {
        self.state(id)
            .map(|node| node.events().cloned().collect())
            .unwrap_or_default()
    }
}

impl<C> fmt::Debug for MachineConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineConfig")
            .field("initial", &self.initial)
            .field("states", &self.states)
            .field("debug", &self.debug)
            .finish()
    }
}
