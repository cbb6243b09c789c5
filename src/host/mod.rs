//! The instance host: one live machine and its effects.
//!
//! [`MachineInstance`] owns the committed snapshot, feeds dispatched events
//! through the pure reducer and drives the [`EffectCoordinator`] whenever
//! the state value changes. Everything is synchronous: a call to
//! [`MachineInstance::send`] returns only after the reducer, the commit, the
//! effects and anything those effects dispatched have all run.
//!
//! [`EffectCoordinator`]: crate::effects::EffectCoordinator

mod sender;
mod shared;
mod trace;

pub use sender::Sender;

use crate::config::MachineConfig;
use crate::core::{Action, EventId, MachineSnapshot, StateId};
use serde::{Deserialize, Serialize};
use shared::Shared;
use std::cell::Ref;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identifies one machine instance in trace output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What happened to a submitted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The event resolved to `to`; exit and entry effects ran.
    Transitioned { from: StateId, to: StateId },

    /// The context was replaced.
    ContextUpdated,

    /// The current state does not accept the event.
    Unhandled,

    /// The transition's guard rejected the context.
    Denied,

    /// Submitted while the machine was busy; it runs before the outer
    /// dispatch returns.
    Queued,

    /// The machine is no longer active.
    Ignored,
}

impl Outcome {
    pub fn is_transition(&self) -> bool {
        matches!(self, Outcome::Transitioned { .. })
    }
}

/// One live state machine.
///
/// # Example
///
/// ```rust
/// use statebox::config::{MachineConfig, StateNode};
/// use statebox::host::{MachineInstance, Outcome};
///
/// let config = MachineConfig::builder()
///     .initial("inactive")
///     .state("inactive", StateNode::new().on("ACTIVATE", "active"))
///     .state("active", StateNode::new().on("DEACTIVATE", "inactive"))
///     .build()
///     .unwrap();
///
/// let mut machine = MachineInstance::activate(config, ());
/// assert_eq!(machine.value(), "inactive");
///
/// let outcome = machine.send("ACTIVATE");
/// assert!(outcome.is_transition());
/// assert_eq!(machine.next_events(), ["DEACTIVATE"]);
///
/// assert_eq!(machine.send("ACTIVATE"), Outcome::Unhandled);
/// machine.deactivate();
/// ```
pub struct MachineInstance<C: fmt::Debug + 'static> {
    shared: Rc<Shared<C>>,
}

impl<C: fmt::Debug + 'static> MachineInstance<C> {
    /// Activate a machine in its initial state and run that state's entry
    /// effect, along with anything the effect dispatches.
    pub fn activate(config: MachineConfig<C>, context: C) -> Self {
        let shared = Shared::new(config, context);
        shared.start();
        Self { shared }
    }

    /// Activate with the context type's default value.
    pub fn activate_default(config: MachineConfig<C>) -> Self
    where
        C: Default,
    {
        Self::activate(config, C::default())
    }

    pub fn id(&self) -> InstanceId {
        self.shared.id
    }

    pub fn config(&self) -> &MachineConfig<C> {
        &self.shared.config
    }

    /// Dispatch an event and process it to completion.
    ///
    /// Events the current state does not accept, and transitions whose guard
    /// fails, are silent no-ops reported through the returned [`Outcome`].
    /// A panic in an effect propagates out of this call.
    pub fn send(&mut self, event: impl Into<EventId>) -> Outcome {
        self.shared.submit(Action::event(event))
    }

    /// Read-only view of the committed snapshot.
    pub fn snapshot(&self) -> Ref<'_, MachineSnapshot<C>> {
        self.shared.snapshot.borrow()
    }

    pub fn value(&self) -> StateId {
        self.snapshot().value().to_string()
    }

    pub fn context(&self) -> Rc<C> {
        Rc::clone(self.snapshot().context_rc())
    }

    pub fn next_events(&self) -> Vec<EventId> {
        self.snapshot().next_events().to_vec()
    }

    pub fn can(&self, event: &str) -> bool {
        self.snapshot().can(event)
    }

    /// Tear the machine down, running the current state's pending cleanup.
    ///
    /// Dropping the instance does the same; this makes the point explicit.
    pub fn deactivate(self) {
        self.shared.teardown();
    }
}

impl<C: fmt::Debug + 'static> Drop for MachineInstance<C> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl<C: fmt::Debug + 'static> fmt::Debug for MachineInstance<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineInstance")
            .field("id", &self.shared.id)
            .field("snapshot", &*self.shared.snapshot.borrow())
            .finish()
    }
}
