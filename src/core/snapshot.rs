//! Machine snapshots.

use super::{EventId, StateId};
use crate::config::MachineConfig;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// The observable state of one machine instance.
///
/// `next_events` is derived from the configuration: it always lists exactly
/// the events declared by the current state, in declaration order, and is
/// only recomputed when `value` changes.
#[derive(Serialize)]
#[serde(bound(serialize = "C: Serialize"))]
pub struct MachineSnapshot<C> {
    value: StateId,
    context: Rc<C>,
    next_events: Vec<EventId>,
}

impl<C> MachineSnapshot<C> {
    /// Snapshot for a freshly activated machine.
    pub fn initial(config: &MachineConfig<C>, context: C) -> Self {
        let value = config.initial().to_string();
        Self {
            next_events: config.events_for(&value),
            value,
            context: Rc::new(context),
        }
    }

    /// The current state id.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shared handle to the context. Transitions keep the same allocation;
    /// only a context update replaces it.
    pub fn context_rc(&self) -> &Rc<C> {
        &self.context
    }

    /// Events the current state accepts.
    pub fn next_events(&self) -> &[EventId] {
        &self.next_events
    }

    /// Whether `event` is currently accepted (guards aside).
    pub fn can(&self, event: &str) -> bool {
        self.next_events.iter().any(|e| e == event)
    }

    /// Move to `value`, carrying the context forward.
    pub(crate) fn enter(&self, config: &MachineConfig<C>, value: StateId) -> Self {
        Self {
            next_events: config.events_for(&value),
            value,
            context: Rc::clone(&self.context),
        }
    }

    /// Replace the context, leaving value and next events alone.
    pub(crate) fn with_context(&self, context: C) -> Self {
        Self {
            value: self.value.clone(),
            context: Rc::new(context),
            next_events: self.next_events.clone(),
        }
    }
}

impl<C> Clone for MachineSnapshot<C> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            context: Rc::clone(&self.context),
            next_events: self.next_events.clone(),
        }
    }
}

impl<C: PartialEq> PartialEq for MachineSnapshot<C> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.next_events == other.next_events
            && self.context == other.context
    }
}

impl<C: fmt::Debug> fmt::Debug for MachineSnapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineSnapshot")
            .field("value", &self.value)
            .field("context", &self.context)
            .field("next_events", &self.next_events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateNode;
    use serde::Serialize;

    #[derive(Debug, Default, PartialEq, Serialize)]
    struct Ctx {
        visits: u32,
    }

    fn config() -> MachineConfig<Ctx> {
        MachineConfig::builder()
            .initial("inactive")
            .state(
                "inactive",
                StateNode::new().on("ACTIVATE", "active").on("TOGGLE", "active"),
            )
            .state("active", StateNode::new().on("DEACTIVATE", "inactive"))
            .state("empty", StateNode::new())
            .build()
            .unwrap()
    }

    #[test]
    fn initial_snapshot_derives_next_events() {
        let snapshot = MachineSnapshot::initial(&config(), Ctx::default());

        assert_eq!(snapshot.value(), "inactive");
        assert_eq!(snapshot.next_events(), ["ACTIVATE", "TOGGLE"]);
        assert!(snapshot.can("TOGGLE"));
        assert!(!snapshot.can("DEACTIVATE"));
    }

    #[test]
    fn enter_recomputes_next_events_and_keeps_context() {
        let config = config();
        let snapshot = MachineSnapshot::initial(&config, Ctx { visits: 2 });
        let active = snapshot.enter(&config, "active".to_string());

        assert_eq!(active.value(), "active");
        assert_eq!(active.next_events(), ["DEACTIVATE"]);
        assert!(Rc::ptr_eq(snapshot.context_rc(), active.context_rc()));

        let empty = active.enter(&config, "empty".to_string());
        assert!(empty.next_events().is_empty());
    }

    #[test]
    fn with_context_leaves_value_alone() {
        let config = config();
        let snapshot = MachineSnapshot::initial(&config, Ctx::default());
        let updated = snapshot.with_context(Ctx { visits: 1 });

        assert_eq!(updated.value(), snapshot.value());
        assert_eq!(updated.next_events(), snapshot.next_events());
        assert_eq!(updated.context().visits, 1);
        assert_ne!(updated, snapshot);
    }

    #[test]
    fn snapshot_serializes() {
        let snapshot = MachineSnapshot::initial(&config(), Ctx { visits: 7 });
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "value": "inactive",
                "context": { "visits": 7 },
                "next_events": ["ACTIVATE", "TOGGLE"],
            })
        );
    }
}
