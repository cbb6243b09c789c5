//! Declarative machine tables.
//!
//! A [`MachineDefinition`] is the serializable shape of a machine: states,
//! the events each accepts and where they lead. Guards and entry effects are
//! code, so a definition refers to them by name and [`MachineDefinition::bind`]
//! resolves those names against a [`Bindings`] registry.
//!
//! ```rust
//! use statebox::config::{Bindings, MachineDefinition};
//!
//! #[derive(Debug, Default)]
//! struct Lock {
//!     has_key: bool,
//! }
//!
//! let definition = MachineDefinition::from_json(r#"{
//!     "initial": "locked",
//!     "states": {
//!         "locked": { "on": { "UNLOCK": { "target": "unlocked", "guard": "has_key" } } },
//!         "unlocked": { "on": { "LOCK": "locked" } }
//!     }
//! }"#).unwrap();
//!
//! let bindings = Bindings::new().guard("has_key", |lock: &Lock| lock.has_key);
//! let config = definition.bind(&bindings).unwrap();
//!
//! assert_eq!(config.initial(), "locked");
//! ```

use super::error::{ConfigError, ConfigErrors};
use super::{MachineConfig, StateNode};
use crate::core::{EventId, Guard, StateId, Transition};
use crate::effects::{CleanupEffect, EntryEffect};
use crate::host::Sender;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Serializable description of a machine.
///
/// Unknown keys and repeated state or event names are rejected while
/// parsing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDefinition {
    pub initial: StateId,
    #[serde(deserialize_with = "unique_states")]
    pub states: IndexMap<StateId, StateDefinition>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,
}

/// Serializable description of one state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDefinition {
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "unique_events"
    )]
    pub on: IndexMap<EventId, TransitionDefinition>,

    /// Name of the entry effect to bind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

/// Either a bare target or a `{ target, guard }` record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum TransitionDefinition {
    Target(StateId),
    Guarded {
        target: StateId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        guard: Option<String>,
    },
}

impl MachineDefinition {
    /// Parse a definition from JSON.
    ///
    /// Fails on malformed JSON, on keys the format does not know (a
    /// misspelled `"guard"` included) and on state or event names that
    /// appear twice in the same table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Resolve guard and effect names and build a validated configuration.
    ///
    /// Unbound names are reported alongside the structural problems
    /// `MachineBuilder::build` finds.
    pub fn bind<C>(&self, bindings: &Bindings<C>) -> Result<MachineConfig<C>, ConfigErrors> {
        let mut builder = MachineConfig::builder()
            .initial(self.initial.clone())
            .debug(self.debug);

        for (state, definition) in &self.states {
            let mut node = StateNode::new();

            for (event, transition) in &definition.on {
                node = match transition {
                    TransitionDefinition::Target(target) => node.on(event.clone(), target.clone()),
                    TransitionDefinition::Guarded { target, guard: None } => node.on_transition(
                        event.clone(),
                        Transition::Guarded {
                            target: target.clone(),
                            guard: None,
                        },
                    ),
                    TransitionDefinition::Guarded {
                        target,
                        guard: Some(name),
                    } => match bindings.guards.get(name) {
                        Some(guard) => node.on_transition(
                            event.clone(),
                            Transition::Guarded {
                                target: target.clone(),
                                guard: Some(guard.clone()),
                            },
                        ),
                        None => {
                            builder = builder.reject(ConfigError::UnboundGuard {
                                state: state.clone(),
                                event: event.clone(),
                                guard: name.clone(),
                            });
                            // Kept unguarded so its target is still checked.
                            node.on(event.clone(), target.clone())
                        }
                    },
                };
            }

            if let Some(name) = &definition.effect {
                node = match bindings.effects.get(name) {
                    Some(effect) => node.entry_effect(effect.clone()),
                    None => {
                        builder = builder.reject(ConfigError::UnboundEffect {
                            state: state.clone(),
                            effect: name.clone(),
                        });
                        node
                    }
                };
            }

            builder = builder.state(state.clone(), node);
        }

        builder.build()
    }
}

/// Named guards and entry effects a [`MachineDefinition`] can refer to.
pub struct Bindings<C> {
    guards: HashMap<String, Guard<C>>,
    effects: HashMap<String, EntryEffect<C>>,
}

impl<C> Bindings<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            effects: HashMap::new(),
        }
    }

    /// Register `predicate` as the guard called `name`, replacing any
    /// earlier guard of that name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statebox::config::{Bindings, MachineDefinition};
    ///
    /// let definition = MachineDefinition::from_json(r#"{
    ///     "initial": "idle",
    ///     "states": {
    ///         "idle": { "on": { "GO": { "target": "busy", "guard": "positive" } } },
    ///         "busy": {}
    ///     }
    /// }"#).unwrap();
    ///
    /// let bindings = Bindings::new().guard("positive", |n: &i32| *n > 0);
    /// assert!(definition.bind(&bindings).is_ok());
    /// ```
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Register `effect` as the entry effect called `name`.
    pub fn effect<F>(mut self, name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&Sender<C>) -> Option<CleanupEffect<C>> + 'static,
    {
        self.effects.insert(name.into(), EntryEffect::new(effect));
        self
    }
}

impl<C> Default for Bindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_states<'de, D>(
    deserializer: D,
) -> Result<IndexMap<StateId, StateDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(UniqueKeys::new(|state| {
        ConfigError::DuplicateState(state).to_string()
    }))
}

fn unique_events<'de, D>(
    deserializer: D,
) -> Result<IndexMap<EventId, TransitionDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(UniqueKeys::new(|event| {
        format!("Event '{event}' is declared more than once in one state")
    }))
}

/// Map visitor that refuses repeated keys instead of keeping the last one.
struct UniqueKeys<V> {
    duplicate: fn(String) -> String,
    marker: PhantomData<V>,
}

impl<V> UniqueKeys<V> {
    fn new(duplicate: fn(String) -> String) -> Self {
        Self {
            duplicate,
            marker: PhantomData,
        }
    }
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
    type Value = IndexMap<String, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique keys")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            if entries.contains_key(&key) {
                return Err(de::Error::custom((self.duplicate)(key)));
            }
            entries.insert(key, value);
        }
        Ok(entries)
    }
}
