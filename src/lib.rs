//! Statebox: a small, embeddable finite state machine engine
//!
//! Statebox follows a "pure core, imperative shell" split. A declarative
//! configuration names the states, the events each state accepts, optional
//! guards over a caller-defined context, and optional entry effects. The pure
//! core resolves events against that table; a single stateful host keeps the
//! live snapshot and runs entry/cleanup effects whenever the state changes.
//!
//! # Core Concepts
//!
//! - **Configuration**: validated table of states and transitions
//! - **Guards**: pure predicates over context that gate transitions
//! - **Reducer**: pure function from snapshot and action to the next step
//! - **Effects**: entry effects with optional cleanup, run on state changes
//! - **Host**: one live instance that dispatches events to completion
//!
//! # Example
//!
//! ```rust
//! use statebox::{CleanupEffect, MachineConfig, MachineInstance, StateNode};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Lock {
//!     has_key: bool,
//! }
//!
//! let config = MachineConfig::builder()
//!     .initial("locked")
//!     .state(
//!         "locked",
//!         StateNode::new()
//!             .on_guarded("UNLOCK", "unlocked", |lock: &Lock| lock.has_key)
//!             .on("FIND_KEY", "searching"),
//!     )
//!     .state(
//!         "searching",
//!         StateNode::new().on("FOUND", "locked").effect(|tx| {
//!             tx.update_context(|_: &Lock| Lock { has_key: true });
//!             tx.send("FOUND");
//!             None
//!         }),
//!     )
//!     .state(
//!         "unlocked",
//!         StateNode::new().on("LOCK", "locked").effect(|_| {
//!             Some(CleanupEffect::new(|_| println!("locking up")))
//!         }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut door = MachineInstance::activate_default(config);
//!
//! door.send("UNLOCK");
//! assert_eq!(door.value(), "locked");
//!
//! door.send("FIND_KEY");
//! assert_eq!(door.value(), "locked");
//! assert!(door.context().has_key);
//!
//! door.send("UNLOCK");
//! assert_eq!(door.value(), "unlocked");
//! assert_eq!(door.next_events(), ["LOCK"]);
//! ```

pub mod config;
pub mod core;
pub mod effects;
pub mod host;

// Re-export commonly used types
pub use crate::config::{ConfigError, ConfigErrors, MachineConfig, MachineDefinition, StateNode};
pub use crate::core::{Action, Guard, MachineSnapshot, Transition};
pub use crate::effects::{CleanupEffect, EntryEffect};
pub use crate::host::{MachineInstance, Outcome, Sender};
