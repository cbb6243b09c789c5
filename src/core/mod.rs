//! Core state machine types and logic.
//!
//! This module contains the pure functional core of the engine:
//! - Guard predicates over context
//! - Transition resolution
//! - Context updates
//! - Snapshots and the machine reducer
//!
//! Nothing here runs effects. The [`host`](crate::host) module wraps this
//! core with the stateful shell that does.

mod context;
mod guard;
mod reducer;
mod snapshot;
mod transition;

pub use context::{apply_update, ContextUpdate};
pub use guard::Guard;
pub use reducer::{reduce, Action, NoChange, Step};
pub use snapshot::MachineSnapshot;
pub use transition::{resolve, Resolution, Transition};

/// Identifier of a configured state.
pub type StateId = String;

/// Identifier of an event a state may accept.
pub type EventId = String;
