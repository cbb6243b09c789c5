//! Entry and cleanup effects.
//!
//! This module is the side-effecting half of the engine. Whenever the
//! committed state value changes, the coordinator runs the cleanup returned
//! by the previous state's entry effect and then the new state's entry
//! effect. Dispatches that change nothing, and context-only updates, never
//! reach it.

mod coordinator;
mod effect;

pub use coordinator::EffectCoordinator;
pub use effect::{CleanupEffect, EntryEffect};
