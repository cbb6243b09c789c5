//! Debug reports for dispatches and context updates.
//!
//! Emitted only when the configuration's `debug` flag is set. Records go to
//! whatever `tracing` subscriber is installed; with none installed they cost
//! nothing and change nothing.

use super::InstanceId;
use crate::core::{MachineSnapshot, NoChange, Step};
use std::fmt;
use tracing::debug;

pub(crate) fn event<C: fmt::Debug>(
    instance: InstanceId,
    event: &str,
    before: &MachineSnapshot<C>,
    step: &Step<C>,
) {
    let after = step.snapshot().unwrap_or(before);
    let to = match step {
        Step::Unchanged(NoChange::Unhandled) => "no-op",
        Step::Unchanged(NoChange::Denied) => "denied",
        Step::Transitioned(next) | Step::ContextUpdated(next) => next.value(),
    };

    debug!(
        %instance,
        from = before.value(),
        event,
        to,
        before = ?before.context(),
        after = ?after.context(),
        "dispatch"
    );
}

pub(crate) fn context_update<C: fmt::Debug>(
    instance: InstanceId,
    before: &MachineSnapshot<C>,
    step: &Step<C>,
) {
    let after = step.snapshot().unwrap_or(before);

    debug!(
        %instance,
        state = before.value(),
        before = ?before.context(),
        after = ?after.context(),
        "context updated"
    );
}
