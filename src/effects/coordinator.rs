//! Entry/exit effect bookkeeping across state changes.

use super::effect::{CleanupEffect, EntryEffect};
use crate::core::StateId;
use crate::host::Sender;
use tracing::trace;

/// Holds the cleanup of the state the machine currently occupies.
///
/// There is at most one pending cleanup per instance. Entering a state
/// always runs the pending cleanup to completion before the new entry
/// effect starts.
pub struct EffectCoordinator<C> {
    pending: Option<Pending<C>>,
}

struct Pending<C> {
    state: StateId,
    cleanup: CleanupEffect<C>,
}

impl<C> EffectCoordinator<C> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Run the exit pass for the previous state, then `state`'s entry effect.
    pub fn enter(&mut self, state: &str, effect: Option<&EntryEffect<C>>, sender: &Sender<C>) {
        self.exit(sender);

        let Some(effect) = effect else {
            return;
        };
        trace!(state, "running entry effect");
        if let Some(cleanup) = effect.run(sender) {
            self.pending = Some(Pending {
                state: state.to_string(),
                cleanup,
            });
        }
    }

    /// Run and discard the pending cleanup, if any. Returns whether one ran.
    pub fn exit(&mut self, sender: &Sender<C>) -> bool {
        // Taken before running so a panicking cleanup can never run twice.
        let Some(Pending { state, cleanup }) = self.pending.take() else {
            return false;
        };
        trace!(state = %state, "running cleanup effect");
        cleanup.run(sender);
        true
    }

    /// State whose cleanup is waiting to run.
    pub fn pending_state(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.state.as_str())
    }
}

impl<C> Default for EffectCoordinator<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Ctx;

    type Log = Rc<RefCell<Vec<String>>>;

    fn tracked(log: &Log, name: &'static str) -> EntryEffect<Ctx> {
        let log = Rc::clone(log);
        EntryEffect::new(move |_| {
            log.borrow_mut().push(format!("enter {name}"));
            let log = Rc::clone(&log);
            Some(CleanupEffect::new(move |_| {
                log.borrow_mut().push(format!("exit {name}"));
            }))
        })
    }

    #[test]
    fn cleanup_runs_before_next_entry() {
        let log = Log::default();
        let sender = Sender::detached();
        let mut effects = EffectCoordinator::new();

        effects.enter("a", Some(&tracked(&log, "a")), &sender);
        effects.enter("b", Some(&tracked(&log, "b")), &sender);
        effects.enter("c", Some(&tracked(&log, "c")), &sender);

        assert_eq!(
            *log.borrow(),
            ["enter a", "exit a", "enter b", "exit b", "enter c"]
        );
        assert_eq!(effects.pending_state(), Some("c"));
    }

    #[test]
    fn state_without_effect_still_runs_previous_cleanup() {
        let log = Log::default();
        let sender = Sender::detached();
        let mut effects = EffectCoordinator::new();

        effects.enter("a", Some(&tracked(&log, "a")), &sender);
        effects.enter("plain", None, &sender);

        assert_eq!(*log.borrow(), ["enter a", "exit a"]);
        assert_eq!(effects.pending_state(), None);
    }

    #[test]
    fn exit_runs_cleanup_exactly_once() {
        let log = Log::default();
        let sender = Sender::detached();
        let mut effects = EffectCoordinator::new();

        effects.enter("a", Some(&tracked(&log, "a")), &sender);

        assert!(effects.exit(&sender));
        assert!(!effects.exit(&sender));
        assert_eq!(*log.borrow(), ["enter a", "exit a"]);
    }

    #[test]
    fn entry_without_cleanup_leaves_slot_empty() {
        let sender = Sender::detached();
        let mut effects: EffectCoordinator<Ctx> = EffectCoordinator::new();

        effects.enter("a", Some(&EntryEffect::new(|_| None)), &sender);

        assert_eq!(effects.pending_state(), None);
        assert!(!effects.exit(&sender));
    }
}
