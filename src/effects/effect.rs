//! Entry and cleanup effects.

use crate::host::Sender;
use std::fmt;
use std::rc::Rc;

/// Effect run each time the machine enters a state, including activation.
///
/// It receives a [`Sender`] for dispatching events and updating context and
/// may hand back a [`CleanupEffect`] to run when the state is left.
pub struct EntryEffect<C> {
    effect: Rc<dyn Fn(&Sender<C>) -> Option<CleanupEffect<C>>>,
}

impl<C> EntryEffect<C> {
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn(&Sender<C>) -> Option<CleanupEffect<C>> + 'static,
    {
        Self {
            effect: Rc::new(effect),
        }
    }

    pub fn run(&self, sender: &Sender<C>) -> Option<CleanupEffect<C>> {
        (self.effect)(sender)
    }
}

impl<C> Clone for EntryEffect<C> {
    fn clone(&self) -> Self {
        Self {
            effect: Rc::clone(&self.effect),
        }
    }
}

impl<C> fmt::Debug for EntryEffect<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryEffect(..)")
    }
}

/// Cleanup returned by an entry effect. Runs at most once.
pub struct CleanupEffect<C> {
    cleanup: Box<dyn FnOnce(&Sender<C>)>,
}

impl<C> CleanupEffect<C> {
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce(&Sender<C>) + 'static,
    {
        Self {
            cleanup: Box::new(cleanup),
        }
    }

    pub fn run(self, sender: &Sender<C>) {
        (self.cleanup)(sender)
    }
}

impl<C> fmt::Debug for CleanupEffect<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CleanupEffect(..)")
    }
}
