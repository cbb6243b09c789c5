//! Instance state shared between a machine instance and its senders.

use super::sender::Sender;
use super::{InstanceId, Outcome};
use crate::config::{MachineConfig, StateNode};
use crate::core::{reduce, Action, MachineSnapshot, NoChange, Step};
use crate::effects::EffectCoordinator;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

pub(crate) struct Shared<C> {
    pub(crate) id: InstanceId,
    pub(crate) config: MachineConfig<C>,
    pub(crate) snapshot: RefCell<MachineSnapshot<C>>,
    effects: RefCell<EffectCoordinator<C>>,
    queue: RefCell<VecDeque<Action<C>>>,
    processing: Cell<bool>,
    active: Cell<bool>,
}

impl<C: fmt::Debug + 'static> Shared<C> {
    pub(crate) fn new(config: MachineConfig<C>, context: C) -> Rc<Self> {
        let snapshot = MachineSnapshot::initial(&config, context);
        Rc::new(Self {
            id: InstanceId::new(),
            config,
            snapshot: RefCell::new(snapshot),
            effects: RefCell::new(EffectCoordinator::new()),
            queue: RefCell::new(VecDeque::new()),
            processing: Cell::new(false),
            active: Cell::new(true),
        })
    }

    pub(crate) fn sender(self: &Rc<Self>) -> Sender<C> {
        Sender::new(Rc::downgrade(self))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Run the initial entry pass, then anything it dispatched.
    pub(crate) fn start(self: &Rc<Self>) {
        let _processing = Processing::begin(self);
        let initial = self.snapshot.borrow().value().to_string();
        trace!(instance = %self.id, initial = %initial, "activating machine");
        self.run_effects(&initial);
        self.drain();
    }

    /// Submit an action. Actions arriving while another is being processed
    /// are queued and handled, in order, before the outermost call returns.
    pub(crate) fn submit(self: &Rc<Self>, action: Action<C>) -> Outcome {
        if !self.active.get() {
            trace!(instance = %self.id, ?action, "machine deactivated, ignoring action");
            return Outcome::Ignored;
        }
        if self.processing.get() {
            trace!(instance = %self.id, ?action, "machine busy, queueing action");
            self.queue.borrow_mut().push_back(action);
            return Outcome::Queued;
        }

        let _processing = Processing::begin(self);
        let outcome = self.apply(action);
        self.drain();
        outcome
    }

    /// Final cleanup pass. Runs at most once per instance.
    pub(crate) fn teardown(self: &Rc<Self>) {
        if !self.active.replace(false) {
            return;
        }
        let _processing = Processing::begin(self);
        trace!(instance = %self.id, "deactivating machine");
        let sender = self.sender();
        self.effects.borrow_mut().exit(&sender);
    }

    fn drain(self: &Rc<Self>) {
        loop {
            // The queue must not stay borrowed while the action runs.
            let next = self.queue.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };
            self.apply(action);
        }
    }

    fn apply(self: &Rc<Self>, action: Action<C>) -> Outcome {
        let previous = self.snapshot.borrow().clone();
        let event = match &action {
            Action::Event(event) => Some(event.clone()),
            Action::UpdateContext(_) => None,
        };

        let step = reduce(&self.config, &previous, action);

        if self.config.debug() {
            match &event {
                Some(event) => super::trace::event(self.id, event, &previous, &step),
                None => super::trace::context_update(self.id, &previous, &step),
            }
        }

        match step {
            Step::Unchanged(NoChange::Unhandled) => Outcome::Unhandled,
            Step::Unchanged(NoChange::Denied) => Outcome::Denied,
            Step::ContextUpdated(next) => {
                *self.snapshot.borrow_mut() = next;
                Outcome::ContextUpdated
            }
            Step::Transitioned(next) => {
                let to = next.value().to_string();
                *self.snapshot.borrow_mut() = next;
                self.run_effects(&to);
                Outcome::Transitioned {
                    from: previous.value().to_string(),
                    to,
                }
            }
        }
    }

    fn run_effects(self: &Rc<Self>, entered: &str) {
        let sender = self.sender();
        let effect = self.config.state(entered).and_then(StateNode::entry);
        self.effects.borrow_mut().enter(entered, effect, &sender);
    }
}

/// Marks the instance busy for the lifetime of the guard.
struct Processing<'a, C> {
    shared: &'a Shared<C>,
}

impl<'a, C> Processing<'a, C> {
    fn begin(shared: &'a Shared<C>) -> Self {
        shared.processing.set(true);
        Self { shared }
    }
}

impl<C> Drop for Processing<'_, C> {
    fn drop(&mut self) {
        self.shared.processing.set(false);
        if std::thread::panicking() {
            // Actions queued behind a panicking effect are dropped with it.
            if let Ok(mut queue) = self.shared.queue.try_borrow_mut() {
                queue.clear();
            }
        }
    }
}
