//! Property-based tests for the reducer and the instance host.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated event sequences.

use proptest::prelude::*;
use statebox::config::{MachineConfig, StateNode};
use statebox::core::{reduce, Action, MachineSnapshot, Step};
use statebox::effects::CleanupEffect;
use statebox::host::{MachineInstance, Outcome, Sender};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, Default, PartialEq)]
struct Ctx {
    ticks: u32,
}

type Log = Rc<RefCell<Vec<String>>>;

const EVENTS: [&str; 6] = ["NEXT", "BACK", "LOOP", "SKIP", "TICK", "UNKNOWN"];

fn tracked(
    log: &Log,
    name: &'static str,
) -> impl Fn(&Sender<Ctx>) -> Option<CleanupEffect<Ctx>> {
    let log = Rc::clone(log);
    move |tx: &Sender<Ctx>| {
        log.borrow_mut().push(format!("enter {name}"));
        tx.update_context(|c: &Ctx| Ctx { ticks: c.ticks + 1 });
        let log = Rc::clone(&log);
        Some(CleanupEffect::new(move |_| {
            log.borrow_mut().push(format!("exit {name}"));
        }))
    }
}

fn machine_config(log: &Log) -> MachineConfig<Ctx> {
    machine_config_from(log, "a")
}

fn machine_config_from(log: &Log, initial: &str) -> MachineConfig<Ctx> {
    MachineConfig::builder()
        .initial(initial)
        .state(
            "a",
            StateNode::new()
                .on("NEXT", "b")
                .on("LOOP", "a")
                .effect(tracked(log, "a")),
        )
        .state(
            "b",
            StateNode::new()
                .on_guarded("NEXT", "c", |c: &Ctx| c.ticks % 2 == 0)
                .on("BACK", "a")
                .on("SKIP", "d")
                .effect(tracked(log, "b")),
        )
        .state(
            "c",
            StateNode::new()
                .on("BACK", "b")
                .on("TICK", "c")
                .on("SKIP", "d")
                .effect(tracked(log, "c")),
        )
        .state("d", StateNode::new().effect(tracked(log, "d")))
        .build()
        .unwrap()
}

prop_compose! {
    fn arbitrary_event()(index in 0..EVENTS.len()) -> &'static str {
        EVENTS[index]
    }
}

proptest! {
    #[test]
    fn next_events_match_current_state(events in prop::collection::vec(arbitrary_event(), 0..40)) {
        let log = Log::default();
        let mut machine = MachineInstance::activate_default(machine_config(&log));

        for event in events {
            machine.send(event);
            let value = machine.value();
            prop_assert_eq!(machine.next_events(), machine.config().events_for(&value));
        }
    }

    #[test]
    fn no_op_dispatch_changes_nothing(events in prop::collection::vec(arbitrary_event(), 0..20)) {
        let log = Log::default();
        let mut machine = MachineInstance::activate_default(machine_config(&log));
        for event in events {
            machine.send(event);
        }

        let before = machine.snapshot().clone();
        let effects_before = log.borrow().len();

        prop_assert_eq!(machine.send("UNKNOWN"), Outcome::Unhandled);

        let after = machine.snapshot().clone();
        prop_assert_eq!(&after, &before);
        prop_assert!(Rc::ptr_eq(after.context_rc(), before.context_rc()));
        prop_assert_eq!(log.borrow().len(), effects_before);
    }

    #[test]
    fn effects_alternate_enter_and_exit(events in prop::collection::vec(arbitrary_event(), 0..40)) {
        let log = Log::default();
        let mut machine = MachineInstance::activate_default(machine_config(&log));
        for event in events {
            machine.send(event);
        }
        machine.deactivate();

        let entries = log.borrow();
        prop_assert_eq!(entries.len() % 2, 0);
        for pair in entries.chunks(2) {
            let entered = pair[0].strip_prefix("enter ");
            let exited = pair[1].strip_prefix("exit ");
            prop_assert!(entered.is_some());
            prop_assert_eq!(entered, exited);
        }
    }

    #[test]
    fn transitions_iff_guard_holds(ticks in 0..100u32) {
        let log = Log::default();
        let config = machine_config_from(&log, "b");
        let snapshot = MachineSnapshot::initial(&config, Ctx { ticks });

        let step = reduce(&config, &snapshot, Action::event("NEXT"));

        prop_assert_eq!(step.is_transition(), ticks % 2 == 0);
    }

    #[test]
    fn context_updates_never_touch_value(ticks in prop::collection::vec(any::<u32>(), 1..10)) {
        let log = Log::default();
        let config = machine_config(&log);
        let mut snapshot = MachineSnapshot::initial(&config, Ctx::default());

        for value in ticks {
            let update = Action::update_context(move |_: &Ctx| Ctx { ticks: value });
            let step = reduce(&config, &snapshot, update);
            let Step::ContextUpdated(next) = step else {
                panic!("expected a context update");
            };
            prop_assert_eq!(next.value(), snapshot.value());
            prop_assert_eq!(next.next_events(), snapshot.next_events());
            prop_assert_eq!(next.context().ticks, value);
            snapshot = next;
        }
    }
}
