//! Toggle Machine
//!
//! The smallest useful machine: two states, one event each, plus an entry
//! effect that immediately bounces out of a transient state.
//!
//! Run with: cargo run --example toggle

use statebox::{MachineConfig, MachineInstance, StateNode};

fn main() {
    println!("=== Toggle Machine ===\n");

    let config = MachineConfig::<()>::builder()
        .initial("frozen")
        .state(
            "frozen",
            StateNode::new().on("THAW", "inactive").effect(|tx| {
                println!("  entered frozen, thawing");
                tx.send("THAW");
                None
            }),
        )
        .state("inactive", StateNode::new().on("ACTIVATE", "active"))
        .state("active", StateNode::new().on("DEACTIVATE", "inactive"))
        .build()
        .unwrap();

    let mut machine = MachineInstance::activate(config, ());
    println!("Settled in: {}\n", machine.value());

    for event in ["ACTIVATE", "ACTIVATE", "DEACTIVATE"] {
        let outcome = machine.send(event);
        println!(
            "  {event:<10} -> {:<10} {:?}",
            machine.value(),
            outcome
        );
        println!("  next events: {:?}", machine.next_events());
    }

    machine.deactivate();
    println!("\n=== Example Complete ===");
}
