//! Door Lock Machine
//!
//! Demonstrates guards over context, context updates from effects, cleanup
//! effects and debug tracing, with the table loaded from JSON.
//!
//! Run with: RUST_LOG=debug cargo run --example door_lock

use statebox::config::{Bindings, MachineDefinition};
use statebox::{CleanupEffect, MachineInstance};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default)]
struct Door {
    has_key: bool,
    openings: u32,
}

const DOOR: &str = r#"{
    "initial": "locked",
    "debug": true,
    "states": {
        "locked": {
            "on": {
                "UNLOCK": { "target": "unlocked", "guard": "has_key" },
                "SEARCH": "searching"
            }
        },
        "searching": {
            "on": { "FOUND": "locked" },
            "effect": "find_key"
        },
        "unlocked": {
            "on": { "LOCK": "locked", "OPEN": "open" }
        },
        "open": {
            "on": { "CLOSE": "unlocked" },
            "effect": "count_opening"
        }
    }
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door Lock Machine ===\n");

    let bindings = Bindings::new()
        .guard("has_key", |door: &Door| door.has_key)
        .effect("find_key", |tx| {
            println!("  searching... found a key");
            tx.update_context(|door: &Door| Door {
                has_key: true,
                ..door.clone()
            });
            tx.send("FOUND");
            None
        })
        .effect("count_opening", |tx| {
            tx.update_context(|door: &Door| Door {
                openings: door.openings + 1,
                ..door.clone()
            });
            Some(CleanupEffect::new(|_| println!("  door swings shut")))
        });

    let config = MachineDefinition::from_json(DOOR)
        .expect("door table is valid JSON")
        .bind(&bindings)
        .expect("door table is a valid machine");

    let mut door = MachineInstance::activate_default(config);

    for event in ["UNLOCK", "SEARCH", "UNLOCK", "OPEN", "CLOSE", "OPEN", "CLOSE", "LOCK"] {
        let outcome = door.send(event);
        println!("  {event:<7} -> {:<10} {:?}", door.value(), outcome);
    }

    println!("\nFinal context: {:?}", door.context());
    door.deactivate();

    println!("\n=== Example Complete ===");
}
