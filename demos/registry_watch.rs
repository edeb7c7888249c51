//! Registry Watch
//!
//! This example drives several sequences side by side through the
//! handle-keyed registry, with tracing enabled so registration, accepted
//! steps, and rejections are all visible on stderr.
//!
//! Key concepts:
//! - One registry tracks many independent sequences
//! - Handles are opaque; a released handle is immediately dead
//! - Rejections are logged but leave the sequence registered
//!
//! Run with: cargo run --example registry_watch

use methodical::SequenceRegistry;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Registry Watch ===\n");

    let mut registry = SequenceRegistry::new();
    let session = registry.register("connect -> auth -> query -> disconnect").unwrap();
    let batch = registry.register("begin -> (work){2} -> commit").unwrap();
    println!("Tracking {} sequences\n", registry.len());

    println!("Step 1: Drive the session to completion");
    for event in ["connect", "auth", "query", "disconnect"] {
        registry.step(session, event).unwrap();
        println!("  [session] {event}");
    }
    println!("  accepting: {}\n", registry.is_accepting(session).unwrap());

    println!("Step 2: The batch commits too early");
    match registry.step(batch, "commit") {
        Ok(()) => println!("  [batch] commit"),
        Err(err) => println!("  [batch] rejected: {err}"),
    }
    // still registered, so the proper order goes through
    for event in ["begin", "work", "work", "commit"] {
        registry.step(batch, event).unwrap();
        println!("  [batch] {event}");
    }
    println!("  accepting: {}\n", registry.is_accepting(batch).unwrap());

    println!("Step 3: Release and inspect");
    for (name, handle) in [("session", session), ("batch", batch)] {
        let automaton = registry.release(handle).unwrap();
        println!(
            "  {name}: accepted={} path={}",
            automaton.is_accepting(),
            automaton.trace().path().join(" -> ")
        );
    }
    println!("  registry empty: {}", registry.is_empty());

    match registry.step(session, "connect") {
        Ok(()) => println!("  released handle still stepped"),
        Err(err) => println!("  released handle rejected: {err}"),
    }

    println!("\nKey Takeaways:");
    println!("- Sequences never share state; each handle owns its cursor");
    println!("- A rejection is an observation, not a teardown");
    println!("- Releasing returns the automaton for post-mortem inspection");

    println!("\n=== Example Complete ===");
}
