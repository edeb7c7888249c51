//! Wildcard Growth Audit
//!
//! This example watches a wildcard pattern absorb unknown events and
//! inspects how the transition graph grows to remember them.
//!
//! Key concepts:
//! - The `.*` segment accepts any interlude between two known steps
//! - Absorbed events become real states, visible in the edge export
//! - Growth is permanent for the lifetime of the automaton
//!
//! Run with: cargo run --example wildcard_audit

use methodical::compile;

fn print_edges(header: &str, sequence: &methodical::Automaton) {
    println!("{header}");
    for (from, targets) in sequence.edges() {
        println!("  {from} -> {}", targets.join(", "));
    }
    println!();
}

fn main() {
    println!("=== Wildcard Growth Audit ===\n");

    let mut sequence = compile("open .* close").unwrap();
    println!("Pattern: open .* close\n");

    print_edges("Edges as compiled:", &sequence);
    let compiled_states = sequence.edges().len();

    println!("Step 1: Enter the wildcard region");
    sequence.step("open").unwrap();
    println!("  [Accepted] open\n");

    println!("Step 2: Absorb an audit interlude");
    for event in ["read", "write", "flush"] {
        sequence.step(event).unwrap();
        println!("  [Absorbed] {event} (cursor now {})", sequence.current_state_id());
    }
    println!();

    print_edges("Edges after absorption:", &sequence);
    let grown_states = sequence.edges().len();
    println!(
        "The export grew from {compiled_states} to {grown_states} connected states\n"
    );

    println!("Step 3: Close out");
    sequence.step("close").unwrap();
    println!("  [Accepted] close");
    println!("  Sequence accepting: {}", sequence.is_accepting());
    println!("  Path: {}", sequence.trace().path().join(" -> "));

    println!("\nKey Takeaways:");
    println!("- Unknown events inside the wildcard region are never errors");
    println!("- Each absorbed event is wired back into the graph permanently");
    println!("- The closing step still has to arrive for acceptance");

    println!("\n=== Example Complete ===");
}
