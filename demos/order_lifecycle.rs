//! Order Lifecycle Validation
//!
//! This example compiles an ordering grammar for an e-commerce flow and
//! validates call events against it, including a deliberate violation.
//!
//! Key concepts:
//! - Compiling a pattern with an alternation and a post-final allow-list
//! - Stepping events one at a time and reading the verdict
//! - Rejections leave the cursor in place, so validation can continue
//! - Replaying the accepted path from the trace
//!
//! Run with: cargo run --example order_lifecycle

use methodical::compile;

fn main() {
    println!("=== Order Lifecycle Validation ===\n");

    let pattern = "create -> (pay | invoice) -> ship -> deliver [deliver:refund,review]";
    let mut sequence = compile(pattern).unwrap();
    println!("Pattern: {pattern}\n");

    println!("Step 1: Happy path");
    for event in ["create", "pay", "ship", "deliver"] {
        sequence.step(event).unwrap();
        println!("  [Accepted] {event}");
    }
    println!("  Sequence accepting: {}\n", sequence.is_accepting());

    println!("Step 2: Post-final events");
    sequence.step("refund").unwrap();
    println!("  [Absorbed] refund (cursor stays on {})", sequence.current_state_id());
    match sequence.step("archive") {
        Ok(()) => println!("  [Accepted] archive"),
        Err(err) => println!("  [Rejected] archive: {err}"),
    }
    println!();

    println!("Step 3: A violation on a fresh sequence");
    let mut broken = compile(pattern).unwrap();
    match broken.step("ship") {
        Ok(()) => println!("  [Accepted] ship"),
        Err(err) => println!("  [Rejected] ship: {err}"),
    }
    println!("  Cursor still on: {}", broken.current_state_id());
    // the violation cost nothing; the real flow still validates
    for event in ["create", "invoice", "ship", "deliver"] {
        broken.step(event).unwrap();
        println!("  [Accepted] {event}");
    }
    println!("  Sequence accepting: {}\n", broken.is_accepting());

    println!("Accepted path: {}", sequence.trace().path().join(" -> "));
    if let Some(duration) = sequence.trace().duration() {
        println!("Validated in: {duration:?}");
    }

    println!("\nKey Takeaways:");
    println!("- One pattern string compiles into a full transition graph");
    println!("- Either alternation branch satisfies the same position");
    println!("- The allow-list absorbs named events after completion");
    println!("- Out-of-order events fail loudly without poisoning the run");

    println!("\n=== Example Complete ===");
}
