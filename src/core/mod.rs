//! Core graph types shared by compilation and validation.
//!
//! This module holds the data the rest of the crate operates on:
//! - State nodes and their outgoing edges
//! - Post-final rules for events after completion
//! - The immutable accepted-event trace
//!
//! Everything here is pure data with pure methods; graph mutation and
//! event handling live in the `grammar` and `automaton` modules.

mod rules;
mod state;
mod trace;

pub use rules::PostFinalRule;
pub use state::{State, StateId, StateKind, INITIAL_ID, SENTINEL_FINAL_ID, WILDCARD_TOKEN};
pub use trace::{TraceEntry, ValidationTrace};
