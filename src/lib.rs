//! Methodical: runtime validation of call ordering via compiled sequence grammars
//!
//! A grammar like `"start -> (a | b) -> end"` compiles into a state-transition
//! automaton. Events are then validated one at a time against that automaton:
//! each accepted event advances a cursor along the compiled transitions, and an
//! out-of-order event is rejected with a descriptive error while the cursor
//! stays put.
//!
//! # Core Concepts
//!
//! - **Grammar**: a one-line pattern of tokens joined by `->` or whitespace,
//!   with `|` (alternation), `&` (interleaving), `(name){n}` (repetition) and
//!   `.*` (wildcard) operators, plus an optional `[final: ...]` clause that
//!   names which events may follow completion
//! - **Automaton**: the compiled transition graph with a cursor, built once by
//!   [`compile`] and advanced by [`Automaton::step`]
//! - **Trace**: an immutable record of every accepted transition, with
//!   timestamps
//! - **Registry**: a handle-keyed directory for driving many independent
//!   sequences side by side
//!
//! # Example
//!
//! ```rust
//! use methodical::compile;
//!
//! let mut automaton = compile("start -> (fetch | load) -> end").unwrap();
//!
//! automaton.step("start").unwrap();
//! automaton.step("load").unwrap();
//! automaton.step("end").unwrap();
//! assert!(automaton.is_accepting());
//!
//! // an out-of-order event is rejected and the cursor stays put
//! let mut broken = compile("start -> end").unwrap();
//! assert!(broken.step("end").is_err());
//! assert_eq!(broken.current_state_id(), "INITIAL");
//! ```

pub mod automaton;
pub mod core;
pub mod grammar;
pub mod registry;

// Re-export commonly used types
pub use automaton::{Automaton, TransitionError};
pub use grammar::{compile, GrammarError};
pub use registry::{RegistryError, SequenceHandle, SequenceRegistry};
