//! Live validation of event sequences over a compiled graph.
//!
//! The stepping engine in `machine` performs pure edge lookup; the one
//! structural mutation at validation time, wildcard-driven graph growth,
//! is isolated in `growth`.

mod error;
mod growth;
mod machine;

pub use error::TransitionError;
pub use machine::Automaton;
