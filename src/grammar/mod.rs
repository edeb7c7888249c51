//! The ordering grammar: segment lexing, classification, and compilation
//! into an automaton.
//!
//! Pattern text supports sequencing (whitespace or `->`), alternation
//! (`|`), two-operand conjunction (`&`), bounded repetition (`(x){n}`),
//! the open wildcard (`.*`), and a trailing `[final:...]` clause for
//! events allowed after completion.

mod compiler;
mod error;
pub(crate) mod tokens;

pub use compiler::compile;
pub use error::GrammarError;
