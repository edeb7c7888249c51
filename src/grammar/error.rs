//! Errors raised while compiling a pattern.

use thiserror::Error;

/// Why a pattern failed to compile.
///
/// Compilation is all-or-nothing: any of these leaves no automaton behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The pattern has fewer than two steps and cannot describe an order.
    #[error("pattern must contain at least two steps, found {found}: {pattern:?}")]
    TooShort { pattern: String, found: usize },

    /// A segment looked like a repetition but is not `(name){count}`.
    #[error("malformed repetition segment {segment:?}, expected (name){{count}}")]
    BadRepetition { segment: String },

    /// The trailing bracket clause does not target the declared final state.
    #[error("final clause {clause:?} must start with {expected:?} followed by ':'")]
    BadFinalClause { clause: String, expected: String },

    /// An `&` or `|` operator has a missing operand.
    #[error("operator '{operator}' has an empty operand in segment {segment:?}")]
    EmptyOperand { operator: char, segment: String },

    /// A conjunction was given other than exactly two operands.
    #[error("conjunction takes exactly two operands, segment {segment:?} has {found}")]
    BadConjunction { segment: String, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_text() {
        let err = GrammarError::TooShort {
            pattern: "start".into(),
            found: 1,
        };
        let text = err.to_string();
        assert!(text.contains("start"));
        assert!(text.contains('1'));

        let err = GrammarError::BadRepetition {
            segment: "(x){".into(),
        };
        assert!(err.to_string().contains("(x){"));

        let err = GrammarError::EmptyOperand {
            operator: '&',
            segment: "a &".into(),
        };
        assert!(err.to_string().contains('&'));
    }
}
