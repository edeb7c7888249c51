//! Errors raised while stepping a sequence.

use thiserror::Error;

/// Why an event was rejected.
///
/// A rejection fails the sequence but never corrupts the automaton: the
/// cursor stays where it was, and the automaton remains inspectable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// No outgoing edge of the current state matches the event.
    #[error("invalid transition from '{from}' on event '{event}'")]
    InvalidTransition { from: String, event: String },

    /// The sequence already sits on the terminal sentinel.
    #[error("sequence is complete, cannot accept further event '{event}'")]
    TransitionFromTerminal { event: String },

    /// The cursor is on a declared final state with no way forward.
    #[error("cannot leave declared final state '{from}' on event '{event}'")]
    TransitionFromFinal { from: String, event: String },

    /// A post-final rule exists but does not cover the event.
    #[error("event '{event}' is not in the allow-list of final state '{state}'")]
    DisallowedFinalExtension { state: String, event: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_states_involved() {
        let err = TransitionError::InvalidTransition {
            from: "start".into(),
            event: "skip".into(),
        };
        let text = err.to_string();
        assert!(text.contains("start"));
        assert!(text.contains("skip"));

        let err = TransitionError::DisallowedFinalExtension {
            state: "end".into(),
            event: "reopen".into(),
        };
        assert!(err.to_string().contains("reopen"));
    }
}
