//! Handle-keyed directory of live sequences.
//!
//! Each registered pattern gets its own automaton and an opaque
//! [`SequenceHandle`] to drive it by, so callers never rely on object
//! identity to find their sequence. Every sequence is independent; steps
//! against one handle never affect another.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::automaton::{Automaton, TransitionError};
use crate::grammar::{compile, GrammarError};

/// Opaque key for one registered sequence.
///
/// Handles are freshly generated at registration and carry no meaning
/// beyond identity; they serialize as plain UUIDs for logging and
/// correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceHandle(uuid::Uuid);

impl SequenceHandle {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors surfaced by registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle does not name a live sequence.
    #[error("unknown sequence handle {handle}")]
    UnknownHandle { handle: SequenceHandle },

    /// The pattern failed to compile at registration.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The event was rejected by the sequence's automaton.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Directory of live sequences, one automaton per handle.
///
/// # Example
///
/// ```rust
/// use methodical::SequenceRegistry;
///
/// let mut registry = SequenceRegistry::new();
/// let handle = registry.register("start -> end").unwrap();
///
/// registry.step(handle, "start").unwrap();
/// registry.step(handle, "end").unwrap();
/// assert!(registry.is_accepting(handle).unwrap());
///
/// let finished = registry.release(handle).unwrap();
/// assert!(finished.is_accepting());
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    sequences: HashMap<SequenceHandle, Automaton>,
}

impl SequenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sequences: HashMap::new(),
        }
    }

    /// Compile `pattern` and start tracking a fresh sequence for it.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::Grammar`] when the pattern does not
    /// compile; nothing is registered in that case.
    pub fn register(&mut self, pattern: &str) -> Result<SequenceHandle, RegistryError> {
        let automaton = compile(pattern)?;
        let handle = SequenceHandle::generate();
        info!(%handle, pattern, "sequence registered");
        self.sequences.insert(handle, automaton);
        Ok(handle)
    }

    /// Validate one event against the sequence behind `handle`.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownHandle`] for a released or
    /// foreign handle, or [`RegistryError::Transition`] when the event is
    /// rejected. A rejected sequence stays registered for inspection.
    pub fn step(&mut self, handle: SequenceHandle, event: &str) -> Result<(), RegistryError> {
        let automaton = self
            .sequences
            .get_mut(&handle)
            .ok_or(RegistryError::UnknownHandle { handle })?;
        automaton.step(event).map_err(|err| {
            warn!(%handle, event, %err, "event rejected");
            RegistryError::from(err)
        })
    }

    /// Whether the sequence behind `handle` is currently accepting.
    pub fn is_accepting(&self, handle: SequenceHandle) -> Result<bool, RegistryError> {
        self.sequences
            .get(&handle)
            .map(Automaton::is_accepting)
            .ok_or(RegistryError::UnknownHandle { handle })
    }

    /// Borrow the automaton behind `handle` for inspection.
    pub fn automaton(&self, handle: SequenceHandle) -> Option<&Automaton> {
        self.sequences.get(&handle)
    }

    /// Stop tracking `handle`, returning its automaton so the caller can
    /// examine the final cursor and trace.
    pub fn release(&mut self, handle: SequenceHandle) -> Result<Automaton, RegistryError> {
        let automaton = self
            .sequences
            .remove(&handle)
            .ok_or(RegistryError::UnknownHandle { handle })?;
        info!(
            %handle,
            accepted = automaton.is_accepting(),
            "sequence released"
        );
        Ok(automaton)
    }

    /// Number of live sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether no sequences are live.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_step_release_round_trip() {
        let mut registry = SequenceRegistry::new();
        let handle = registry.register("start -> end").unwrap();
        assert_eq!(registry.len(), 1);

        registry.step(handle, "start").unwrap();
        registry.step(handle, "end").unwrap();
        assert!(registry.is_accepting(handle).unwrap());

        let automaton = registry.release(handle).unwrap();
        assert!(automaton.is_accepting());
        assert_eq!(automaton.current_state_id(), "end");
        assert!(registry.is_empty());
    }

    #[test]
    fn bad_pattern_registers_nothing() {
        let mut registry = SequenceRegistry::new();
        let err = registry.register("lonely").unwrap_err();
        assert!(matches!(err, RegistryError::Grammar(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn released_handles_become_unknown() {
        let mut registry = SequenceRegistry::new();
        let handle = registry.register("a -> b").unwrap();
        registry.release(handle).unwrap();

        assert!(matches!(
            registry.step(handle, "a"),
            Err(RegistryError::UnknownHandle { .. })
        ));
        assert!(matches!(
            registry.is_accepting(handle),
            Err(RegistryError::UnknownHandle { .. })
        ));
        assert!(registry.automaton(handle).is_none());
    }

    #[test]
    fn sequences_are_independent() {
        let mut registry = SequenceRegistry::new();
        let first = registry.register("a -> b").unwrap();
        let second = registry.register("a -> b").unwrap();
        assert_ne!(first, second);

        registry.step(first, "a").unwrap();
        registry.step(first, "b").unwrap();

        // the second sequence has not moved
        assert!(registry.is_accepting(first).unwrap());
        assert!(!registry.is_accepting(second).unwrap());
        assert_eq!(
            registry.automaton(second).unwrap().current_state_id(),
            "INITIAL"
        );
    }

    #[test]
    fn rejection_keeps_the_sequence_registered() {
        let mut registry = SequenceRegistry::new();
        let handle = registry.register("a -> b").unwrap();

        let err = registry.step(handle, "b").unwrap_err();
        assert!(matches!(err, RegistryError::Transition(_)));
        assert_eq!(registry.len(), 1);

        // still steppable after the rejection
        registry.step(handle, "a").unwrap();
        registry.step(handle, "b").unwrap();
        assert!(registry.is_accepting(handle).unwrap());
    }

    #[test]
    fn handles_serialize_as_plain_uuids() {
        let mut registry = SequenceRegistry::new();
        let handle = registry.register("a -> b").unwrap();

        let json = serde_json::to_string(&handle).unwrap();
        let back: SequenceHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, back);
        assert!(registry.automaton(back).is_some());
    }
}
