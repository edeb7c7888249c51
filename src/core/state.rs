//! State nodes of a compiled ordering automaton.
//!
//! A compiled pattern is a directed graph of [`State`] nodes. Each node has
//! a unique `id`, a display `label` (shared across repetition chains and
//! conjunction synthetics), and an ordered list of outgoing edges.

use uuid::Uuid;

/// Unique key of a state within one automaton.
pub type StateId = String;

/// Id of the implicit entry state every automaton starts in.
pub const INITIAL_ID: &str = "INITIAL";

/// Id of the synthetic terminal sink, distinct from any author-declared
/// final state.
pub const SENTINEL_FINAL_ID: &str = "FINAL";

/// Token that names the wildcard state in pattern text.
pub const WILDCARD_TOKEN: &str = ".*";

/// Structural role of a state within the compiled graph.
///
/// The kind is derived from how the state was authored, so invariants like
/// "repetition is enforced by chain length" are visible in the data instead
/// of encoded in id suffixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateKind {
    /// A state named directly by a pattern token.
    Plain,
    /// One link of an unrolled `(name){n}` chain; `step` is 1-based.
    Repetition { step: usize },
    /// The `.*` state. Any event arriving at a state with an edge to it is
    /// absorbed through on-demand graph growth.
    Wildcard,
}

/// A single node in the compiled graph.
///
/// Identity is fixed at creation; the one mutable part is the outgoing edge
/// list, which the wildcard's on-demand growth may extend after compilation.
///
/// # Example
///
/// ```rust
/// use methodical::core::{State, StateKind};
///
/// let mut state = State::for_token("process", false);
/// assert_eq!(state.id(), "process");
/// assert_eq!(state.label(), "process");
/// assert_eq!(*state.kind(), StateKind::Plain);
///
/// state.add_transition("end");
/// state.add_transition("end"); // duplicates collapse
/// assert_eq!(state.outgoing(), ["end".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    id: StateId,
    label: String,
    kind: StateKind,
    is_final: bool,
    outgoing: Vec<StateId>,
}

impl State {
    /// Create a state named by a pattern token.
    ///
    /// The wildcard token `.*` always produces a [`StateKind::Wildcard`]
    /// state, regardless of which compilation path names it first.
    pub fn for_token(token: &str, is_final: bool) -> Self {
        let kind = if token == WILDCARD_TOKEN {
            StateKind::Wildcard
        } else {
            StateKind::Plain
        };
        Self {
            id: token.to_string(),
            label: token.to_string(),
            kind,
            is_final,
            outgoing: Vec::new(),
        }
    }

    /// Create one link of an unrolled repetition chain.
    ///
    /// All links of a chain share the repeated token as their label while
    /// keeping distinct ids, so an event advances exactly one hop per call.
    ///
    /// ```rust
    /// use methodical::core::{State, StateKind};
    ///
    /// let link = State::repetition_step("save", 2);
    /// assert_eq!(link.id(), "save_rep2");
    /// assert_eq!(link.label(), "save");
    /// assert_eq!(*link.kind(), StateKind::Repetition { step: 2 });
    /// ```
    pub fn repetition_step(name: &str, step: usize) -> Self {
        Self {
            id: format!("{name}_rep{step}"),
            label: name.to_string(),
            kind: StateKind::Repetition { step },
            is_final: false,
            outgoing: Vec::new(),
        }
    }

    /// Create a conjunction synthetic: a fresh intermediate state with a
    /// random id, labeled with the token it stands in for.
    pub fn synthetic(label: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            kind: StateKind::Plain,
            is_final: false,
            outgoing: Vec::new(),
        }
    }

    /// The unique id of this state.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display/semantic name; may be shared across states.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Structural role of this state.
    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// Whether reaching this state alone satisfies completion.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Whether this is the `.*` state.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, StateKind::Wildcard)
    }

    /// Targets of this state's outgoing edges, in insertion order.
    ///
    /// Insertion order is also the scan order used during validation.
    pub fn outgoing(&self) -> &[StateId] {
        &self.outgoing
    }

    /// Add an outgoing edge. Duplicate targets collapse.
    pub fn add_transition(&mut self, target: &str) {
        if !self.outgoing.iter().any(|t| t == target) {
            self.outgoing.push(target.to_string());
        }
    }

    /// Whether an edge to `target` exists.
    pub fn has_transition_to(&self, target: &str) -> bool {
        self.outgoing.iter().any(|t| t == target)
    }

    /// Whether an incoming event selects this state: the resolved event
    /// matches the id, or the cleaned event matches the label.
    ///
    /// Label matching is what lets repetition links (distinct ids, shared
    /// label) and conjunction synthetics accept the author-visible token.
    pub fn matches_event(&self, resolved: &str, cleaned: &str) -> bool {
        self.id == resolved || self.label == cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_state_uses_token_for_id_and_label() {
        let state = State::for_token("start", false);
        assert_eq!(state.id(), "start");
        assert_eq!(state.label(), "start");
        assert_eq!(*state.kind(), StateKind::Plain);
        assert!(!state.is_final());
        assert!(state.outgoing().is_empty());
    }

    #[test]
    fn wildcard_token_always_yields_wildcard_kind() {
        let state = State::for_token(WILDCARD_TOKEN, false);
        assert!(state.is_wildcard());
        assert_eq!(state.id(), ".*");
    }

    #[test]
    fn repetition_step_derives_id_from_name_and_step() {
        let state = State::repetition_step("rep", 3);
        assert_eq!(state.id(), "rep_rep3");
        assert_eq!(state.label(), "rep");
        assert_eq!(*state.kind(), StateKind::Repetition { step: 3 });
        assert!(!state.is_final());
    }

    #[test]
    fn synthetic_states_get_fresh_ids_with_shared_label() {
        let first = State::synthetic("commit");
        let second = State::synthetic("commit");
        assert_ne!(first.id(), second.id());
        assert_eq!(first.label(), "commit");
        assert_eq!(second.label(), "commit");
    }

    #[test]
    fn add_transition_preserves_order_and_collapses_duplicates() {
        let mut state = State::for_token("hub", false);
        state.add_transition("b");
        state.add_transition("a");
        state.add_transition("b");
        state.add_transition("c");
        assert_eq!(
            state.outgoing(),
            ["b".to_string(), "a".to_string(), "c".to_string()]
        );
        assert!(state.has_transition_to("a"));
        assert!(!state.has_transition_to("d"));
    }

    #[test]
    fn event_matching_accepts_id_or_label() {
        let link = State::repetition_step("save", 1);
        // event "save" matches by label even though the id is "save_rep1"
        assert!(link.matches_event("save", "save"));
        // the unrolled id also matches directly
        assert!(link.matches_event("save_rep1", "save_rep1"));
        assert!(!link.matches_event("load", "load"));
    }

    #[test]
    fn final_flag_is_fixed_at_creation() {
        let state = State::for_token("end", true);
        assert!(state.is_final());
    }
}
