//! The compiled automaton and its stepping engine.
//!
//! An [`Automaton`] owns every state of one compiled pattern plus a live
//! cursor. Events are checked in three regimes, in order:
//!
//! 1. cursor on the terminal sentinel: only a post-final rule keyed by the
//!    sentinel itself can absorb more events;
//! 2. cursor on a declared final state: its post-final rule absorbs
//!    allowed events in place, otherwise any event takes the edge to the
//!    sentinel if one exists;
//! 3. ordinary states: outgoing edges are scanned in insertion order, with
//!    a wildcard target absorbing the event through on-demand growth.
//!
//! Rejected events leave the cursor untouched. Graph growth performed by
//! the wildcard is permanent.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tracing::debug;

use crate::automaton::error::TransitionError;
use crate::automaton::growth;
use crate::core::{
    PostFinalRule, State, StateId, TraceEntry, ValidationTrace, INITIAL_ID, SENTINEL_FINAL_ID,
};
use crate::grammar::tokens;

/// A compiled ordering pattern with a live validation cursor.
///
/// Produced by [`compile`](crate::compile); driven by [`step`](Self::step)
/// once per observed event.
///
/// # Example
///
/// ```rust
/// use methodical::{compile, TransitionError};
///
/// let mut sequence = compile("open -> close").unwrap();
/// sequence.step("open").unwrap();
/// assert!(!sequence.is_accepting());
///
/// let err = sequence.step("flush").unwrap_err();
/// assert!(matches!(err, TransitionError::InvalidTransition { .. }));
/// // a rejection leaves the cursor in place
/// assert_eq!(sequence.current_state_id(), "open");
///
/// sequence.step("close").unwrap();
/// assert!(sequence.is_accepting());
/// ```
#[derive(Clone, Debug)]
pub struct Automaton {
    states: BTreeMap<StateId, State>,
    cursor: StateId,
    declared_final_id: StateId,
    alias_map: HashMap<String, StateId>,
    post_final_rules: HashMap<StateId, PostFinalRule>,
    trace: ValidationTrace,
}

impl Automaton {
    /// Fresh graph holding only the entry state and the terminal sentinel,
    /// cursor on the entry.
    pub(crate) fn new() -> Self {
        let mut states = BTreeMap::new();
        states.insert(
            INITIAL_ID.to_string(),
            State::for_token(INITIAL_ID, false),
        );
        states.insert(
            SENTINEL_FINAL_ID.to_string(),
            State::for_token(SENTINEL_FINAL_ID, true),
        );
        Self {
            states,
            cursor: INITIAL_ID.to_string(),
            declared_final_id: SENTINEL_FINAL_ID.to_string(),
            alias_map: HashMap::new(),
            post_final_rules: HashMap::new(),
            trace: ValidationTrace::new(),
        }
    }

    /// Validate one event, advancing the cursor on success.
    ///
    /// The event is normalized exactly like pattern tokens (grouping
    /// characters stripped) and then resolved through the alias map, so
    /// names arriving via a conjunction's synthetic path still match.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] describing the rejection; the cursor
    /// does not move on failure.
    pub fn step(&mut self, event: &str) -> Result<(), TransitionError> {
        let cleaned = tokens::strip_grouping(event);
        let resolved = match self.alias_map.get(&cleaned) {
            Some(id) => id.clone(),
            None => cleaned.clone(),
        };

        if self.cursor == SENTINEL_FINAL_ID {
            return self.step_at_sentinel(&resolved);
        }
        let at_declared_final = self.states.get(&self.cursor).is_some_and(State::is_final);
        if at_declared_final {
            return self.step_at_declared_final(&resolved);
        }
        self.step_ordinary(&resolved, &cleaned)
    }

    /// True once the sequence counts as complete: the cursor is on the
    /// sentinel, or on a state with a direct edge to it.
    ///
    /// Pure; calling it never moves the cursor.
    pub fn is_accepting(&self) -> bool {
        self.cursor == SENTINEL_FINAL_ID
            || self
                .states
                .get(&self.cursor)
                .is_some_and(|state| state.has_transition_to(SENTINEL_FINAL_ID))
    }

    /// Id of the state the cursor is on.
    pub fn current_state_id(&self) -> &str {
        &self.cursor
    }

    /// Id of the author-declared final state.
    pub fn declared_final_id(&self) -> &str {
        &self.declared_final_id
    }

    /// Export the live edge list: every state with at least one outgoing
    /// edge, targets in insertion order.
    ///
    /// Reflects wildcard growth, so the export can gain entries after
    /// steps.
    pub fn edges(&self) -> BTreeMap<StateId, Vec<StateId>> {
        self.states
            .iter()
            .filter(|(_, state)| !state.outgoing().is_empty())
            .map(|(id, state)| (id.clone(), state.outgoing().to_vec()))
            .collect()
    }

    /// The accepted steps so far.
    pub fn trace(&self) -> &ValidationTrace {
        &self.trace
    }

    fn step_at_sentinel(&mut self, event: &str) -> Result<(), TransitionError> {
        let ruling = self
            .post_final_rules
            .get(SENTINEL_FINAL_ID)
            .map(|rule| rule.allows(event));
        match ruling {
            Some(true) => {
                self.record(SENTINEL_FINAL_ID.into(), SENTINEL_FINAL_ID.into(), event);
                Ok(())
            }
            Some(false) => Err(TransitionError::DisallowedFinalExtension {
                state: SENTINEL_FINAL_ID.to_string(),
                event: event.to_string(),
            }),
            None => Err(TransitionError::TransitionFromTerminal {
                event: event.to_string(),
            }),
        }
    }

    fn step_at_declared_final(&mut self, event: &str) -> Result<(), TransitionError> {
        let ruling = self
            .post_final_rules
            .get(&self.cursor)
            .map(|rule| rule.allows(event));
        match ruling {
            // absorbing accept: the cursor stays put
            Some(true) => {
                let here = self.cursor.clone();
                self.record(here.clone(), here, event);
                Ok(())
            }
            Some(false) => Err(TransitionError::DisallowedFinalExtension {
                state: self.cursor.clone(),
                event: event.to_string(),
            }),
            None => {
                if self.has_edge(&self.cursor, SENTINEL_FINAL_ID) {
                    let from = self.cursor.clone();
                    self.cursor = SENTINEL_FINAL_ID.to_string();
                    self.record(from, SENTINEL_FINAL_ID.into(), event);
                    Ok(())
                } else {
                    Err(TransitionError::TransitionFromFinal {
                        from: self.cursor.clone(),
                        event: event.to_string(),
                    })
                }
            }
        }
    }

    fn step_ordinary(&mut self, resolved: &str, cleaned: &str) -> Result<(), TransitionError> {
        let targets: Vec<StateId> = self
            .states
            .get(&self.cursor)
            .map(|state| state.outgoing().to_vec())
            .unwrap_or_default();

        for target_id in targets {
            let is_wildcard = self.states.get(&target_id).is_some_and(State::is_wildcard);
            if is_wildcard {
                let landed = growth::absorb_event(self, &target_id, resolved);
                let from = self.cursor.clone();
                self.cursor = landed.clone();
                self.record(from, landed, resolved);
                return Ok(());
            }

            let matched = self
                .states
                .get(&target_id)
                .is_some_and(|state| state.matches_event(resolved, cleaned));
            if matched {
                let from = self.cursor.clone();
                self.cursor = target_id.clone();
                self.record(from, target_id, resolved);
                return Ok(());
            }
        }

        Err(TransitionError::InvalidTransition {
            from: self.cursor.clone(),
            event: resolved.to_string(),
        })
    }

    fn record(&mut self, from: StateId, to: StateId, event: &str) {
        debug!(%from, %to, event, "step accepted");
        self.trace = self.trace.record(TraceEntry {
            from,
            to,
            event: event.to_string(),
            at: Utc::now(),
        });
    }

    pub(crate) fn declare_final(&mut self, token: &str) -> StateId {
        let id = self.get_or_create(token, true);
        self.declared_final_id = id.clone();
        id
    }

    /// Create the state for `token` unless it already exists; an existing
    /// state keeps its flags. Returns the state id either way.
    pub(crate) fn get_or_create(&mut self, token: &str, is_final: bool) -> StateId {
        if !self.states.contains_key(token) {
            self.states
                .insert(token.to_string(), State::for_token(token, is_final));
        }
        token.to_string()
    }

    pub(crate) fn insert_state(&mut self, state: State) {
        self.states.insert(state.id().to_string(), state);
    }

    pub(crate) fn add_edge(&mut self, from: &str, to: &str) {
        debug_assert!(self.states.contains_key(from), "unknown source state {from}");
        if let Some(state) = self.states.get_mut(from) {
            state.add_transition(to);
        }
    }

    pub(crate) fn has_edge(&self, from: &str, to: &str) -> bool {
        self.states
            .get(from)
            .is_some_and(|state| state.has_transition_to(to))
    }

    pub(crate) fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    pub(crate) fn states_iter(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn set_post_final_rule(&mut self, id: &str, rule: PostFinalRule) {
        self.post_final_rules.insert(id.to_string(), rule);
    }

    pub(crate) fn record_alias(&mut self, token: &str, id: &str) {
        self.alias_map.insert(token.to_string(), id.to_string());
    }
}
