//! On-demand graph growth behind the wildcard.
//!
//! When the cursor's outgoing scan reaches a wildcard target, the event is
//! absorbed by growing the graph instead of failing: the event gets a
//! state of its own, wired so the walk can continue from it and so the
//! states the wildcard was guarding toward stay reachable. Growth is
//! permanent; it is never rolled back, not even when a later event is
//! rejected.

use tracing::debug;

use crate::automaton::machine::Automaton;
use crate::core::{State, StateId, SENTINEL_FINAL_ID};

/// Absorb `event` through the wildcard state `wildcard_id`, growing the
/// graph as needed. Returns the id of the state the cursor should land
/// on; the caller moves the cursor.
///
/// Growth, in order:
/// 1. materialize a state for the event if none exists, reachable from
///    the wildcard;
/// 2. connect the current cursor to it;
/// 3. back-patch every state that reaches the cursor so multi-hop
///    wildcard chains stay consistent;
/// 4. forward-patch the new state with everything the wildcard currently
///    reaches, which includes the wildcard itself and therefore keeps the
///    absorption open for the following events. The sentinel final is
///    exempt; it never gains outgoing edges.
pub(crate) fn absorb_event(automaton: &mut Automaton, wildcard_id: &str, event: &str) -> StateId {
    if automaton.state(event).is_none() {
        automaton.insert_state(State::for_token(event, false));
        automaton.add_edge(wildcard_id, event);
        debug!(event, "materialized state for wildcard event");
    }

    let cursor = automaton.current_state_id().to_string();
    automaton.add_edge(&cursor, event);

    let feeders: Vec<StateId> = automaton
        .states_iter()
        .filter(|state| state.has_transition_to(&cursor) && !state.has_transition_to(event))
        .map(|state| state.id().to_string())
        .collect();
    for feeder in &feeders {
        automaton.add_edge(feeder, event);
    }

    // edges may lead to the sentinel, never out of it
    let onward: Vec<StateId> = if event == SENTINEL_FINAL_ID {
        Vec::new()
    } else {
        automaton
            .state(wildcard_id)
            .map(|state| state.outgoing().to_vec())
            .unwrap_or_default()
    };
    for target in &onward {
        automaton.add_edge(event, target);
    }

    debug!(
        event,
        back_patched = feeders.len(),
        forward_patched = onward.len(),
        "wildcard growth applied"
    );
    event.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compile;

    #[test]
    fn unknown_event_gets_a_state_reachable_from_the_wildcard() {
        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();

        let landed = absorb_event(&mut sequence, ".*", "spawned");
        assert_eq!(landed, "spawned");
        assert!(sequence.state("spawned").is_some());
        assert!(sequence.has_edge(".*", "spawned"));
        assert!(sequence.has_edge("start", "spawned"));
    }

    #[test]
    fn feeders_of_the_cursor_are_back_patched() {
        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();

        absorb_event(&mut sequence, ".*", "spawned");
        // INITIAL reaches "start", so it must now also reach "spawned"
        assert!(sequence.has_edge("INITIAL", "spawned"));
    }

    #[test]
    fn new_state_inherits_the_wildcard_reach() {
        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();

        absorb_event(&mut sequence, ".*", "spawned");
        // the guarded path onward stays reachable
        assert!(sequence.has_edge("spawned", "end"));
        // the wildcard's self-loop carries over, keeping absorption open
        assert!(sequence.has_edge("spawned", ".*"));
        assert!(sequence.has_edge("spawned", "spawned"));
    }

    #[test]
    fn known_event_is_rewired_without_a_new_state() {
        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();

        let before = sequence.state_count();
        let landed = absorb_event(&mut sequence, ".*", "end");
        assert_eq!(landed, "end");
        assert_eq!(sequence.state_count(), before);
        assert!(sequence.has_edge("start", "end"));
    }

    #[test]
    fn repeated_absorption_chains_through_grown_states() {
        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();
        sequence.step("x1").unwrap();
        sequence.step("x2").unwrap();

        assert!(sequence.has_edge("x1", "x2"));
        // the same event can repeat thanks to the inherited self-loop
        sequence.step("x2").unwrap();
        sequence.step("end").unwrap();
        assert!(sequence.is_accepting());
    }

    #[test]
    fn absorbing_the_sentinel_name_keeps_it_a_sink() {
        use crate::automaton::TransitionError;

        let mut sequence = compile("start .* end").unwrap();
        sequence.step("start").unwrap();
        sequence.step("FINAL").unwrap();

        assert_eq!(sequence.current_state_id(), "FINAL");
        assert!(sequence.is_accepting());
        // the cursor edge points at the sentinel, nothing leaves it
        assert!(sequence.has_edge("start", "FINAL"));
        assert!(!sequence.edges().contains_key("FINAL"));

        let err = sequence.step("later").unwrap_err();
        assert!(matches!(err, TransitionError::TransitionFromTerminal { .. }));
    }
}
