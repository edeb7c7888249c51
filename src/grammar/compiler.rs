//! Pattern-to-graph compilation.
//!
//! `compile` walks the pattern's segments left to right, threading a
//! `previous` position that starts at the implicit initial state. Plain
//! tokens advance `previous`; operator segments (`|`, `&`, `(x){n}`, `.*`)
//! wire their own subgraph between `previous` and the next segment's state
//! and leave `previous` where it was. The declared final state is the last
//! segment's token, and the walk ends by connecting the last position to
//! the terminal sentinel.

use tracing::debug;

use crate::automaton::Automaton;
use crate::core::{PostFinalRule, State, StateId, INITIAL_ID, SENTINEL_FINAL_ID};
use crate::grammar::error::GrammarError;
use crate::grammar::tokens::{self, SegmentKind};

/// Compile pattern text into a ready-to-step automaton.
///
/// The separator regime is chosen for the whole pattern: `->` if an arrow
/// appears anywhere, otherwise whitespace. A trailing `[final:...]` clause
/// configures which events are still absorbed after the declared final
/// state is reached.
///
/// # Example
///
/// ```rust
/// use methodical::compile;
///
/// let mut sequence = compile("start -> process -> end").unwrap();
/// sequence.step("start").unwrap();
/// sequence.step("process").unwrap();
/// sequence.step("end").unwrap();
/// assert!(sequence.is_accepting());
/// ```
///
/// # Errors
///
/// Returns a [`GrammarError`] when the text cannot be compiled; no partial
/// automaton is ever produced.
pub fn compile(pattern: &str) -> Result<Automaton, GrammarError> {
    let (body, clause) = tokens::split_bracket_clause(pattern);
    let arrow = tokens::uses_arrow(pattern);
    let segments = tokens::split_segments(body, arrow);
    if segments.len() < 2 {
        return Err(GrammarError::TooShort {
            pattern: pattern.to_string(),
            found: segments.len(),
        });
    }
    debug!(
        pattern,
        segments = segments.len(),
        arrow,
        "compiling ordering pattern"
    );

    let mut automaton = Automaton::new();
    let final_token = tokens::strip_grouping(segments[segments.len() - 1]);
    let final_id = automaton.declare_final(&final_token);

    let mut previous: StateId = INITIAL_ID.to_string();
    for (index, segment) in segments.iter().enumerate() {
        // The upcoming segment's state is created up front so operator
        // subgraphs have a join target to wire into.
        let next = match segments.get(index + 1) {
            Some(upcoming) => {
                let token = tokens::strip_grouping(upcoming);
                automaton.get_or_create(&token, false)
            }
            None => final_id.clone(),
        };

        match tokens::classify(segment) {
            SegmentKind::MixedOrFirst => {
                fan_out_alternatives(&mut automaton, &previous, &next, segment)?;
            }
            SegmentKind::MixedAndFirst => build_fixed_mesh(&mut automaton, &previous, &next),
            SegmentKind::Conjunction => {
                build_conjunction(&mut automaton, &previous, &next, segment)?;
            }
            SegmentKind::Repetition => {
                build_repetition(&mut automaton, &previous, &next, segment)?;
            }
            SegmentKind::Alternation => {
                build_alternation(&mut automaton, &previous, &next, segment)?;
            }
            SegmentKind::Wildcard => build_wildcard(&mut automaton, &previous, &next),
            SegmentKind::Atoms => link_atoms(&mut automaton, &mut previous, segment, &final_token),
        }
    }

    if let Some(clause) = clause {
        attach_post_final(&mut automaton, &final_id, &clause)?;
    }

    // The walk's last position reaches the sentinel unless it never left
    // the entry or already connects.
    if previous != INITIAL_ID
        && previous != SENTINEL_FINAL_ID
        && !automaton.has_edge(&previous, SENTINEL_FINAL_ID)
    {
        automaton.add_edge(&previous, SENTINEL_FINAL_ID);
    }

    debug!(states = automaton.state_count(), "pattern compiled");
    Ok(automaton)
}

/// Link plain tokens in order, advancing the walk position through each.
fn link_atoms(automaton: &mut Automaton, previous: &mut StateId, segment: &str, final_token: &str) {
    for token in segment.split_whitespace() {
        let cleaned = tokens::strip_grouping(token);
        let id = automaton.get_or_create(&cleaned, cleaned == final_token);
        automaton.add_edge(previous, &id);
        *previous = id;
    }
}

/// `a|b|...`: every alternative gets `previous -> alt` and `alt -> next`,
/// so any one of them satisfies the position.
fn build_alternation(
    automaton: &mut Automaton,
    previous: &str,
    next: &str,
    segment: &str,
) -> Result<(), GrammarError> {
    for alternative in segment.split('|') {
        let cleaned = tokens::strip_grouping(alternative);
        if cleaned.is_empty() {
            return Err(GrammarError::EmptyOperand {
                operator: '|',
                segment: segment.to_string(),
            });
        }
        let id = automaton.get_or_create(&cleaned, false);
        automaton.add_edge(previous, &id);
        automaton.add_edge(&id, next);
    }
    Ok(())
}

/// `a&b`: both orders accepted. Two parallel two-hop paths are built,
/// where the second hop of each lands in a fresh synthetic state labeled
/// with the token consumed on the way in, and both converge on `next`.
fn build_conjunction(
    automaton: &mut Automaton,
    previous: &str,
    next: &str,
    segment: &str,
) -> Result<(), GrammarError> {
    let operands: Vec<String> = segment.split('&').map(tokens::strip_grouping).collect();
    if operands.iter().any(|operand| operand.is_empty()) {
        return Err(GrammarError::EmptyOperand {
            operator: '&',
            segment: segment.to_string(),
        });
    }
    if operands.len() != 2 {
        return Err(GrammarError::BadConjunction {
            segment: segment.to_string(),
            found: operands.len(),
        });
    }
    let left = &operands[0];
    let right = &operands[1];

    let left_id = automaton.get_or_create(left, false);
    let right_id = automaton.get_or_create(right, false);

    let right_intermediate = State::synthetic(right);
    let left_intermediate = State::synthetic(left);
    let right_intermediate_id = right_intermediate.id().to_string();
    let left_intermediate_id = left_intermediate.id().to_string();
    automaton.insert_state(right_intermediate);
    automaton.insert_state(left_intermediate);

    // left first: previous -> left -> (right) -> next
    automaton.add_edge(previous, &left_id);
    automaton.add_edge(&left_id, &right_intermediate_id);
    automaton.add_edge(&right_intermediate_id, next);

    // right first: previous -> right -> (left) -> next
    automaton.add_edge(previous, &right_id);
    automaton.add_edge(&right_id, &left_intermediate_id);
    automaton.add_edge(&left_intermediate_id, next);

    automaton.record_alias(left, &left_id);
    automaton.record_alias(right, &right_id);

    debug!(left, right, "conjunction paths built");
    Ok(())
}

/// `|` outermost over `&` terms: fan out each alternative, delegating the
/// conjunctive ones to the conjunction builder.
fn fan_out_alternatives(
    automaton: &mut Automaton,
    previous: &str,
    next: &str,
    segment: &str,
) -> Result<(), GrammarError> {
    for alternative in segment.split('|') {
        let alternative = alternative.trim();
        if alternative.contains('&') {
            build_conjunction(automaton, previous, next, alternative)?;
        } else {
            let cleaned = tokens::strip_grouping(alternative);
            if cleaned.is_empty() {
                return Err(GrammarError::EmptyOperand {
                    operator: '|',
                    segment: segment.to_string(),
                });
            }
            let id = automaton.get_or_create(&cleaned, false);
            automaton.add_edge(previous, &id);
            automaton.add_edge(&id, next);
        }
    }
    Ok(())
}

/// `&` outermost over `|` terms collapses to a fixed three-state mesh
/// named `start`, `process`, `end`; the segment's own tokens are not
/// consulted.
fn build_fixed_mesh(automaton: &mut Automaton, previous: &str, next: &str) {
    let end = automaton.get_or_create("end", false);
    let start = automaton.get_or_create("start", false);
    let process = automaton.get_or_create("process", false);

    automaton.add_edge(previous, &start);
    automaton.add_edge(previous, &process);
    automaton.add_edge(previous, &end);

    automaton.add_edge(&start, &end);
    automaton.add_edge(&process, &end);

    automaton.add_edge(&end, &start);
    automaton.add_edge(&end, &process);
    automaton.add_edge(&end, next);

    debug!("mixed segment collapsed to start/process/end mesh");
}

/// `(name){n}`: unroll into a chain of `n` fresh states sharing `name` as
/// their label, linked `previous -> name_rep1 -> ... -> name_repN -> next`.
fn build_repetition(
    automaton: &mut Automaton,
    previous: &str,
    next: &str,
    segment: &str,
) -> Result<(), GrammarError> {
    let (name, count) = tokens::parse_repetition(segment)?;

    let mut tail = previous.to_string();
    for step in 1..=count {
        let link = State::repetition_step(&name, step);
        let link_id = link.id().to_string();
        automaton.insert_state(link);
        automaton.add_edge(&tail, &link_id);
        tail = link_id;
    }
    automaton.add_edge(&tail, next);

    debug!(name, count, "repetition chain unrolled");
    Ok(())
}

/// `.*`: one wildcard state wired from `previous`, to every non-final
/// state known so far, to itself, and to `next`. Events it absorbs at
/// validation time grow the graph on demand.
fn build_wildcard(automaton: &mut Automaton, previous: &str, next: &str) {
    let wildcard = automaton.get_or_create(crate::core::WILDCARD_TOKEN, false);
    automaton.add_edge(previous, &wildcard);

    let known: Vec<StateId> = automaton
        .states_iter()
        .filter(|state| !state.is_final() && state.id() != previous && state.id() != wildcard)
        .map(|state| state.id().to_string())
        .collect();
    for id in &known {
        automaton.add_edge(&wildcard, id);
    }

    automaton.add_edge(&wildcard, &wildcard);
    automaton.add_edge(&wildcard, next);

    debug!(seeded = known.len(), "wildcard state wired");
}

/// Parse the `[final:...]` clause into the post-final rule of the declared
/// final state. The clause must name that state, followed by `:` and
/// either `+` or a comma-separated allow-list.
fn attach_post_final(
    automaton: &mut Automaton,
    final_id: &str,
    clause: &str,
) -> Result<(), GrammarError> {
    let rest = clause
        .strip_prefix(final_id)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| GrammarError::BadFinalClause {
            clause: clause.to_string(),
            expected: final_id.to_string(),
        })?
        .trim();

    let rule = if rest == "+" {
        PostFinalRule::AcceptAny
    } else {
        PostFinalRule::Allowed(rest.split(',').map(|name| name.trim().to_string()).collect())
    };
    automaton.set_post_final_rule(final_id, rule);
    Ok(())
}
