//! Lexical handling of pattern text.
//!
//! Splits pattern text into segments, classifies each segment by the
//! operator it carries, and normalizes tokens by stripping grouping
//! characters. Classification is ordered: a segment with both `&` and `|`
//! dispatches on whichever operator appears first, `&` beats repetition
//! syntax, and repetition syntax beats `|`.

use crate::core::WILDCARD_TOKEN;
use crate::grammar::error::GrammarError;

/// Separator for the explicit sequence form `a -> b`.
pub(crate) const ARROW: &str = "->";

/// Whether the pattern uses the arrow form. Decided on the whole pattern,
/// so a single arrow anywhere switches every separator to `->`.
pub(crate) fn uses_arrow(pattern: &str) -> bool {
    pattern.contains(ARROW)
}

/// Split off the trailing `[...]` clause.
///
/// Returns the pattern body and, when a `[` is present, the clause text
/// with brackets removed and whitespace trimmed. Only the first bracketed
/// chunk is honored; anything after a second `[` is ignored.
pub(crate) fn split_bracket_clause(pattern: &str) -> (&str, Option<String>) {
    match pattern.find('[') {
        None => (pattern, None),
        Some(at) => {
            let body = &pattern[..at];
            let rest = &pattern[at + 1..];
            let chunk = rest.split('[').next().unwrap_or("");
            let clause = chunk.replace(']', "");
            (body, Some(clause.trim().to_string()))
        }
    }
}

/// Split the pattern body into trimmed, non-empty segments using the
/// separator regime chosen for the whole pattern.
pub(crate) fn split_segments(body: &str, arrow: bool) -> Vec<&str> {
    if arrow {
        body.split(ARROW)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        body.split_whitespace().collect()
    }
}

/// Remove grouping characters `(`, `)`, `{`, `}` and trim the remainder.
///
/// Applied both to pattern tokens at compile time and to incoming events
/// at validation time, so the two sides normalize identically.
pub(crate) fn strip_grouping(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '(' | ')' | '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// How a segment is built into the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Both operators, `|` first: alternation is outermost.
    MixedOrFirst,
    /// Both operators, `&` first: conjunction is outermost.
    MixedAndFirst,
    /// Only `&`.
    Conjunction,
    /// Looks like `(name){n}` repetition syntax.
    Repetition,
    /// Only `|`.
    Alternation,
    /// The literal wildcard token `.*`.
    Wildcard,
    /// Plain whitespace-separated tokens.
    Atoms,
}

/// Classify a trimmed segment. The checks run in precedence order; the
/// first that applies wins.
pub(crate) fn classify(segment: &str) -> SegmentKind {
    let or_at = segment.find('|');
    let and_at = segment.find('&');
    if let (Some(or_at), Some(and_at)) = (or_at, and_at) {
        return if or_at < and_at {
            SegmentKind::MixedOrFirst
        } else {
            SegmentKind::MixedAndFirst
        };
    }
    if and_at.is_some() {
        return SegmentKind::Conjunction;
    }
    if looks_like_repetition(segment) {
        return SegmentKind::Repetition;
    }
    if or_at.is_some() {
        return SegmentKind::Alternation;
    }
    if segment == WILDCARD_TOKEN {
        return SegmentKind::Wildcard;
    }
    SegmentKind::Atoms
}

/// Whether the segment contains a `{digits}` group anywhere.
fn looks_like_repetition(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b'}' {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// Parse a full `(name){count}` segment.
///
/// The name is everything between the outer parentheses (it may itself
/// contain operators; they are kept verbatim) and the count must be all
/// digits. Anything else is a [`GrammarError::BadRepetition`].
pub(crate) fn parse_repetition(segment: &str) -> Result<(String, usize), GrammarError> {
    let bad = || GrammarError::BadRepetition {
        segment: segment.to_string(),
    };

    let rest = segment.strip_prefix('(').ok_or_else(bad)?;
    let close = rest.find(')').ok_or_else(bad)?;
    let name = rest[..close].trim();
    if name.is_empty() {
        return Err(bad());
    }

    let count_part = rest[close + 1..]
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .ok_or_else(bad)?;
    if count_part.is_empty() || !count_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let count = count_part.parse::<usize>().map_err(|_| bad())?;

    Ok((name.to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_detection_looks_at_whole_pattern() {
        assert!(uses_arrow("a -> b"));
        assert!(uses_arrow("a b -> c"));
        assert!(!uses_arrow("a b c"));
    }

    #[test]
    fn whitespace_and_arrow_splitting_agree() {
        assert_eq!(split_segments("a b c", false), ["a", "b", "c"]);
        assert_eq!(split_segments("a -> b -> c", true), ["a", "b", "c"]);
        assert_eq!(split_segments("  a   ->   b  ", true), ["a", "b"]);
        assert_eq!(split_segments("", false), Vec::<&str>::new());
    }

    #[test]
    fn bracket_clause_is_split_off_and_unwrapped() {
        let (body, clause) = split_bracket_clause("a -> b [b:+]");
        assert_eq!(body, "a -> b ");
        assert_eq!(clause.as_deref(), Some("b:+"));

        let (body, clause) = split_bracket_clause("a b");
        assert_eq!(body, "a b");
        assert!(clause.is_none());
    }

    #[test]
    fn only_first_bracket_chunk_counts() {
        let (body, clause) = split_bracket_clause("a -> b [b:+] [ignored]");
        assert_eq!(body, "a -> b ");
        assert_eq!(clause.as_deref(), Some("b:+"));
    }

    #[test]
    fn grouping_characters_are_stripped() {
        assert_eq!(strip_grouping("(init)"), "init");
        assert_eq!(strip_grouping("{x}"), "x");
        assert_eq!(strip_grouping("( a )"), "a");
        assert_eq!(strip_grouping("plain"), "plain");
        assert_eq!(strip_grouping("()"), "");
    }

    #[test]
    fn classification_follows_operator_precedence() {
        assert_eq!(classify("a | b & c"), SegmentKind::MixedOrFirst);
        assert_eq!(classify("a & b | c"), SegmentKind::MixedAndFirst);
        assert_eq!(classify("a & b"), SegmentKind::Conjunction);
        assert_eq!(classify("(rep){3}"), SegmentKind::Repetition);
        assert_eq!(classify("a | b"), SegmentKind::Alternation);
        assert_eq!(classify(".*"), SegmentKind::Wildcard);
        assert_eq!(classify("start"), SegmentKind::Atoms);
    }

    #[test]
    fn conjunction_wins_over_repetition_syntax() {
        assert_eq!(classify("(a&b){2}"), SegmentKind::Conjunction);
    }

    #[test]
    fn repetition_syntax_wins_over_alternation() {
        assert_eq!(classify("(a|b){2}"), SegmentKind::Repetition);
    }

    #[test]
    fn repetition_parses_name_and_count() {
        assert_eq!(parse_repetition("(rep){2}").unwrap(), ("rep".into(), 2));
        assert_eq!(parse_repetition("( x ){10}").unwrap(), ("x".into(), 10));
    }

    #[test]
    fn malformed_repetitions_are_rejected() {
        for segment in ["rep{2}", "(rep)", "(rep){}", "(rep){a}", "(){2}", "(a)b){2}"] {
            assert!(
                matches!(
                    parse_repetition(segment),
                    Err(GrammarError::BadRepetition { .. })
                ),
                "{segment} should not parse"
            );
        }
    }

    #[test]
    fn repetition_probe_requires_digits_inside_braces() {
        assert!(looks_like_repetition("(a){2}"));
        assert!(looks_like_repetition("x{10}y"));
        assert!(!looks_like_repetition("x{}y"));
        assert!(!looks_like_repetition("x{a}y"));
        assert!(!looks_like_repetition("plain"));
    }
}
