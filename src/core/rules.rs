//! Post-final rules: what may still happen after a final state is reached.
//!
//! A pattern's trailing `[final:...]` clause compiles into one of these
//! rules, attached to the declared final state. Events accepted under a
//! rule never move the cursor; the sequence stays complete.

/// Policy for events arriving once the declared final state holds the
/// cursor.
///
/// # Example
///
/// ```rust
/// use methodical::core::PostFinalRule;
///
/// let open = PostFinalRule::AcceptAny;
/// assert!(open.allows("anything"));
///
/// let listed = PostFinalRule::Allowed(vec!["flush".into(), "close".into()]);
/// assert!(listed.allows("close"));
/// assert!(!listed.allows("reopen"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostFinalRule {
    /// `[final:+]`: every event is absorbed.
    AcceptAny,
    /// `[final:a,b,...]`: only the listed event names are absorbed.
    Allowed(Vec<String>),
}

impl PostFinalRule {
    /// Whether `event` is absorbed under this rule.
    pub fn allows(&self, event: &str) -> bool {
        match self {
            Self::AcceptAny => true,
            Self::Allowed(names) => names.iter().any(|name| name == event),
        }
    }
}
