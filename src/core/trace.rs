//! Accepted-event trace of a validated sequence.
//!
//! Every accepted step is recorded as an immutable entry, so a completed
//! (or failed) sequence can be replayed for diagnostics. Rejected events
//! are never recorded; the trace is the accepted path only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::state::StateId;

/// Record of a single accepted step.
///
/// `from` and `to` are state ids; for events absorbed by a post-final rule
/// they are equal, since absorbed events do not move the cursor.
///
/// # Example
///
/// ```rust
/// use methodical::core::TraceEntry;
/// use chrono::Utc;
///
/// let entry = TraceEntry {
///     from: "INITIAL".into(),
///     to: "start".into(),
///     event: "start".into(),
///     at: Utc::now(),
/// };
/// assert_eq!(entry.from, "INITIAL");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceEntry {
    /// State id the cursor left.
    pub from: StateId,
    /// State id the cursor arrived at.
    pub to: StateId,
    /// The event as resolved for matching.
    pub event: String,
    /// When the step was accepted.
    pub at: DateTime<Utc>,
}

/// Ordered trace of accepted steps.
///
/// The trace is immutable: [`record`](ValidationTrace::record) returns a
/// new trace with the entry appended, leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use methodical::core::{TraceEntry, ValidationTrace};
/// use chrono::Utc;
///
/// let trace = ValidationTrace::new();
/// let trace = trace.record(TraceEntry {
///     from: "INITIAL".into(),
///     to: "start".into(),
///     event: "start".into(),
///     at: Utc::now(),
/// });
/// let trace = trace.record(TraceEntry {
///     from: "start".into(),
///     to: "end".into(),
///     event: "end".into(),
///     at: Utc::now(),
/// });
///
/// assert_eq!(trace.path(), ["INITIAL", "start", "end"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationTrace {
    entries: Vec<TraceEntry>,
}

impl ValidationTrace {
    /// Create a new empty trace.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a step, returning a new trace.
    ///
    /// Pure: the existing trace is not mutated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use methodical::core::{TraceEntry, ValidationTrace};
    /// use chrono::Utc;
    ///
    /// let trace = ValidationTrace::new();
    /// let longer = trace.record(TraceEntry {
    ///     from: "a".into(),
    ///     to: "b".into(),
    ///     event: "b".into(),
    ///     at: Utc::now(),
    /// });
    ///
    /// assert_eq!(trace.entries().len(), 0); // original unchanged
    /// assert_eq!(longer.entries().len(), 1);
    /// ```
    pub fn record(&self, entry: TraceEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// The state ids visited, in order: the first entry's origin, then the
    /// destination of every entry.
    ///
    /// Empty when nothing has been accepted yet.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.entries.first() {
            path.push(first.from.as_str());
        }
        for entry in &self.entries {
            path.push(entry.to.as_str());
        }
        path
    }

    /// Elapsed time between the first and last accepted step.
    ///
    /// `None` while the trace is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.at.signed_duration_since(first.at);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded entries in acceptance order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(from: &str, to: &str, event: &str) -> TraceEntry {
        TraceEntry {
            from: from.into(),
            to: to.into(),
            event: event.into(),
            at: Utc::now(),
        }
    }

    #[test]
    fn new_trace_is_empty() {
        let trace = ValidationTrace::new();
        assert!(trace.entries().is_empty());
        assert!(trace.path().is_empty());
        assert!(trace.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let trace = ValidationTrace::new();
        let longer = trace.record(entry("INITIAL", "start", "start"));

        assert_eq!(trace.entries().len(), 0);
        assert_eq!(longer.entries().len(), 1);
    }

    #[test]
    fn path_starts_with_first_origin() {
        let trace = ValidationTrace::new()
            .record(entry("INITIAL", "start", "start"))
            .record(entry("start", "process", "process"))
            .record(entry("process", "end", "end"));

        assert_eq!(trace.path(), ["INITIAL", "start", "process", "end"]);
    }

    #[test]
    fn absorbed_events_keep_from_and_to_equal() {
        let trace = ValidationTrace::new()
            .record(entry("INITIAL", "end", "end"))
            .record(entry("end", "end", "fun1"));

        assert_eq!(trace.path(), ["INITIAL", "end", "end"]);
        assert_eq!(trace.entries()[1].event, "fun1");
    }

    #[test]
    fn duration_spans_first_to_last() {
        let trace = ValidationTrace::new().record(entry("a", "b", "b"));
        assert_eq!(trace.duration(), Some(Duration::from_secs(0)));

        std::thread::sleep(Duration::from_millis(10));
        let trace = trace.record(entry("b", "c", "c"));
        assert!(trace.duration().unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn trace_serializes_to_json() {
        let trace = ValidationTrace::new().record(entry("INITIAL", "start", "start"));
        let json = serde_json::to_string(&trace).unwrap();
        let back: ValidationTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries().len(), 1);
        assert_eq!(back.entries()[0].to, "start");
    }
}
