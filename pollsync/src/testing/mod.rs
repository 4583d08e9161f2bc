//! Testing utilities for pollsync.

use crate::poll::PollSnapshot;

/// Build a snapshot from `(key, label, votes)` triples, for testing purposes.
pub fn snapshot(
    id: &str,
    question: &str,
    options: &[(&str, &str, u64)],
) -> PollSnapshot {
    options
        .iter()
        .fold(PollSnapshot::new(id, question), |s, (key, label, votes)| {
            s.with_option(key, label, *votes)
        })
}

/// A two option poll `{a:3, b:1}` with id `p1`.
pub fn poll_p1() -> PollSnapshot {
    snapshot("p1", "Tabs or spaces?", &[("a", "Tabs", 3), ("b", "Spaces", 1)])
}
