//! Round results and the append-only session log.

use crate::gesture::Gesture;
use crate::outcome::Winner;
use serde::{Deserialize, Serialize};

/// The outcome of one completed round, kept only as the "last result" for
/// display. Constructed exclusively by the turn controller from two concrete
/// gestures and a winner computed by the outcome rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub user: Gesture,
    pub computer: Gesture,
    pub winner: Winner,
}

/// One immutable line of the session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Strictly increasing per session; derived from the creation timestamp
    /// in milliseconds.
    pub id: i64,
    pub user: Gesture,
    pub computer: Gesture,
    pub winner: Winner,
}

/// Append-only, in-memory record of completed rounds.
///
/// Insertion order is chronological; rendering iterates most recent first.
/// Entries are never removed or deduplicated, bounded only by the session's
/// lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completed round. O(1) amortized.
    ///
    /// Entry ids follow the wall clock but are bumped when two rounds finish
    /// within the same millisecond, so they stay strictly increasing.
    pub fn append(&mut self, user: Gesture, computer: Gesture, winner: Winner) -> &LogEntry {
        let now = chrono::Utc::now().timestamp_millis();
        let id = match self.entries.last() {
            Some(last) if now <= last.id => last.id + 1,
            _ => now,
        };
        self.entries.push(LogEntry {
            id,
            user,
            computer,
            winner,
        });
        // Safe to unwrap because we just pushed an element
        self.entries.last().unwrap()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chronological view, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Display order: most recently appended entry first.
    pub fn iter_recent(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = SessionLog::new();
        log.append(Gesture::Rock, Gesture::Scissors, Winner::User);
        log.append(Gesture::Paper, Gesture::Paper, Winner::Tie);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].user, Gesture::Rock);
        assert_eq!(log.entries()[1].user, Gesture::Paper);
    }

    #[test]
    fn ids_are_strictly_increasing_even_within_one_millisecond() {
        let mut log = SessionLog::new();
        for _ in 0..50 {
            log.append(Gesture::Rock, Gesture::Rock, Winner::Tie);
        }
        let ids: Vec<i64> = log.entries().iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn recent_iteration_is_reverse_chronological() {
        let mut log = SessionLog::new();
        log.append(Gesture::Rock, Gesture::Scissors, Winner::User);
        log.append(Gesture::Scissors, Gesture::Rock, Winner::Computer);

        let recent: Vec<_> = log.iter_recent().collect();
        assert_eq!(recent[0].winner, Winner::Computer);
        assert_eq!(recent[1].winner, Winner::User);
    }
}
