//! Command history ring.
//!
//! Owned by the shell, which records each completed line; the line editor
//! only reads it.

use crate::{HISTORY_SIZE, MAX_LINE_LENGTH};
use alloc::string::String;
use alloc::vec::Vec;

/// Bounded ring of previously entered commands.
pub struct History {
    entries: Vec<String>,
    /// Slot the next entry is written to.
    write_pos: usize,
    count: usize,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(HISTORY_SIZE),
            write_pos: 0,
            count: 0,
        }
    }

    /// Records `line`.
    ///
    /// Empty lines and repeats of the newest entry are skipped. Returns true
    /// if the line was stored.
    pub fn push(&mut self, line: &str) -> bool {
        if line.is_empty() || self.last() == Some(line) {
            return false;
        }

        let mut entry = String::from(line);
        if entry.len() >= MAX_LINE_LENGTH {
            let mut end = MAX_LINE_LENGTH - 1;
            while !entry.is_char_boundary(end) {
                end -= 1;
            }
            entry.truncate(end);
        }

        if self.entries.len() < HISTORY_SIZE {
            self.entries.push(entry);
        } else {
            self.entries[self.write_pos] = entry;
        }
        self.write_pos = (self.write_pos + 1) % HISTORY_SIZE;
        self.count = (self.count + 1).min(HISTORY_SIZE);
        true
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The newest entry.
    pub fn last(&self) -> Option<&str> {
        self.recall(1)
    }

    /// The entry `back` steps into the past; 1 is the newest.
    pub fn recall(&self, back: usize) -> Option<&str> {
        if back == 0 || back > self.count {
            return None;
        }
        let index = (self.write_pos + HISTORY_SIZE - back) % HISTORY_SIZE;
        self.entries.get(index).map(String::as_str)
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (1..=self.count).rev().filter_map(move |back| self.recall(back))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recall_newest_first() {
        let mut history = History::new();
        assert_eq!(history.last(), None);

        history.push("ls");
        history.push("echo hi");
        assert_eq!(history.len(), 2);
        assert_eq!(history.recall(1), Some("echo hi"));
        assert_eq!(history.recall(2), Some("ls"));
        assert_eq!(history.recall(3), None);
        assert_eq!(history.recall(0), None);
    }

    #[test]
    fn test_full_ring_evicts_oldest() {
        let mut history = History::new();
        for i in 1..=HISTORY_SIZE + 1 {
            assert!(history.push(&format!("cmd{}", i)));
        }
        assert_eq!(history.len(), HISTORY_SIZE);
        assert_eq!(history.recall(HISTORY_SIZE), Some("cmd2"));
        assert_eq!(history.last(), Some("cmd21"));
        assert!(history.iter().all(|entry| entry != "cmd1"));

        let ordered: Vec<&str> = history.iter().collect();
        assert_eq!(ordered.first(), Some(&"cmd2"));
        assert_eq!(ordered.last(), Some(&"cmd21"));
    }

    #[test]
    fn test_duplicate_of_newest_is_skipped() {
        let mut history = History::new();
        for i in 0..HISTORY_SIZE {
            history.push(&format!("cmd{}", i));
        }
        assert!(!history.push("cmd19"));
        assert_eq!(history.len(), HISTORY_SIZE);
        assert_eq!(history.recall(HISTORY_SIZE), Some("cmd0"));

        // Only the newest entry counts as a duplicate.
        assert!(history.push("cmd5"));
        assert_eq!(history.last(), Some("cmd5"));
    }

    #[test]
    fn test_empty_lines_are_not_recorded() {
        let mut history = History::new();
        assert!(!history.push(""));
        assert!(history.is_empty());
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let mut history = History::new();
        let long = "x".repeat(MAX_LINE_LENGTH + 10);
        history.push(&long);
        assert_eq!(history.last().map(str::len), Some(MAX_LINE_LENGTH - 1));
    }
}
