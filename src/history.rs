use log::trace;
use std::collections::VecDeque;

/// Default number of commands remembered by a session.
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded, order-preserving record of raw command lines.
///
/// Behaves as a sliding window over the most recent `capacity` lines: pushing
/// into a full buffer evicts the oldest line first. Display indices are
/// 1-based, counted from the oldest retained line, and recomputed from the
/// current contents every time they are requested.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` lines.
    ///
    /// A zero capacity is bumped to one so that a recalled line can always be
    /// recorded.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a copy of `line`, evicting the oldest entry when full.
    pub fn push(&mut self, line: &str) {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!("history full, evicting {:?}", evicted);
            }
        }
        self.entries.push_back(line.to_owned());
    }

    /// Line with display index `n`, or `None` when `n` is outside `[1, len]`.
    pub fn lookup(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// `(display_index, line)` pairs, most recent first.
    pub fn print(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map(|(i, line)| (i + 1, line.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_one_based_from_oldest() {
        let mut history = History::default();
        history.push("ls");
        history.push("pwd");
        assert_eq!(history.lookup(1), Some("ls"));
        assert_eq!(history.lookup(2), Some("pwd"));
        assert_eq!(history.lookup(0), None);
        assert_eq!(history.lookup(3), None);
    }

    #[test]
    fn test_push_past_capacity_evicts_oldest() {
        let mut history = History::default();
        for i in 1..=51 {
            history.push(&format!("line {}", i));
        }
        assert_eq!(history.len(), DEFAULT_CAPACITY);
        assert_eq!(history.lookup(1), Some("line 2"));
        assert_eq!(history.lookup(50), Some("line 51"));
    }

    #[test]
    fn test_print_is_reverse_chronological_and_restartable() {
        let mut history = History::with_capacity(3);
        for line in ["a", "b", "c", "d"] {
            history.push(line);
        }
        let listed: Vec<_> = history.print().collect();
        assert_eq!(listed, vec![(3, "d"), (2, "c"), (1, "b")]);
        assert_eq!(history.print().collect::<Vec<_>>(), listed);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut history = History::default();
        history.push("echo hi");
        history.push("echo hi");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_records_latest() {
        let mut history = History::with_capacity(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.lookup(1), Some("b"));
    }
}
