//! Bounded FIFO window of raw counts

use std::collections::VecDeque;

/// Default history capacity (5 samples = 5s at 1Hz)
pub const DEFAULT_CAPACITY: usize = 5;

/// Fixed-capacity window of the most recent raw counts.
///
/// Values are kept in arrival order; pushing into a full window evicts the
/// oldest value.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<u32>,
    capacity: usize,
}

impl History {
    /// Create an empty history. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a history with default capacity (5 samples)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a count, returning the evicted one if the window was full
    pub fn push(&mut self, count: u32) -> Option<u32> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(count);
        evicted
    }

    /// Whether any stored count saw at least one face
    pub fn has_face(&self) -> bool {
        self.samples.iter().any(|&count| count >= 1)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    /// Most recent count
    pub fn latest(&self) -> Option<u32> {
        self.samples.back().copied()
    }

    /// Get the number of counts currently stored
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the history capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the stored counts, oldest first
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_read() {
        let mut history = History::new(5);
        for count in [1, 0, 2] {
            assert_eq!(history.push(count), None);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![1, 0, 2]);
        assert_eq!(history.latest(), Some(2));
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut history = History::new(5);
        for count in 0..5 {
            history.push(count);
        }

        assert_eq!(history.push(5), Some(0));
        assert_eq!(history.push(6), Some(1));
        assert_eq!(history.to_vec(), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_has_face() {
        let mut history = History::default();
        assert!(!history.has_face());

        history.push(0);
        history.push(0);
        assert!(!history.has_face());

        history.push(2);
        assert!(history.has_face());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut history = History::new(0);
        history.push(1);
        history.push(0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.to_vec(), vec![0]);
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push(1);
        history.clear();
        assert!(history.is_empty());
    }

    proptest! {
        #[test]
        fn prop_length_never_exceeds_capacity(
            capacity in 1usize..10,
            counts in proptest::collection::vec(0u32..4, 0..50),
        ) {
            let mut history = History::new(capacity);
            for &count in &counts {
                history.push(count);
                prop_assert!(history.len() <= capacity);
            }

            prop_assert_eq!(history.len(), counts.len().min(capacity));
            let tail: Vec<u32> = counts[counts.len().saturating_sub(capacity)..].to_vec();
            prop_assert_eq!(history.to_vec(), tail);
        }
    }
}
