//! Hysteresis correction for dropped frames

use tracing::trace;

use crate::History;

/// Smooths raw per-frame counts against recent history.
///
/// A zero right after frames that saw a face is read as a detector miss
/// and reported as one face. Counts above zero pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TemporalSmoother {
    history: History,
}

impl TemporalSmoother {
    /// Create a smoother remembering `capacity` raw counts
    pub fn new(capacity: usize) -> Self {
        Self {
            history: History::new(capacity),
        }
    }

    /// Record `raw_count` and return the smoothed count for this frame.
    ///
    /// The recent window is the history as it stood before this frame.
    pub fn update(&mut self, raw_count: u32) -> u32 {
        let recent_face = self.history.has_face();
        self.history.push(raw_count);

        if raw_count == 0 && recent_face {
            trace!("Treating empty frame as a miss: history={:?}", self.history.to_vec());
            1
        } else {
            raw_count
        }
    }

    /// Raw counts seen so far, oldest first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn primed(counts: &[u32]) -> TemporalSmoother {
        let mut smoother = TemporalSmoother::new(5);
        for &count in counts {
            smoother.update(count);
        }
        smoother
    }

    #[test]
    fn test_recent_face_masks_dropout() {
        let mut smoother = primed(&[1, 0, 0, 0, 0]);
        assert_eq!(smoother.history().to_vec(), vec![1, 0, 0, 0, 0]);
        assert_eq!(smoother.update(0), 1);
    }

    #[test]
    fn test_no_recent_face_reports_absence() {
        let mut smoother = primed(&[0, 0, 0, 0, 0]);
        assert_eq!(smoother.update(0), 0);
    }

    #[test]
    fn test_empty_history_reports_absence() {
        let mut smoother = TemporalSmoother::new(5);
        assert_eq!(smoother.update(0), 0);
    }

    #[test]
    fn test_single_face_masks_five_dropouts() {
        let mut smoother = primed(&[1]);
        let smoothed: Vec<u32> = (0..6).map(|_| smoother.update(0)).collect();
        assert_eq!(smoothed, vec![1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_multiple_faces_pass_through() {
        let mut smoother = primed(&[1, 1]);
        assert_eq!(smoother.update(2), 2);
        assert_eq!(smoother.update(3), 3);
    }

    #[test]
    fn test_raw_counts_are_stored() {
        let mut smoother = primed(&[1]);
        smoother.update(0);
        assert_eq!(smoother.history().to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_reset_forgets_faces() {
        let mut smoother = primed(&[1, 1]);
        smoother.reset();
        assert_eq!(smoother.update(0), 0);
    }

    proptest! {
        #[test]
        fn prop_only_upgrades_zero_to_one(
            counts in proptest::collection::vec(0u32..4, 1..40),
        ) {
            let mut smoother = TemporalSmoother::new(5);
            for &raw in &counts {
                let smoothed = smoother.update(raw);
                if raw == 0 {
                    prop_assert!(smoothed <= 1);
                } else {
                    prop_assert_eq!(smoothed, raw);
                }
                prop_assert!(smoother.history().len() <= 5);
            }
        }
    }
}
