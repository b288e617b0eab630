//! One-shot reveal tracking.
//!
//! Elements are observed until they first become sufficiently visible, at
//! which point they are revealed and stop being observed. Later visibility
//! changes, in either scroll direction, never fire again.

use std::collections::HashSet;
use std::hash::Hash;

/// Tracks which elements still await their first reveal.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    threshold: f64,
    observing: HashSet<K>,
    revealed: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RevealTracker<K> {
    /// Create a tracker that fires once `threshold` of an element is visible.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(f64::MIN_POSITIVE, 1.0),
            observing: HashSet::new(),
            revealed: HashSet::new(),
        }
    }

    /// Start observing an element. Already revealed elements are ignored.
    pub fn observe(&mut self, key: K) {
        if !self.revealed.contains(&key) {
            self.observing.insert(key);
        }
    }

    /// Report the visible fraction of an element.
    ///
    /// Returns `true` exactly once per element: on the first notification at
    /// or above the threshold. The element is unobserved at that point.
    pub fn notify(&mut self, key: &K, visible_ratio: f64) -> bool {
        if visible_ratio < self.threshold || !self.observing.remove(key) {
            return false;
        }
        self.revealed.insert(key.clone());
        true
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    pub fn is_observing(&self, key: &K) -> bool {
        self.observing.contains(key)
    }

    /// Number of elements still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.observing.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_on_first_entry() {
        let mut tracker = RevealTracker::new(0.1);
        tracker.observe(1u32);

        assert!(!tracker.notify(&1, 0.05));
        assert!(tracker.notify(&1, 0.5));
        assert!(tracker.is_revealed(&1));
        assert!(!tracker.is_observing(&1));

        // Leaving and re-entering the viewport does not fire again.
        assert!(!tracker.notify(&1, 0.0));
        assert!(!tracker.notify(&1, 1.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = RevealTracker::new(0.1);
        tracker.observe("card");
        assert!(tracker.notify(&"card", 0.1));
    }

    #[test]
    fn test_unobserved_never_fires() {
        let mut tracker: RevealTracker<u32> = RevealTracker::new(0.1);
        assert!(!tracker.notify(&7, 1.0));
        assert!(!tracker.is_revealed(&7));
    }

    #[test]
    fn test_observe_after_reveal_is_ignored() {
        let mut tracker = RevealTracker::new(0.1);
        tracker.observe(1u32);
        tracker.observe(2u32);
        assert_eq!(tracker.pending(), 2);

        assert!(tracker.notify(&1, 1.0));
        tracker.observe(1);
        assert_eq!(tracker.pending(), 1);
        assert!(!tracker.notify(&1, 1.0));
    }
}
