//! Bounded memory of object providers the host has already asked about.
//!
//! The host sometimes re-queries the same object while its child strings
//! have moved underneath, and the only symptom visible to the engine is an
//! identical `(address, child count)` pair arriving again. The tracker
//! reports such repeats so the session can drop the string-read cache.

use std::collections::VecDeque;

use crate::types::Address;

/// LRU set of `(address, child count)` pairs with a fixed capacity.
#[derive(Debug)]
pub struct RevisitTracker
{
    capacity: usize,
    seen: VecDeque<(Address, usize)>,
}

impl RevisitTracker
{
    /// Create a tracker remembering at most `capacity` pairs (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self
    {
        let capacity = capacity.max(1);
        Self {
            capacity,
            seen: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a sighting of `(address, count)`.
    ///
    /// Returns `true` when the pair was already remembered, i.e. on the
    /// second and every later sighting. The pair becomes most recent either
    /// way; the least recent pair is forgotten once the tracker is full.
    pub fn observe(&mut self, address: Address, count: usize) -> bool
    {
        let key = (address, count);
        let revisit = match self.seen.iter().position(|entry| *entry == key) {
            Some(index) => {
                self.seen.remove(index);
                true
            }
            None => {
                if self.seen.len() == self.capacity {
                    self.seen.pop_front();
                }
                false
            }
        };
        self.seen.push_back(key);
        revisit
    }

    /// Number of remembered pairs.
    pub fn len(&self) -> usize
    {
        self.seen.len()
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool
    {
        self.seen.is_empty()
    }

    /// Forget every pair.
    pub fn reset(&mut self)
    {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_second_sighting_is_revisit()
    {
        let mut tracker = RevisitTracker::new(4);
        assert!(!tracker.observe(Address::new(0x100), 2));
        assert!(tracker.observe(Address::new(0x100), 2));
        assert!(tracker.observe(Address::new(0x100), 2));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_count_is_part_of_identity()
    {
        let mut tracker = RevisitTracker::new(4);
        assert!(!tracker.observe(Address::new(0x100), 2));
        assert!(!tracker.observe(Address::new(0x100), 3));
    }

    #[test]
    fn test_least_recent_pair_is_evicted()
    {
        let mut tracker = RevisitTracker::new(2);
        tracker.observe(Address::new(1), 0);
        tracker.observe(Address::new(2), 0);
        // Refresh 1 so that 2 is the oldest.
        tracker.observe(Address::new(1), 0);
        tracker.observe(Address::new(3), 0);

        assert_eq!(tracker.len(), 2);
        assert!(!tracker.observe(Address::new(2), 0));
    }

    #[test]
    fn test_zero_capacity_is_raised()
    {
        let mut tracker = RevisitTracker::new(0);
        assert!(!tracker.observe(Address::new(1), 1));
        assert!(tracker.observe(Address::new(1), 1));
    }
}
