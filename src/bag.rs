//! Sparse inventory keyed by item id
//!
//! The save file stores the bag as 200 `(item, count)` slots inside the base record.
//! In memory it is a map that never holds a zero or negative count.

use crate::records::{BaseInfo, BAG_SLOTS};
use indexmap::IndexMap;
use log::{debug, warn};

/// Largest count a single bag entry can hold on disk
pub const MAX_STACK: i32 = i16::MAX as i32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bag {
    items: IndexMap<i16, i32>,
    /// Size of the item catalog; ids outside `[0, item_count)` are rejected
    item_count: i16,
}

impl Bag {
    pub fn new(item_count: usize) -> Self {
        Bag {
            items: IndexMap::new(),
            item_count: item_count.min(i16::MAX as usize) as i16,
        }
    }

    fn valid_id(&self, id: i16) -> bool {
        (0..self.item_count).contains(&id)
    }

    pub fn count(&self, id: i16) -> i32 {
        self.items.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: i16) -> bool {
        self.count(id) > 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in acquisition order
    pub fn iter(&self) -> impl Iterator<Item = (i16, i32)> + '_ {
        self.items.iter().map(|(&id, &count)| (id, count))
    }

    /// Merge `count` (possibly negative) into the entry for `id`, dropping it at zero or below
    pub fn add(&mut self, id: i16, count: i32) {
        if !self.valid_id(id) {
            debug!("bag add ignored for out-of-range item {}", id);
            return;
        }
        let total = (self.count(id) + count).min(MAX_STACK);
        if total <= 0 {
            self.items.shift_remove(&id);
        } else if let Some(entry) = self.items.get_mut(&id) {
            *entry = total;
        } else if self.items.len() >= BAG_SLOTS {
            warn!("bag full, item {} not added", id);
        } else {
            self.items.insert(id, total);
        }
    }

    /// Take `count` of `id` out. Fails without touching the bag when not enough is held.
    pub fn remove(&mut self, id: i16, count: i32) -> bool {
        if count <= 0 {
            return true;
        }
        if !self.valid_id(id) || self.count(id) < count {
            return false;
        }
        self.add(id, -count);
        true
    }

    /// Build from the base record slots
    pub fn from_base(base: &BaseInfo, item_count: usize) -> Self {
        let mut bag = Bag::new(item_count);
        for &[id, count] in base.bag.iter() {
            if id >= 0 && count > 0 {
                bag.add(id, count as i32);
            }
        }
        bag
    }

    /// Write back into the base record slots, unused slots set to empty
    pub fn store_into(&self, base: &mut BaseInfo) {
        base.bag = [[-1, 0]; BAG_SLOTS];
        for (slot, (id, count)) in base.bag.iter_mut().zip(self.iter()) {
            *slot = [id, count as i16];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_counts_positive(bag: &Bag) {
        for (_, count) in bag.iter() {
            assert!(count > 0);
        }
    }

    #[test]
    fn test_add_merges_and_drops_at_zero() {
        let mut bag = Bag::new(100);
        bag.add(5, 3);
        bag.add(5, 2);
        assert_eq!(bag.count(5), 5);
        bag.add(5, -5);
        assert!(!bag.contains(5));
        assert!(bag.is_empty());
        bag.add(6, -3);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut bag = Bag::new(100);
        bag.add(9, 2);
        assert!(!bag.remove(9, 3));
        assert_eq!(bag.count(9), 2);
        assert!(bag.remove(9, 2));
        assert_eq!(bag.count(9), 0);
        assert!(!bag.remove(150, 1));
        assert!(bag.remove(9, 0));
    }

    #[test]
    fn test_out_of_range_ids_ignored() {
        let mut bag = Bag::new(10);
        bag.add(10, 1);
        bag.add(-1, 1);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_counts_stay_positive_over_mixed_sequence() {
        let mut bag = Bag::new(20);
        let ops: [(i16, i32); 8] = [(1, 4), (2, 1), (1, -2), (3, 7), (2, -1), (1, -9), (3, 1), (4, 0)];
        for (id, count) in ops {
            if count >= 0 {
                bag.add(id, count);
            } else {
                bag.remove(id, -count);
            }
            assert_counts_positive(&bag);
        }
        assert_eq!(bag.count(1), 2);
        assert_eq!(bag.count(3), 8);
        assert!(!bag.contains(2));
        assert!(!bag.contains(4));
    }

    #[test]
    fn test_base_slots_round_trip_in_order() {
        let mut bag = Bag::new(50);
        bag.add(30, 1);
        bag.add(2, 400);
        let mut base = BaseInfo::blank();
        bag.store_into(&mut base);
        assert_eq!(base.bag[0], [30, 1]);
        assert_eq!(base.bag[1], [2, 400]);
        assert_eq!(base.bag[2], [-1, 0]);
        assert_eq!(Bag::from_base(&base, 50), bag);
    }
}
