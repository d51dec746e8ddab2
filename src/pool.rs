//! Growable pool of reusable, slot-stable objects.

use std::collections::BTreeSet;

/// Hooks a pooled object provides.
pub trait Poolable {
    /// Construct a fresh (free) object.
    fn new_obj() -> Self
    where
        Self: Sized;

    /// Called once when the object is placed at `index`.
    fn setup(&mut self, _index: usize) {}

    /// Called before the object is dropped by a shrinking `resize`.
    fn reset(&mut self) {}

    fn is_free(&self) -> bool;

    /// Return the object to the free state.
    fn release(&mut self);
}

/// Dense storage plus an ordered set of candidate free indices.
///
/// Free indices are validated lazily against `is_free()`: a slot handed out by
/// `next_free` stays in the set until the caller claims it, so callers must
/// claim a slot right away or they will be handed the same one again. The
/// lowest free index is always handed out first.
pub struct Pool<E> {
    items: Vec<E>,
    free: BTreeSet<usize>,
    grow_step: usize,
}

impl<E: Poolable> Pool<E> {
    pub fn new(grow_step: usize) -> Self {
        Self {
            items: Vec::new(),
            free: BTreeSet::new(),
            grow_step: grow_step.max(1),
        }
    }

    pub fn with_capacity(cap: usize, grow_step: usize) -> Self {
        let mut pool = Self::new(grow_step);
        pool.init(cap);
        pool
    }

    pub fn init(&mut self, cap: usize) {
        self.resize(cap);
    }

    /// Grow with fresh objects or shrink by resetting and dropping trailing slots.
    pub fn resize(&mut self, cap: usize) {
        let old = self.items.len();
        if cap > old {
            self.items.reserve(cap - old);
            for i in old..cap {
                let mut e = E::new_obj();
                e.setup(i);
                self.items.push(e);
            }
        } else {
            for e in &mut self.items[cap..] {
                e.reset();
            }
            self.items.truncate(cap);
        }
        self.rebuild_free();
        if cap != old {
            log::debug!("pool resized {} -> {}", old, cap);
        }
    }

    fn rebuild_free(&mut self) {
        self.free.clear();
        self.free
            .extend((0..self.items.len()).filter(|&i| self.items[i].is_free()));
    }

    /// Lowest free slot, if any. Does not claim it.
    pub fn next_free(&mut self) -> Option<usize> {
        while let Some(&first) = self.free.first() {
            if first < self.items.len() && self.items[first].is_free() {
                return Some(first);
            }
            // Claimed since it was queued.
            self.free.remove(&first);
        }
        None
    }

    /// Index of a free slot, growing by `grow_step` when none is left.
    pub fn next_free_extra(&mut self) -> usize {
        loop {
            if let Some(i) = self.next_free() {
                return i;
            }
            let cap = self.items.len() + self.grow_step;
            self.resize(cap);
        }
    }

    /// `next_free_extra` with the slot borrowed for claiming.
    pub fn next_free_extra_mut(&mut self) -> (usize, &mut E) {
        let i = self.next_free_extra();
        (i, &mut self.items[i])
    }

    /// Release a live slot. Returns false if it was already free.
    pub fn release(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(e) if !e.is_free() => {
                e.release();
                self.free.insert(index);
                true
            }
            _ => false,
        }
    }

    /// Release every live slot.
    pub fn clear(&mut self) {
        for e in &mut self.items {
            if !e.is_free() {
                e.release();
            }
        }
        self.rebuild_free();
    }

    /// Number of slots, free or not.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn count_live(&self) -> usize {
        self.items.iter().filter(|e| !e.is_free()).count()
    }

    /// True when no slot is live.
    pub fn is_dormant(&self) -> bool {
        self.items.iter().all(|e| e.is_free())
    }

    /// Slot at `index`, live or free.
    pub fn slot(&self, index: usize) -> Option<&E> {
        self.items.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut E> {
        self.items.get_mut(index)
    }

    /// Live object at `index`.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.items.get(index).filter(|e| !e.is_free())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.items.get_mut(index).filter(|e| !e.is_free())
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Live objects with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &E)> {
        self.items.iter().enumerate().filter(|(_, e)| !e.is_free())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut E)> {
        self.items.iter_mut().enumerate().filter(|(_, e)| !e.is_free())
    }

    /// Two distinct slots borrowed mutably at once.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut E, &mut E) {
        assert_ne!(i, j, "pair_mut needs two distinct slots");
        if i < j {
            let (lo, hi) = self.items.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.items.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Slot {
        index: usize,
        live: bool,
        resets: usize,
    }

    impl Poolable for Slot {
        fn new_obj() -> Self {
            Self::default()
        }

        fn setup(&mut self, index: usize) {
            self.index = index;
        }

        fn reset(&mut self) {
            self.resets += 1;
        }

        fn is_free(&self) -> bool {
            !self.live
        }

        fn release(&mut self) {
            self.live = false;
        }
    }

    fn claim(pool: &mut Pool<Slot>) -> usize {
        let i = pool.next_free_extra();
        pool.slot_mut(i).unwrap().live = true;
        i
    }

    #[test]
    fn test_init_runs_setup_hook() {
        let pool: Pool<Slot> = Pool::with_capacity(4, 5);
        assert_eq!(pool.capacity(), 4);
        for i in 0..4 {
            assert_eq!(pool.slot(i).unwrap().index, i);
        }
        assert!(pool.is_dormant());
    }

    #[test]
    fn test_next_free_returns_same_slot_until_claimed() {
        let mut pool: Pool<Slot> = Pool::with_capacity(2, 5);
        assert_eq!(pool.next_free(), Some(0));
        assert_eq!(pool.next_free(), Some(0));
        pool.slot_mut(0).unwrap().live = true;
        assert_eq!(pool.next_free(), Some(1));
    }

    #[test]
    fn test_next_free_none_when_full() {
        let mut pool: Pool<Slot> = Pool::with_capacity(1, 5);
        claim(&mut pool);
        assert_eq!(pool.next_free(), None);
    }

    #[test]
    fn test_next_free_extra_grows_by_step() {
        let mut pool: Pool<Slot> = Pool::with_capacity(10, 5);
        let ids: Vec<usize> = (0..15).map(|_| claim(&mut pool)).collect();
        assert_eq!(ids, (0..15).collect::<Vec<_>>());
        assert_eq!(pool.capacity(), 15);
        claim(&mut pool);
        assert_eq!(pool.capacity(), 20);
        assert_eq!(pool.count_live(), 16);
    }

    #[test]
    fn test_release_recycles_slot() {
        let mut pool: Pool<Slot> = Pool::with_capacity(3, 5);
        for _ in 0..3 {
            claim(&mut pool);
        }
        assert!(pool.release(1));
        assert!(!pool.release(1));
        assert_eq!(claim(&mut pool), 1);
        assert_eq!(pool.capacity(), 3);
    }

    #[test]
    fn test_reuses_lowest_free_slot() {
        let mut pool: Pool<Slot> = Pool::with_capacity(5, 5);
        for _ in 0..5 {
            claim(&mut pool);
        }
        pool.release(1);
        pool.release(3);
        assert_eq!(claim(&mut pool), 1);
        assert_eq!(claim(&mut pool), 3);
        assert_eq!(pool.capacity(), 5);
    }

    #[test]
    fn test_free_set_bounded_under_churn() {
        let mut pool: Pool<Slot> = Pool::with_capacity(10, 5);
        claim(&mut pool);
        for _ in 0..10_000 {
            let i = claim(&mut pool);
            assert!(pool.release(i));
            assert!(pool.free.len() <= pool.capacity());
        }
        assert_eq!(pool.capacity(), 10);
        assert_eq!(pool.count_live(), 1);
    }

    #[test]
    fn test_shrink_calls_reset_hook() {
        let mut pool: Pool<Slot> = Pool::with_capacity(6, 5);
        claim(&mut pool);
        pool.resize(2);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.count_live(), 1);
        assert_eq!(pool.next_free(), Some(1));
    }

    #[test]
    fn test_clear_and_iter() {
        let mut pool: Pool<Slot> = Pool::with_capacity(4, 5);
        claim(&mut pool);
        claim(&mut pool);
        assert_eq!(pool.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![0, 1]);
        pool.clear();
        assert!(pool.is_dormant());
        assert_eq!(pool.next_free(), Some(0));
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut pool: Pool<Slot> = Pool::with_capacity(3, 5);
        let (a, b) = pool.pair_mut(2, 0);
        assert_eq!((a.index, b.index), (2, 0));
        let (a, b) = pool.pair_mut(0, 2);
        assert_eq!((a.index, b.index), (0, 2));
    }
}
