//! Active pair records: one begin and one end event per overlap episode.

use fnv::FnvHashMap;
use glam::Vec2;

use crate::api::CollisionListener;
use crate::pool::{Pool, Poolable};
use crate::types::*;

/// Order-independent identity of a pair of bodies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairKey(BodyHandle, BodyHandle);

impl PairKey {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Pooled wrapper of a `Collision`.
#[derive(Clone, Debug)]
pub struct Entry {
    pub collision: Collision,
    /// The ordered direction whose check began this record.
    owner: (BodyHandle, BodyHandle),
    free: bool,
}

impl Entry {
    pub fn set(&mut self, a: BodyHandle, b: BodyHandle, contact: Contact) {
        self.collision = Collision { a, b, point: contact.point, normal: contact.normal };
        self.owner = (a, b);
        self.free = false;
    }

    /// True if this record holds `{a, b}` in either order.
    pub fn matches(&self, a: BodyHandle, b: BodyHandle) -> bool {
        !self.free && self.collision.involves(a, b)
    }

    pub fn owned_by(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.owner == (a, b)
    }
}

impl Poolable for Entry {
    fn new_obj() -> Self {
        let none = BodyHandle::new(ShapeKind::Aabb, 0);
        Self {
            collision: Collision { a: none, b: none, point: Vec2::ZERO, normal: Vec2::ZERO },
            owner: (none, none),
            free: true,
        }
    }

    fn is_free(&self) -> bool {
        self.free
    }

    fn release(&mut self) {
        self.free = true;
    }
}

/// Pair records stored in a pool and indexed by canonical key.
pub struct PairBook {
    entries: Pool<Entry>,
    index: FnvHashMap<PairKey, usize>,
}

impl PairBook {
    pub fn new(capacity: usize, grow_step: usize) -> Self {
        Self {
            entries: Pool::with_capacity(capacity, grow_step),
            index: FnvHashMap::default(),
        }
    }

    /// Feed one ordered check of `a` against `b`.
    ///
    /// Begins a record when the pair collides and none exists. Ends it when the
    /// pair no longer collides, but only from the direction that began it, so
    /// the reverse check in the same frame cannot cancel it. Returns the number
    /// of events emitted.
    pub fn track(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        contact: Option<Contact>,
        listener: &mut dyn CollisionListener,
    ) -> usize {
        let key = PairKey::new(a, b);
        match (self.index.get(&key).copied(), contact) {
            (None, Some(contact)) => {
                let slot = self.entries.next_free_extra();
                let Some(entry) = self.entries.slot_mut(slot) else {
                    return 0;
                };
                entry.set(a, b, contact);
                self.index.insert(key, slot);
                log::trace!("begin {:?} / {:?}", a, b);
                listener.begin_collision(&entry.collision);
                1
            }
            (Some(slot), None) => {
                let owned = self.entries.get(slot).is_some_and(|e| e.owned_by(a, b));
                if !owned {
                    return 0;
                }
                self.end(key, slot, listener);
                1
            }
            (Some(slot), Some(contact)) => {
                if let Some(entry) = self.entries.get_mut(slot) {
                    if entry.owned_by(a, b) {
                        entry.collision.point = contact.point;
                        entry.collision.normal = contact.normal;
                    }
                }
                0
            }
            (None, None) => 0,
        }
    }

    fn end(&mut self, key: PairKey, slot: usize, listener: &mut dyn CollisionListener) {
        self.index.remove(&key);
        if let Some(entry) = self.entries.get(slot) {
            log::trace!("end {:?} / {:?}", entry.collision.a, entry.collision.b);
            listener.end_collision(&entry.collision);
        }
        self.entries.release(slot);
    }

    /// End every record involving `body`. Returns the number of events emitted.
    pub fn end_all(&mut self, body: BodyHandle, listener: Option<&mut dyn CollisionListener>) -> usize {
        let doomed: Vec<(PairKey, usize)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.collision.other(body).is_some())
            .map(|(slot, e)| (PairKey::new(e.collision.a, e.collision.b), slot))
            .collect();
        let n = doomed.len();
        match listener {
            Some(listener) => {
                for (key, slot) in doomed {
                    self.end(key, slot, listener);
                }
            }
            None => {
                for (key, slot) in doomed {
                    self.index.remove(&key);
                    self.entries.release(slot);
                }
            }
        }
        n
    }

    pub fn get(&self, a: BodyHandle, b: BodyHandle) -> Option<&Collision> {
        let slot = *self.index.get(&PairKey::new(a, b))?;
        self.entries.get(slot).filter(|e| e.matches(a, b)).map(|e| &e.collision)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collision> {
        self.entries.iter().map(|(_, e)| &e.collision)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop every record without events.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
