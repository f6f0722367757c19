//! Dense collection paired with a liveness bitset.
//!
//! Items keep their insertion slot forever. An item starts active and stays
//! active until [`ActiveSet::deactivate`] clears its bit; there is no way to
//! reactivate a slot.

use crate::bitset::Bitset;

#[derive(Debug)]
pub struct ActiveSet<T> {
    items: Vec<T>,
    active: Bitset,
}

impl<T> ActiveSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            active: Bitset::new(),
        }
    }

    /// Appends an active item and returns its slot.
    pub fn push(&mut self, item: T) -> usize {
        let slot = self.items.len();
        self.items.push(item);
        self.active.set(slot, true);
        slot
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.items.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.items.get_mut(slot)
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.active.get(slot)
    }

    /// Permanently retires `slot`.
    pub fn deactivate(&mut self, slot: usize) {
        if slot < self.items.len() {
            self.active.set(slot, false);
        }
    }

    pub fn any_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.count_ones()
    }

    pub fn liveness(&self) -> &Bitset {
        &self.active
    }

    /// Every item, active or not, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        let active = &self.active;
        self.items
            .iter()
            .enumerate()
            .filter(move |(slot, _)| active.get(*slot))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        let active = &self.active;
        self.items
            .iter_mut()
            .enumerate()
            .filter(move |(slot, _)| active.get(*slot))
    }

    /// Runs `update` on every active item in slot order and retires each one
    /// that returns `false`. Returns whether any item is still active.
    pub fn update_active(&mut self, mut update: impl FnMut(usize, &mut T) -> bool) -> bool {
        for (slot, item) in self.items.iter_mut().enumerate() {
            if !self.active.get(slot) {
                continue;
            }
            if !update(slot, item) {
                self.active.set(slot, false);
            }
        }
        self.any_active()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.active.clear();
    }
}

impl<T> Default for ActiveSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
