//! Item arena with an explicit ordered index.
//!
//! Every entry gets an [`ItemId`] when it enters the arena. Ids are
//! generational: a slot freed by removal is reused with a bumped generation,
//! so an id held by a stale view row can never alias a different live item.
//!
//! # Invariants
//!
//! 1. `order` contains each live id exactly once and no dead id.
//! 2. A live id's slot holds `Some(item)` with a matching generation.
//! 3. Operations on a stale id or an out-of-range position change nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::item::Item;

/// Stable identity of one list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    index: u32,
    generation: u32,
}

impl ItemId {
    /// Slot index (not the list position).
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    item: Option<Item>,
}

/// Ordered list storage keyed by [`ItemId`].
#[derive(Debug, Clone, Default)]
pub struct ItemArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<ItemId>,
}

impl ItemArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena holding `items` in order.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut arena = Self::new();
        for item in items {
            arena.push(item);
        }
        arena
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in list order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Entries in list order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|item| (id, item)))
    }

    /// Values in list order.
    pub fn values(&self) -> impl Iterator<Item = &Item> + '_ {
        self.iter().map(|(_, item)| item)
    }

    /// Owned copy of the values in list order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Item> {
        self.values().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.item.as_ref()
    }

    /// Current list position of `id`.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|&candidate| candidate == id)
    }

    /// Id at list position `position`.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<ItemId> {
        self.order.get(position).copied()
    }

    /// Append an item and return its id.
    pub fn push(&mut self, item: Item) -> ItemId {
        let id = self.allocate(item);
        self.order.push(id);
        id
    }

    /// Insert at `position`, clamped to the list length.
    pub fn insert(&mut self, position: usize, item: Item) -> ItemId {
        let id = self.allocate(item);
        let position = position.min(self.order.len());
        self.order.insert(position, id);
        id
    }

    /// Remove the entry with `id`. Stale ids return `None`.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let position = self.position(id)?;
        self.order.remove(position);
        self.release(id)
    }

    /// Remove the entry at `position`. Out of range returns `None`.
    pub fn remove_at(&mut self, position: usize) -> Option<(ItemId, Item)> {
        let id = self.id_at(position)?;
        self.order.remove(position);
        self.release(id).map(|item| (id, item))
    }

    /// Overwrite the value of `id`, returning the previous value.
    pub fn replace(&mut self, id: ItemId, item: Item) -> Option<Item> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let current = slot.item.as_mut()?;
        Some(std::mem::replace(current, item))
    }

    /// Move the entry at `from` to `to`, splice style.
    ///
    /// `to` addresses the list after the entry was taken out and is clamped to
    /// its length. Returns `false` if `from` is out of range.
    pub fn move_position(&mut self, from: usize, to: usize) -> bool {
        if from >= self.order.len() {
            return false;
        }
        let id = self.order.remove(from);
        let to = to.min(self.order.len());
        self.order.insert(to, id);
        true
    }

    /// Move the entry with `id` to `to`. Stale ids return `false`.
    pub fn move_id(&mut self, id: ItemId, to: usize) -> bool {
        match self.position(id) {
            Some(from) => self.move_position(from, to),
            None => false,
        }
    }

    /// Replace every entry with `items`.
    ///
    /// Entries whose value is unchanged at the same position keep their ids;
    /// every other position gets a fresh id.
    pub fn reconcile(&mut self, items: Vec<Item>) {
        let previous: Vec<ItemId> = self.order.clone();
        let mut kept = Vec::with_capacity(items.len());
        let mut pending = Vec::with_capacity(items.len());

        for (position, item) in items.into_iter().enumerate() {
            match previous.get(position) {
                Some(&id) if self.get(id) == Some(&item) => {
                    kept.push(id);
                    pending.push(Ok(id));
                }
                _ => pending.push(Err(item)),
            }
        }

        for id in previous {
            if !kept.contains(&id) {
                self.release(id);
            }
        }

        let mut order = Vec::with_capacity(pending.len());
        for entry in pending {
            match entry {
                Ok(id) => order.push(id),
                Err(item) => order.push(self.allocate(item)),
            }
        }
        self.order = order;
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        for id in std::mem::take(&mut self.order) {
            self.release(id);
        }
    }

    fn allocate(&mut self, item: Item) -> ItemId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            return ItemId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        ItemId {
            index,
            generation: 0,
        }
    }

    fn release(&mut self, id: ItemId) -> Option<Item> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(arena: &ItemArena) -> Vec<String> {
        arena.values().map(Item::label).collect()
    }

    fn arena(values: &[&str]) -> ItemArena {
        ItemArena::from_items(values.iter().map(|v| Item::text(*v)))
    }

    #[test]
    fn push_preserves_order() {
        let a = arena(&["a", "b", "c"]);
        assert_eq!(texts(&a), ["a", "b", "c"]);
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
    }

    #[test]
    fn ids_resolve_to_positions() {
        let a = arena(&["a", "b", "c"]);
        let b = a.id_at(1).unwrap();
        assert_eq!(a.position(b), Some(1));
        assert_eq!(a.get(b), Some(&Item::text("b")));
        assert_eq!(a.id_at(3), None);
    }

    #[test]
    fn removed_id_is_stale_even_after_slot_reuse() {
        let mut a = arena(&["a", "b"]);
        let b = a.id_at(1).unwrap();
        assert_eq!(a.remove(b), Some(Item::text("b")));
        assert_eq!(a.remove(b), None);

        let c = a.push(Item::text("c"));
        assert_eq!(c.slot(), b.slot());
        assert_ne!(c, b);
        assert!(!a.contains(b));
        assert_eq!(a.get(b), None);
        assert_eq!(texts(&a), ["a", "c"]);
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let mut a = arena(&["a"]);
        assert!(a.remove_at(1).is_none());
        assert_eq!(texts(&a), ["a"]);
        let (_, item) = a.remove_at(0).unwrap();
        assert_eq!(item, Item::text("a"));
        assert!(a.is_empty());
    }

    #[test]
    fn move_position_uses_splice_semantics() {
        let mut a = arena(&["foo", "bar", "baz"]);
        assert!(a.move_position(2, 0));
        assert_eq!(texts(&a), ["baz", "foo", "bar"]);
        assert!(a.move_position(0, 2));
        assert_eq!(texts(&a), ["foo", "bar", "baz"]);
        assert!(a.move_position(0, 99));
        assert_eq!(texts(&a), ["bar", "baz", "foo"]);
        assert!(!a.move_position(3, 0));
    }

    #[test]
    fn move_id_keeps_identity() {
        let mut a = arena(&["a", "b", "c"]);
        let c = a.id_at(2).unwrap();
        assert!(a.move_id(c, 0));
        assert_eq!(a.id_at(0), Some(c));
        assert_eq!(texts(&a), ["c", "a", "b"]);
    }

    #[test]
    fn replace_returns_previous_value() {
        let mut a = arena(&["a", "b"]);
        let b = a.id_at(1).unwrap();
        assert_eq!(a.replace(b, Item::text("z")), Some(Item::text("b")));
        assert_eq!(texts(&a), ["a", "z"]);
        a.remove(b);
        assert_eq!(a.replace(b, Item::text("y")), None);
    }

    #[test]
    fn insert_clamps_position() {
        let mut a = arena(&["a"]);
        a.insert(0, Item::text("first"));
        a.insert(10, Item::text("last"));
        assert_eq!(texts(&a), ["first", "a", "last"]);
    }

    #[test]
    fn reconcile_keeps_ids_of_unchanged_prefix() {
        let mut a = arena(&["x", "y"]);
        let x = a.id_at(0).unwrap();
        let y = a.id_at(1).unwrap();
        a.reconcile(vec![Item::text("x"), Item::text("y"), Item::text("z")]);
        assert_eq!(texts(&a), ["x", "y", "z"]);
        assert_eq!(a.id_at(0), Some(x));
        assert_eq!(a.id_at(1), Some(y));
    }

    #[test]
    fn reconcile_reissues_ids_for_changed_positions() {
        let mut a = arena(&["x", "y"]);
        let x = a.id_at(0).unwrap();
        let y = a.id_at(1).unwrap();
        a.reconcile(vec![Item::text("y")]);
        assert_eq!(texts(&a), ["y"]);
        assert!(!a.contains(x));
        assert!(!a.contains(y));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn clear_invalidates_all_ids() {
        let mut a = arena(&["a", "b"]);
        let ids = a.ids().to_vec();
        a.clear();
        assert!(a.is_empty());
        assert!(ids.iter().all(|&id| !a.contains(id)));
    }
}
