//! Selection manager: the set of selected item ids.
//!
//! Id-based operations are O(1) amortized on a hash set; rectangle selection
//! scans every candidate. Every mutator marks the selection dirty only when the
//! set actually changes, and [`SelectionManager::take_change`] drains that flag
//! so a whole input event (or drag frame) produces at most one notification.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::{BTreeSet, HashSet};

use crate::doc::ItemId;
use crate::geometry::{Rect, rect_intersects};

/// Ids of every candidate whose bounds intersect `rect`.
#[must_use]
pub fn ids_in_rect<I>(rect: &Rect, candidates: I) -> HashSet<ItemId>
where
    I: IntoIterator<Item = (ItemId, Rect)>,
{
    candidates
        .into_iter()
        .filter(|(_, bounds)| rect_intersects(bounds, rect))
        .map(|(id, _)| id)
        .collect()
}

/// Tracks the current selection and whether it changed since last drained.
#[derive(Debug, Default)]
pub struct SelectionManager {
    ids: HashSet<ItemId>,
    dirty: bool,
}

impl SelectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the only selected item.
    pub fn select_exclusive(&mut self, id: ItemId) {
        if self.ids.len() == 1 && self.ids.contains(&id) {
            return;
        }
        self.ids.clear();
        self.ids.insert(id);
        self.dirty = true;
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        self.dirty = true;
        if self.ids.remove(&id) {
            return false;
        }
        self.ids.insert(id);
        true
    }

    /// Add `id` to the selection.
    pub fn add(&mut self, id: ItemId) {
        if self.ids.insert(id) {
            self.dirty = true;
        }
    }

    /// Select exactly `ids`.
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.replace(ids.into_iter().collect());
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.dirty = true;
        }
    }

    /// Select every candidate intersecting `rect`, unioned with `base` when given.
    ///
    /// `base` is the selection captured when an additive (shift) lasso started.
    pub fn select_by_rect<I>(&mut self, rect: &Rect, candidates: I, base: Option<&HashSet<ItemId>>)
    where
        I: IntoIterator<Item = (ItemId, Rect)>,
    {
        let mut next = ids_in_rect(rect, candidates);
        if let Some(base) = base {
            next.extend(base.iter().copied());
        }
        self.replace(next);
    }

    /// Drop `id` from the selection (item removed from the board).
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let removed = self.ids.remove(id);
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ItemId) -> bool,
    {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        if self.ids.len() != before {
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &HashSet<ItemId> {
        &self.ids
    }

    /// Selected ids in a deterministic order.
    #[must_use]
    pub fn sorted_ids(&self) -> BTreeSet<ItemId> {
        self.ids.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the selection changed since the last [`SelectionManager::take_change`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drain the change flag, returning the new selection if it changed.
    pub fn take_change(&mut self) -> Option<BTreeSet<ItemId>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.sorted_ids())
    }

    fn replace(&mut self, next: HashSet<ItemId>) {
        if next != self.ids {
            self.ids = next;
            self.dirty = true;
        }
    }
}
