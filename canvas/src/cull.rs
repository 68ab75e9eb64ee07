//! Viewport culling: which items are worth drawing.
//!
//! The visible set is the items whose bounds intersect the visible rectangle
//! grown by a margin on every side, so cards slide in without popping during
//! small pans. It is recomputed wholesale when the viewport or item set changes
//! and patched per item while a drag is in progress.

#[cfg(test)]
#[path = "cull_test.rs"]
mod cull_test;

use std::collections::HashSet;

use crate::camera::Viewport;
use crate::doc::ItemId;
use crate::geometry::{Rect, expand_rect, rect_intersects};

/// Canvas-space rectangle items must intersect to be drawn.
#[must_use]
pub fn cull_rect(viewport: &Viewport, margin: f64) -> Rect {
    expand_rect(&viewport.visible_rect(), margin)
}

/// Ids of the candidates intersecting the expanded visible rectangle, in input order.
#[must_use]
pub fn visible_items<I>(candidates: I, viewport: &Viewport, margin: f64) -> Vec<ItemId>
where
    I: IntoIterator<Item = (ItemId, Rect)>,
{
    let area = cull_rect(viewport, margin);
    candidates
        .into_iter()
        .filter(|(_, bounds)| rect_intersects(bounds, &area))
        .map(|(id, _)| id)
        .collect()
}

/// Cached visible set.
#[derive(Debug, Default)]
pub struct VisibleSet {
    ids: HashSet<ItemId>,
    area: Rect,
}

impl VisibleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from scratch.
    pub fn recompute<I>(&mut self, candidates: I, viewport: &Viewport, margin: f64)
    where
        I: IntoIterator<Item = (ItemId, Rect)>,
    {
        self.area = cull_rect(viewport, margin);
        let mut total = 0_usize;
        let area = self.area;
        self.ids = candidates
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|(_, bounds)| rect_intersects(bounds, &area))
            .map(|(id, _)| id)
            .collect();
        tracing::trace!(visible = self.ids.len(), total, "visible set recomputed");
    }

    /// Re-test one item against the cached area (e.g. a dragged card).
    pub fn update_item(&mut self, id: ItemId, bounds: &Rect) {
        if rect_intersects(bounds, &self.area) {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Forget an item that left the store.
    pub fn remove(&mut self, id: &ItemId) {
        self.ids.remove(id);
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Area used by the last recompute.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
