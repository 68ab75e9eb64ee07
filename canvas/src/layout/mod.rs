//! Layout engine: stateless strategies that position items on a board.
//!
//! DESIGN
//! ======
//! Freeform positions are user data and live on the items
//! (`Item::positions_by_board`); [`freeform::place_missing`] only fills gaps.
//! Kanban and Grid positions are derived: [`arrange`] recomputes them from the
//! item set and the board every time either changes, and the result is held
//! as an [`Arrangement`] that is never persisted. Switching modes therefore
//! cannot disturb Freeform placement.

pub mod freeform;
pub mod grid;
pub mod kanban;


use std::collections::HashMap;

use crate::board::{Board, BucketRule, LayoutMode};
use crate::config::LayoutConfig;
use crate::doc::{Item, ItemId};
use crate::geometry::{Point, Rect};

/// A Kanban column or Grid section as laid out on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Display name (column name or section name).
    pub name: String,
    /// Canvas-space frame covering the header and every card in the bucket.
    pub frame: Rect,
    /// Grid section rule; `None` for Kanban columns.
    pub rule: Option<BucketRule>,
}

/// Computed position of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Canvas-space top-left of the card.
    pub origin: Point,
    /// Index into [`Arrangement::buckets`].
    pub bucket: usize,
}

/// Output of a Kanban or Grid layout run. Empty for Freeform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arrangement {
    mode: LayoutMode,
    slots: HashMap<ItemId, Slot>,
    buckets: Vec<Bucket>,
}

impl Arrangement {
    /// The (empty) arrangement of a Freeform board.
    #[must_use]
    pub fn freeform() -> Self {
        Self::default()
    }

    pub(crate) fn new(mode: LayoutMode, slots: HashMap<ItemId, Slot>, buckets: Vec<Bucket>) -> Self {
        Self { mode, slots, buckets }
    }

    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    #[must_use]
    pub fn slot(&self, id: &ItemId) -> Option<&Slot> {
        self.slots.get(id)
    }

    #[must_use]
    pub fn origin(&self, id: &ItemId) -> Option<Point> {
        self.slots.get(id).map(|s| s.origin)
    }

    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[must_use]
    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    /// Bucket the item was assigned to by the last layout run.
    #[must_use]
    pub fn bucket_of(&self, id: &ItemId) -> Option<&Bucket> {
        self.slots.get(id).and_then(|s| self.buckets.get(s.bucket))
    }

    /// Ids assigned to bucket `index`, in no particular order.
    pub fn members(&self, index: usize) -> impl Iterator<Item = &ItemId> {
        self.slots
            .iter()
            .filter(move |(_, slot)| slot.bucket == index)
            .map(|(id, _)| id)
    }

    /// Bucket under a canvas point.
    ///
    /// Kanban columns extend infinitely downward, so only the x range matters.
    #[must_use]
    pub fn bucket_at(&self, p: Point) -> Option<usize> {
        self.buckets.iter().position(|b| match self.mode {
            LayoutMode::Kanban => p.x >= b.frame.left() && p.x <= b.frame.right(),
            LayoutMode::Grid | LayoutMode::Freeform => b.frame.contains(p),
        })
    }

    /// Move an item's slot by `delta` (live drag in Kanban/Grid). Unknown ids are ignored.
    pub fn nudge(&mut self, id: &ItemId, delta: Point) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        slot.origin += delta;
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Run the board's layout strategy over `items`.
///
/// `now` is the wall-clock time in unix seconds, used by due-date rules.
/// Freeform boards produce an empty arrangement; see [`freeform::place_missing`].
#[must_use]
pub fn arrange(items: &[&Item], board: &Board, config: &LayoutConfig, now: i64) -> Arrangement {
    let arrangement = match board.layout_mode {
        LayoutMode::Freeform => Arrangement::freeform(),
        LayoutMode::Kanban => kanban::arrange(items, board, &config.kanban),
        LayoutMode::Grid => grid::arrange(items, board, &config.grid, now),
    };
    tracing::debug!(
        board_id = %board.id,
        mode = ?board.layout_mode,
        items = items.len(),
        buckets = arrangement.buckets.len(),
        "layout arranged"
    );
    arrangement
}

/// Stable in-bucket order: rank first, id as tie-breaker.
pub(crate) fn sort_by_rank(items: &mut [&Item]) {
    items.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
}

/// Convert a small count to `f64` for layout arithmetic.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_f64(n: usize) -> f64 {
    n as f64
}
