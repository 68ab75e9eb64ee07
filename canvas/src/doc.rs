//! Document model: notes, their metadata, and the in-memory item store.
//!
//! Items are mirrored from the external task model through
//! [`crate::engine::EngineCore::set_items`]; the store never invents or deletes
//! notes on its own. Draw order is insertion order, with an optional set of
//! temporarily raised items drawn on top while they are being dragged.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH};
use crate::geometry::{Point, Rect, Size};

/// Unique identifier for a note, assigned by the task model.
pub type ItemId = Uuid;

/// Unique identifier for a board.
pub type BoardId = Uuid;

/// Fixed note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Orange,
    Purple,
}

impl NoteColor {
    /// Fill color as a hex string.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Yellow => "#FFE68A",
            Self::Pink => "#FFB3C7",
            Self::Blue => "#A8D8FF",
            Self::Green => "#B9F0B0",
            Self::Orange => "#FFC98A",
            Self::Purple => "#D6B8FF",
        }
    }
}

/// Task priority, used by Grid section rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

fn default_size() -> Size {
    Size::new(DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT)
}

/// A note on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable id from the task model.
    pub id: ItemId,
    /// Short title drawn on the card.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: NoteColor,
    #[serde(default = "default_size")]
    pub size: Size,
    /// Freeform position per board. Absent means "not yet placed on that board".
    #[serde(default)]
    pub positions_by_board: HashMap<BoardId, Point>,
    /// Workflow status, e.g. `"doing"`.
    #[serde(default)]
    pub status: Option<String>,
    /// Explicit Kanban column override.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    /// Due date as unix seconds.
    #[serde(default)]
    pub due: Option<i64>,
    /// Stable ordering key inside a bucket (creation order or explicit rank).
    #[serde(default)]
    pub rank: i64,
}

impl Item {
    /// A note with default size and color and no metadata.
    #[must_use]
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: NoteColor::default(),
            size: default_size(),
            positions_by_board: HashMap::new(),
            status: None,
            column: None,
            priority: Priority::default(),
            tags: Vec::new(),
            completed: false,
            due: None,
            rank: 0,
        }
    }

    /// Freeform position on `board`, if placed.
    #[must_use]
    pub fn position(&self, board: &BoardId) -> Option<Point> {
        self.positions_by_board.get(board).copied()
    }

    /// Freeform bounds on `board`, if placed.
    #[must_use]
    pub fn bounds_on(&self, board: &BoardId) -> Option<Rect> {
        self.position(board).map(|p| Rect::from_origin_size(p, self.size))
    }
}

/// In-memory store of notes with stable draw order.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: HashMap<ItemId, Item>,
    order: Vec<ItemId>,
    raised: Vec<ItemId>,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item. A replaced item keeps its draw position.
    ///
    /// Returns `true` if the item was newly inserted.
    pub fn upsert(&mut self, item: Item) -> bool {
        let id = item.id;
        let inserted = self.items.insert(id, item).is_none();
        if inserted {
            self.order.push(id);
        }
        inserted
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let removed = self.items.remove(id)?;
        self.order.retain(|o| o != id);
        self.raised.retain(|o| o != id);
        Some(removed)
    }

    /// Replace the whole working set. Draw order follows `items`.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items.clear();
        self.order.clear();
        self.raised.clear();
        for item in items {
            self.upsert(item);
        }
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Snapshot of all items in draw order (bottom first, raised items last).
    #[must_use]
    pub fn all(&self) -> Vec<&Item> {
        self.ids().iter().filter_map(|id| self.items.get(id)).collect()
    }

    /// Item ids in draw order (bottom first, raised items last).
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .order
            .iter()
            .filter(|id| !self.raised.contains(id))
            .copied()
            .collect();
        ids.extend(self.raised.iter().copied());
        ids
    }

    /// Set the Freeform position of `id` on `board`.
    ///
    /// Unknown ids are ignored (the item may have been removed by the host
    /// mid-gesture). Returns `true` when a position was written.
    pub fn set_position(&mut self, id: &ItemId, board: BoardId, point: Point) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.positions_by_board.insert(board, point);
        true
    }

    /// Freeform position of `id` on `board`.
    #[must_use]
    pub fn position(&self, id: &ItemId, board: &BoardId) -> Option<Point> {
        self.items.get(id).and_then(|item| item.position(board))
    }

    /// Temporarily draw `ids` above everything else (drag feedback).
    pub fn raise(&mut self, ids: &[ItemId]) {
        self.raised = self
            .order
            .iter()
            .filter(|id| ids.contains(id))
            .copied()
            .collect();
    }

    /// Undo [`ItemStore::raise`]; items return to their insertion position.
    pub fn restore_layers(&mut self) {
        self.raised.clear();
    }

    /// Ids currently raised for drag feedback.
    #[must_use]
    pub fn raised(&self) -> &[ItemId] {
        &self.raised
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
