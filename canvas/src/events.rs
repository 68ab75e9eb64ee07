//! Outbound events and the listener registry.
//!
//! Every engine handler returns the events it produced, in order. The
//! [`Listeners`] registry fans them out synchronously to host callbacks.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::board::{BucketRule, LayoutMode};
use crate::doc::{BoardId, ItemId};
use crate::geometry::Point;

/// Something the host should know about or act on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A Freeform position changed and should be persisted.
    ItemMoved { id: ItemId, board_id: BoardId, position: Point },
    /// The selection changed; carries the full new set.
    SelectionChanged { ids: BTreeSet<ItemId> },
    /// The viewport scale changed.
    ZoomChanged { scale: f64 },
    /// The user asked for a new note at a canvas point.
    RequestCreateItem { board_id: BoardId, at: Point },
    /// The user asked to delete these notes. The store is unchanged until the
    /// host confirms through `remove_items`.
    RequestDeleteItems { ids: Vec<ItemId> },
    /// A card was dropped into another Kanban column or Grid section.
    ItemBucketChanged {
        id: ItemId,
        board_id: BoardId,
        from: String,
        to: String,
        /// Target section rule; `None` for Kanban columns.
        rule: Option<BucketRule>,
    },
    /// The board's layout mode or buckets changed.
    LayoutChanged { board_id: BoardId, mode: LayoutMode },
    /// Something visible changed; the host should schedule a redraw.
    RenderNeeded,
}

impl CanvasEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemMoved { .. } => "item_moved",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::ZoomChanged { .. } => "zoom_changed",
            Self::RequestCreateItem { .. } => "request_create_item",
            Self::RequestDeleteItems { .. } => "request_delete_items",
            Self::ItemBucketChanged { .. } => "item_bucket_changed",
            Self::LayoutChanged { .. } => "layout_changed",
            Self::RenderNeeded => "render_needed",
        }
    }
}

/// Receives outbound events.
pub trait EventSink {
    fn emit(&mut self, event: &CanvasEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&CanvasEvent),
{
    fn emit(&mut self, event: &CanvasEvent) {
        self(event);
    }
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered event sinks, called in subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    sinks: Vec<(ListenerId, Box<dyn EventSink>)>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.sinks.len()).finish()
    }
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<S>(&mut self, sink: S) -> ListenerId
    where
        S: EventSink + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, Box::new(sink)));
        id
    }

    /// Remove a listener. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    /// Deliver `events` to every listener, in order.
    pub fn dispatch(&mut self, events: &[CanvasEvent]) {
        for event in events {
            tracing::trace!(event = event.name(), listeners = self.sinks.len(), "dispatch");
            for (_, sink) in &mut self.sinks {
                sink.emit(event);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
