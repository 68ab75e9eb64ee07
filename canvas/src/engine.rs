//! Canvas controller: owns the components and routes host input through them.
//!
//! DESIGN
//! ======
//! `EngineCore` holds every piece of engine state (items, selection, viewport,
//! gesture, board, arrangement, visible set) and exposes the inbound API as
//! `&mut self` methods that return the outbound events they produced. It has no
//! drawing or callback dependencies so it can be driven directly from tests.
//! `Engine` wraps a core together with a host [`Surface`] and a listener
//! registry: it forwards each call, dispatches the returned events to the
//! listeners, and renders on request.
//!
//! Selection mutations are coalesced: handlers drain the selection's change
//! flag once at the end, so one input event yields at most one
//! `SelectionChanged`.

use std::collections::{BTreeSet, HashSet};

use crate::board::{Board, LayoutMode};
use crate::camera::Viewport;
use crate::config::CanvasConfig;
use crate::consts::SELECTION_OUTLINE_PX;
use crate::cull::{VisibleSet, cull_rect};
use crate::doc::{Item, ItemId, ItemStore};
use crate::drag::{DragPayload, DropError, resolve_drop};
use crate::events::{CanvasEvent, EventSink, ListenerId, Listeners};
use crate::geometry::{Point, Rect, Size, bounding_rect};
use crate::hit::hit_test;
use crate::input::{Button, InputState, Key, Modifiers, WheelDelta};
use crate::layout::{self, Arrangement, freeform};
use crate::render::{self, CardView, Scene, Surface};
use crate::selection::SelectionManager;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Core engine state: all logic that doesn't depend on the host surface.
#[derive(Debug)]
pub struct EngineCore {
    config: CanvasConfig,
    store: ItemStore,
    selection: SelectionManager,
    viewport: Viewport,
    input: InputState,
    board: Board,
    arrangement: Arrangement,
    visible: VisibleSet,
    /// Bucket payloads for the drag in progress (Kanban/Grid only).
    payloads: Vec<DragPayload>,
    /// Wall clock in unix seconds, for due-date rules.
    now: i64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default(), Board::default())
    }
}

impl EngineCore {
    /// Create an empty engine showing `board`.
    ///
    /// `config` is used as given; call [`CanvasConfig::validate`] first when it
    /// comes from user input.
    #[must_use]
    pub fn new(config: CanvasConfig, board: Board) -> Self {
        let viewport = Viewport::new(config.min_zoom, config.max_zoom);
        let mut core = Self {
            config,
            store: ItemStore::new(),
            selection: SelectionManager::new(),
            viewport,
            input: InputState::Idle,
            board,
            arrangement: Arrangement::freeform(),
            visible: VisibleSet::new(),
            payloads: Vec::new(),
            now: 0,
        };
        core.relayout();
        core
    }

    // --- Data inputs ---

    /// Replace the working set with the host's items.
    ///
    /// Items lacking a Freeform position on the current board are auto-placed
    /// and reported with `ItemMoved`.
    pub fn set_items(&mut self, items: Vec<Item>) -> Vec<CanvasEvent> {
        self.store.replace_all(items);
        self.after_items_changed()
    }

    /// Insert or replace individual items, keeping the rest.
    pub fn upsert_items(&mut self, items: Vec<Item>) -> Vec<CanvasEvent> {
        for item in items {
            self.store.upsert(item);
        }
        self.after_items_changed()
    }

    /// Remove items the host deleted. Unknown ids are ignored.
    pub fn remove_items(&mut self, ids: &[ItemId]) -> Vec<CanvasEvent> {
        let mut removed = false;
        for id in ids {
            removed |= self.store.remove(id).is_some();
            self.selection.remove(id);
            self.visible.remove(id);
        }
        if !removed {
            return Vec::new();
        }
        self.after_items_changed()
    }

    /// Remove a single item. See [`EngineCore::remove_items`].
    pub fn apply_delete(&mut self, id: &ItemId) -> Vec<CanvasEvent> {
        self.remove_items(std::slice::from_ref(id))
    }

    /// Show another board, or the same board with a new mode or buckets.
    ///
    /// Any gesture in progress is aborted first. Freeform positions are never
    /// rewritten by a mode switch.
    pub fn set_board(&mut self, board: Board) -> Vec<CanvasEvent> {
        let mut events = self.abort_gesture();
        let layout_changed = board.id != self.board.id
            || board.layout_mode != self.board.layout_mode
            || board.columns != self.board.columns
            || board.sections != self.board.sections;
        self.board = board;

        self.place_missing(&mut events);
        self.relayout();
        self.refresh_visible();
        if layout_changed {
            tracing::debug!(board_id = %self.board.id, mode = ?self.board.layout_mode, "layout changed");
            events.push(CanvasEvent::LayoutChanged { board_id: self.board.id, mode: self.board.layout_mode });
        }
        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Update the screen size in pixels (window resize).
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<CanvasEvent> {
        self.viewport.set_screen_size(Size::new(width, height));
        self.refresh_visible();
        vec![CanvasEvent::RenderNeeded]
    }

    /// Set the wall clock (unix seconds) used by due-date section rules.
    pub fn set_clock(&mut self, now: i64) -> Vec<CanvasEvent> {
        if now == self.now {
            return Vec::new();
        }
        self.now = now;
        // Re-bucketing mid-drag would discard the live offsets; the drop relayouts anyway.
        if self.board.layout_mode != LayoutMode::Grid || matches!(self.input, InputState::Dragging { .. }) {
            return Vec::new();
        }
        self.relayout();
        self.refresh_visible();
        vec![CanvasEvent::RenderNeeded]
    }

    // --- Pointer input ---

    /// Pointer pressed at a screen-space point.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<CanvasEvent> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        if button == Button::Middle {
            self.set_input(InputState::Panning { last_screen: screen_pt });
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        match hit_test(canvas_pt, self.candidates()) {
            Some(id) => self.press_item(id, canvas_pt, modifiers),
            // The pan modifier only applies on empty canvas.
            None if modifiers.pan() => {
                self.set_input(InputState::Panning { last_screen: screen_pt });
                return Vec::new();
            }
            None => self.start_lasso(canvas_pt, modifiers),
        }

        let mut events = Vec::new();
        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Pointer moved to a screen-space point.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        self.input = match std::mem::take(&mut self.input) {
            InputState::Idle => return Vec::new(),
            InputState::Panning { last_screen } => {
                self.viewport.pan_by_screen(screen_pt - last_screen);
                self.refresh_visible();
                InputState::Panning { last_screen: screen_pt }
            }
            InputState::Dragging { ids, anchor, start, last } => {
                self.move_items(&ids, canvas_pt - last);
                InputState::Dragging { ids, anchor, start, last: canvas_pt }
            }
            InputState::LassoSelecting { start, additive, base, .. } => {
                let rect = Rect::from_corners(start, canvas_pt);
                let candidates = self.candidates();
                self.selection.select_by_rect(&rect, candidates, additive.then_some(&base));
                InputState::LassoSelecting { start, current: canvas_pt, additive, base }
            }
        };

        let mut events = Vec::new();
        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Pointer released at a screen-space point; commits the active gesture.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        let mut events = Vec::new();
        let finished = std::mem::take(&mut self.input);
        match &finished {
            InputState::Idle => return events,
            InputState::Panning { last_screen } => {
                self.viewport.pan_by_screen(screen_pt - *last_screen);
                self.refresh_visible();
            }
            InputState::Dragging { ids, start, last, .. } => {
                self.move_items(ids, canvas_pt - *last);
                self.finish_drag(ids, canvas_pt != *start, true, &mut events);
            }
            InputState::LassoSelecting { start, additive, base, .. } => {
                self.finish_lasso(*start, canvas_pt, *additive, base);
            }
        }
        tracing::debug!(from = finished.name(), to = "idle", "gesture finished");

        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Double-click: on empty canvas, ask the host to create a note there.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        if hit_test(canvas_pt, self.candidates()).is_some() {
            return Vec::new();
        }
        vec![CanvasEvent::RequestCreateItem { board_id: self.board.id, at: canvas_pt }]
    }

    /// Wheel or two-finger scroll. Cmd/Ctrl zooms around the pointer; otherwise pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<CanvasEvent> {
        if modifiers.command() {
            let factor = (-delta.dy * self.config.wheel_zoom_sensitivity).exp();
            return self.zoom_around(self.viewport.scale() * factor, screen_pt);
        }
        let scroll = Point::new(delta.dx, delta.dy);
        if scroll == Point::default() {
            return Vec::new();
        }
        self.viewport.pan_by_screen(Point::new(-scroll.x, -scroll.y));
        self.refresh_visible();
        vec![CanvasEvent::RenderNeeded]
    }

    /// Trackpad pinch: multiply the scale by `factor` around `screen_pt`.
    pub fn on_magnify(&mut self, screen_pt: Point, factor: f64) -> Vec<CanvasEvent> {
        self.zoom_around(self.viewport.scale() * factor, screen_pt)
    }

    // --- Keyboard / focus ---

    /// Key pressed.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<CanvasEvent> {
        if key.is_escape() {
            let mut events = self.abort_gesture();
            self.selection.clear();
            self.flush_selection(&mut events);
            events.push(CanvasEvent::RenderNeeded);
            return events;
        }
        if !self.input.is_idle() {
            return Vec::new();
        }
        if key.is_delete() {
            if self.selection.is_empty() {
                return Vec::new();
            }
            let ids = self.selected_in_draw_order();
            tracing::debug!(count = ids.len(), "delete requested");
            return vec![CanvasEvent::RequestDeleteItems { ids }];
        }
        if key.is_a() && modifiers.command() {
            self.selection.select_all(self.store.ids());
            let mut events = Vec::new();
            self.flush_selection(&mut events);
            if !events.is_empty() {
                events.push(CanvasEvent::RenderNeeded);
            }
            return events;
        }
        Vec::new()
    }

    /// The canvas lost focus: abort any gesture, keep the selection.
    pub fn on_focus_lost(&mut self) -> Vec<CanvasEvent> {
        if self.input.is_idle() {
            return Vec::new();
        }
        let mut events = self.abort_gesture();
        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    // --- Zoom commands ---

    /// Set the scale, anchored at the screen centre.
    pub fn zoom_to(&mut self, scale: f64) -> Vec<CanvasEvent> {
        self.zoom_around(scale, self.viewport.screen_center())
    }

    /// Multiply the scale, anchored at the screen centre.
    pub fn zoom_by(&mut self, factor: f64) -> Vec<CanvasEvent> {
        self.zoom_to(self.viewport.scale() * factor)
    }

    pub fn zoom_in(&mut self) -> Vec<CanvasEvent> {
        self.zoom_by(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Vec<CanvasEvent> {
        self.zoom_by(1.0 / self.config.zoom_step)
    }

    /// Back to 100%.
    pub fn reset_zoom(&mut self) -> Vec<CanvasEvent> {
        self.zoom_to(1.0)
    }

    /// Scale and centre so every item and bucket is on screen.
    pub fn zoom_to_fit(&mut self) -> Vec<CanvasEvent> {
        let frames = self.arrangement.buckets().iter().map(|b| b.frame);
        let Some(bounds) = bounding_rect(self.candidates().into_iter().map(|(_, r)| r).chain(frames)) else {
            return Vec::new();
        };
        let changed = self.viewport.fit(&bounds, self.config.fit_padding_px);
        self.refresh_visible();
        let mut events = Vec::new();
        if changed {
            events.push(CanvasEvent::ZoomChanged { scale: self.viewport.scale() });
        }
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Ask the host for a new note at the centre of the screen (menu command).
    pub fn request_create_at_center(&self) -> Vec<CanvasEvent> {
        let at = self.viewport.screen_to_canvas(self.viewport.screen_center());
        vec![CanvasEvent::RequestCreateItem { board_id: self.board.id, at }]
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Selected ids in a stable order.
    #[must_use]
    pub fn selected_ids(&self) -> BTreeSet<ItemId> {
        self.selection.sorted_ids()
    }

    #[must_use]
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.contains(id)
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.store.get(id)
    }

    /// All items in draw order.
    #[must_use]
    pub fn items(&self) -> Vec<&Item> {
        self.store.all()
    }

    /// Canvas-space bounds of an item under the current layout mode.
    #[must_use]
    pub fn item_bounds(&self, id: &ItemId) -> Option<Rect> {
        self.store.get(id).and_then(|item| self.bounds_of(item))
    }

    /// Ids in the visible set, in draw order.
    #[must_use]
    pub fn visible_items(&self) -> Vec<ItemId> {
        self.store.ids().into_iter().filter(|id| self.visible.contains(id)).collect()
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    #[must_use]
    pub fn lasso_rect(&self) -> Option<Rect> {
        self.input.lasso_rect()
    }

    #[must_use]
    pub fn clock(&self) -> i64 {
        self.now
    }

    /// Snapshot for [`render::draw`].
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        let cards = self
            .store
            .all()
            .into_iter()
            .filter(|item| self.visible.contains(&item.id))
            .filter_map(|item| {
                Some(CardView {
                    id: item.id,
                    bounds: self.bounds_of(item)?,
                    title: &item.title,
                    color: item.color,
                    selected: self.selection.contains(&item.id),
                })
            })
            .collect();
        Scene {
            screen: self.viewport.screen_size(),
            scale: self.viewport.scale(),
            offset: self.viewport.offset(),
            area: cull_rect(&self.viewport, self.config.cull_margin),
            buckets: self.arrangement.buckets(),
            cards,
            lasso: self.input.lasso_rect(),
            outline_px: SELECTION_OUTLINE_PX,
        }
    }

    // --- Gestures ---

    fn set_input(&mut self, next: InputState) {
        tracing::debug!(from = self.input.name(), to = next.name(), "input transition");
        self.input = next;
    }

    fn press_item(&mut self, id: ItemId, canvas_pt: Point, modifiers: Modifiers) {
        // An already-selected item keeps the selection as is, Cmd/Ctrl or not.
        if !self.selection.contains(&id) {
            if modifiers.command() {
                self.selection.toggle(id);
            } else {
                self.selection.select_exclusive(id);
            }
        }

        let ids = self.selected_in_draw_order();
        self.store.raise(&ids);
        self.payloads = ids
            .iter()
            .filter_map(|i| DragPayload::capture(*i, &self.arrangement))
            .collect();
        self.set_input(InputState::Dragging { ids, anchor: id, start: canvas_pt, last: canvas_pt });
    }

    fn start_lasso(&mut self, canvas_pt: Point, modifiers: Modifiers) {
        let additive = modifiers.shift;
        let base = if additive {
            self.selection.ids().clone()
        } else {
            self.selection.clear();
            HashSet::new()
        };
        self.set_input(InputState::LassoSelecting { start: canvas_pt, current: canvas_pt, additive, base });
    }

    /// Shift every id by a canvas-space delta: Freeform positions in the store,
    /// bucketed slots in the arrangement.
    fn move_items(&mut self, ids: &[ItemId], delta: Point) {
        if delta == Point::default() {
            return;
        }
        let board_id = self.board.id;
        for id in ids {
            match self.board.layout_mode {
                LayoutMode::Freeform => {
                    if let Some(position) = self.store.position(id, &board_id) {
                        self.store.set_position(id, board_id, position + delta);
                    }
                }
                LayoutMode::Kanban | LayoutMode::Grid => {
                    self.arrangement.nudge(id, delta);
                }
            }
            if let Some(bounds) = self.item_bounds(id) {
                self.visible.update_item(*id, &bounds);
            }
        }
    }

    /// End a drag. `commit` is false when the drag was aborted rather than released.
    fn finish_drag(&mut self, ids: &[ItemId], moved: bool, commit: bool, events: &mut Vec<CanvasEvent>) {
        self.store.restore_layers();
        let payloads = std::mem::take(&mut self.payloads);
        match self.board.layout_mode {
            LayoutMode::Freeform => {
                if !moved {
                    return;
                }
                let board_id = self.board.id;
                for id in ids {
                    if let Some(position) = self.store.position(id, &board_id) {
                        events.push(CanvasEvent::ItemMoved { id: *id, board_id, position });
                    }
                }
            }
            LayoutMode::Kanban | LayoutMode::Grid => {
                if moved && commit {
                    for payload in &payloads {
                        self.drop_payload(payload, events);
                    }
                }
                // Snap back; accepted drops move once the host pushes the edited item.
                self.relayout();
                self.refresh_visible();
            }
        }
    }

    fn drop_payload(&self, payload: &DragPayload, events: &mut Vec<CanvasEvent>) {
        let Some(center) = self.item_bounds(&payload.item_id).map(|b| b.center()) else {
            return;
        };
        match resolve_drop(payload, &self.arrangement, center) {
            Ok(target) => {
                tracing::debug!(item_id = %payload.item_id, from = %payload.source.name, to = %target.name, "drop accepted");
                events.push(CanvasEvent::ItemBucketChanged {
                    id: payload.item_id,
                    board_id: self.board.id,
                    from: payload.source.name.clone(),
                    to: target.name,
                    rule: target.rule,
                });
            }
            Err(DropError::SameBucket(_)) => {
                tracing::debug!(item_id = %payload.item_id, "dropped into its own bucket");
            }
            Err(e) => {
                tracing::warn!(item_id = %payload.item_id, error = %e, "drop rejected");
            }
        }
    }

    fn finish_lasso(&mut self, start: Point, end: Point, additive: bool, base: &HashSet<ItemId>) {
        let rect = Rect::from_corners(start, end);
        let scale = self.viewport.scale();
        let slop = self.config.lasso_click_slop_px;
        if rect.width * scale < slop && rect.height * scale < slop {
            // A click on empty canvas.
            if additive {
                self.selection.select_all(base.iter().copied());
            } else {
                self.selection.clear();
            }
            return;
        }
        let candidates = self.candidates();
        self.selection.select_by_rect(&rect, candidates, additive.then_some(base));
    }

    /// Return to `Idle` without committing. Dragged Freeform items keep their
    /// last position and are still reported so the host stays in sync.
    fn abort_gesture(&mut self) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        let aborted = std::mem::take(&mut self.input);
        if let InputState::Dragging { ids, start, last, .. } = &aborted {
            self.finish_drag(ids, last != start, false, &mut events);
        }
        if !aborted.is_idle() {
            tracing::debug!(from = aborted.name(), "gesture aborted");
        }
        events
    }

    /// Drop ids the host removed from an in-progress drag.
    fn prune_gesture(&mut self) {
        let store = &self.store;
        self.payloads.retain(|p| store.contains(&p.item_id));
        if let InputState::Dragging { ids, .. } = &mut self.input {
            ids.retain(|id| store.contains(id));
            if ids.is_empty() {
                self.set_input(InputState::Idle);
                self.store.restore_layers();
            }
        }
    }

    // --- Derived state ---

    fn after_items_changed(&mut self) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        let store = &self.store;
        self.selection.retain(|id| store.contains(id));
        self.prune_gesture();
        self.place_missing(&mut events);
        if !matches!(self.input, InputState::Dragging { .. }) {
            self.relayout();
        }
        self.refresh_visible();
        self.flush_selection(&mut events);
        events.push(CanvasEvent::RenderNeeded);
        events
    }

    /// Auto-place unpositioned items on a Freeform board and report them.
    fn place_missing(&mut self, events: &mut Vec<CanvasEvent>) {
        if self.board.layout_mode != LayoutMode::Freeform {
            return;
        }
        let board_id = self.board.id;
        let placements = freeform::place_missing(&self.store.all(), board_id, &self.config.layout.freeform);
        for (id, position) in placements {
            self.store.set_position(&id, board_id, position);
            events.push(CanvasEvent::ItemMoved { id, board_id, position });
        }
    }

    fn relayout(&mut self) {
        let items = self.store.all();
        self.arrangement = layout::arrange(&items, &self.board, &self.config.layout, self.now);
    }

    fn refresh_visible(&mut self) {
        let candidates = self.candidates();
        self.visible.recompute(candidates, &self.viewport, self.config.cull_margin);
    }

    fn flush_selection(&mut self, events: &mut Vec<CanvasEvent>) {
        if let Some(ids) = self.selection.take_change() {
            events.push(CanvasEvent::SelectionChanged { ids });
        }
    }

    fn zoom_around(&mut self, requested: f64, anchor: Point) -> Vec<CanvasEvent> {
        if !self.viewport.zoom_to(requested, anchor) {
            return Vec::new();
        }
        self.refresh_visible();
        let scale = self.viewport.scale();
        tracing::debug!(scale, "zoom changed");
        vec![CanvasEvent::ZoomChanged { scale }, CanvasEvent::RenderNeeded]
    }

    fn selected_in_draw_order(&self) -> Vec<ItemId> {
        self.store.ids().into_iter().filter(|id| self.selection.contains(id)).collect()
    }

    /// `(id, bounds)` for every laid-out item, in draw order.
    fn candidates(&self) -> Vec<(ItemId, Rect)> {
        self.store
            .all()
            .into_iter()
            .filter_map(|item| self.bounds_of(item).map(|b| (item.id, b)))
            .collect()
    }

    fn bounds_of(&self, item: &Item) -> Option<Rect> {
        let (origin, size) = match self.board.layout_mode {
            LayoutMode::Freeform => (item.position(&self.board.id)?, item.size),
            LayoutMode::Kanban => {
                let k = &self.config.layout.kanban;
                (self.arrangement.origin(&item.id)?, Size::new(k.column_width, k.card_height))
            }
            LayoutMode::Grid => {
                let g = &self.config.layout.grid;
                (self.arrangement.origin(&item.id)?, Size::new(g.cell_width, g.cell_height))
            }
        };
        Some(Rect::from_origin_size(origin, size))
    }
}

/// The full canvas engine: a core plus the host surface and event listeners.
pub struct Engine<S: Surface> {
    pub core: EngineCore,
    surface: S,
    listeners: Listeners,
}

impl<S: Surface> Engine<S> {
    /// Create an engine drawing to `surface`.
    #[must_use]
    pub fn new(core: EngineCore, surface: S) -> Self {
        Self { core, surface, listeners: Listeners::new() }
    }

    // --- Listeners ---

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: EventSink + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn dispatch(&mut self, events: Vec<CanvasEvent>) -> Vec<CanvasEvent> {
        self.listeners.dispatch(&events);
        events
    }

    // --- Delegated data inputs ---

    pub fn set_items(&mut self, items: Vec<Item>) -> Vec<CanvasEvent> {
        let events = self.core.set_items(items);
        self.dispatch(events)
    }

    pub fn upsert_items(&mut self, items: Vec<Item>) -> Vec<CanvasEvent> {
        let events = self.core.upsert_items(items);
        self.dispatch(events)
    }

    pub fn remove_items(&mut self, ids: &[ItemId]) -> Vec<CanvasEvent> {
        let events = self.core.remove_items(ids);
        self.dispatch(events)
    }

    pub fn apply_delete(&mut self, id: &ItemId) -> Vec<CanvasEvent> {
        let events = self.core.apply_delete(id);
        self.dispatch(events)
    }

    pub fn set_board(&mut self, board: Board) -> Vec<CanvasEvent> {
        let events = self.core.set_board(board);
        self.dispatch(events)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<CanvasEvent> {
        let events = self.core.set_viewport(width, height);
        self.dispatch(events)
    }

    pub fn set_clock(&mut self, now: i64) -> Vec<CanvasEvent> {
        let events = self.core.set_clock(now);
        self.dispatch(events)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<CanvasEvent> {
        let events = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.dispatch(events)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let events = self.core.on_pointer_move(screen_pt);
        self.dispatch(events)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let events = self.core.on_pointer_up(screen_pt);
        self.dispatch(events)
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<CanvasEvent> {
        let events = self.core.on_double_click(screen_pt);
        self.dispatch(events)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<CanvasEvent> {
        let events = self.core.on_wheel(screen_pt, delta, modifiers);
        self.dispatch(events)
    }

    pub fn on_magnify(&mut self, screen_pt: Point, factor: f64) -> Vec<CanvasEvent> {
        let events = self.core.on_magnify(screen_pt, factor);
        self.dispatch(events)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<CanvasEvent> {
        let events = self.core.on_key_down(key, modifiers);
        self.dispatch(events)
    }

    pub fn on_focus_lost(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.on_focus_lost();
        self.dispatch(events)
    }

    // --- Delegated zoom commands ---

    pub fn zoom_to(&mut self, scale: f64) -> Vec<CanvasEvent> {
        let events = self.core.zoom_to(scale);
        self.dispatch(events)
    }

    pub fn zoom_by(&mut self, factor: f64) -> Vec<CanvasEvent> {
        let events = self.core.zoom_by(factor);
        self.dispatch(events)
    }

    pub fn zoom_in(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.zoom_in();
        self.dispatch(events)
    }

    pub fn zoom_out(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.zoom_out();
        self.dispatch(events)
    }

    pub fn reset_zoom(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.reset_zoom();
        self.dispatch(events)
    }

    pub fn zoom_to_fit(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.zoom_to_fit();
        self.dispatch(events)
    }

    pub fn request_create_at_center(&mut self) -> Vec<CanvasEvent> {
        let events = self.core.request_create_at_center();
        self.dispatch(events)
    }

    // --- Render ---

    /// Draw the current state to the surface.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if any drawing call fails.
    pub fn render(&mut self) -> Result<(), S::Error> {
        render::draw(&mut self.surface, &self.core.scene())
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selected_ids(&self) -> BTreeSet<ItemId> {
        self.core.selected_ids()
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        self.core.viewport()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.core.item(id)
    }
}
