#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use super::*;
use crate::board::{BucketRule, Section};
use crate::doc::{BoardId, Priority};
use crate::render::DisplayList;

// =============================================================
// Helpers
// =============================================================

const BOARD: BoardId = Uuid::from_u128(0xB0);

fn id(n: u128) -> ItemId {
    Uuid::from_u128(n)
}

fn ids(ns: &[u128]) -> BTreeSet<ItemId> {
    ns.iter().map(|n| id(*n)).collect()
}

fn item(n: u128) -> Item {
    Item::new(id(n), format!("note {n}"))
}

fn item_at(n: u128, x: f64, y: f64) -> Item {
    let mut it = item(n);
    it.positions_by_board.insert(BOARD, Point::new(x, y));
    it
}

fn core_on(board: Board, items: Vec<Item>) -> EngineCore {
    let mut core = EngineCore::new(CanvasConfig::default(), board);
    core.set_viewport(800.0, 600.0);
    core.set_items(items);
    core
}

fn core_with(items: Vec<Item>) -> EngineCore {
    core_on(Board::freeform(BOARD), items)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn cmd_modifier() -> Modifiers {
    Modifiers { meta: true, ..Default::default() }
}

fn shift_modifier() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<CanvasEvent> {
    core.on_pointer_down(pt(x, y), Button::Primary, no_modifiers())
}

fn click(core: &mut EngineCore, x: f64, y: f64) {
    down(core, x, y);
    core.on_pointer_up(pt(x, y));
}

fn selection_changes(events: &[CanvasEvent]) -> Vec<BTreeSet<ItemId>> {
    events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::SelectionChanged { ids } => Some(ids.clone()),
            _ => None,
        })
        .collect()
}

fn moves(events: &[CanvasEvent]) -> Vec<(ItemId, Point)> {
    events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::ItemMoved { id, position, .. } => Some((*id, *position)),
            _ => None,
        })
        .collect()
}

fn has_render_needed(events: &[CanvasEvent]) -> bool {
    events.iter().any(|e| matches!(e, CanvasEvent::RenderNeeded))
}

fn position(core: &EngineCore, n: u128) -> Point {
    core.item(&id(n)).and_then(|it| it.position(&BOARD)).unwrap()
}

fn assert_close(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_default_is_idle_and_empty() {
    let core = EngineCore::default();
    assert!(core.input().is_idle());
    assert!(core.items().is_empty());
    assert!(core.selected_ids().is_empty());
    assert_eq!(core.viewport().scale(), 1.0);
    assert_eq!(core.board().layout_mode, LayoutMode::Freeform);
}

#[test]
fn core_new_kanban_board_has_buckets_before_items() {
    let core = EngineCore::new(CanvasConfig::default(), Board::kanban(BOARD, ["A", "B"]));
    assert_eq!(core.arrangement().buckets().len(), 2);
}

#[test]
fn core_new_uses_configured_zoom_limits() {
    let config = CanvasConfig { min_zoom: 0.5, max_zoom: 2.0, ..CanvasConfig::default() };
    let mut core = EngineCore::new(config, Board::freeform(BOARD));
    core.zoom_to(10.0);
    assert_eq!(core.viewport().scale(), 2.0);
}

// =============================================================
// EngineCore: item data
// =============================================================

#[test]
fn set_items_autoplaces_and_reports_new_positions() {
    let mut core = EngineCore::new(CanvasConfig::default(), Board::freeform(BOARD));
    let events = core.set_items(vec![item(1)]);
    assert_eq!(moves(&events), vec![(id(1), pt(40.0, 40.0))]);
    assert_eq!(position(&core, 1), pt(40.0, 40.0));
}

#[test]
fn set_items_keeps_existing_positions() {
    let mut core = EngineCore::new(CanvasConfig::default(), Board::freeform(BOARD));
    let events = core.set_items(vec![item_at(1, 500.0, 500.0)]);
    assert!(moves(&events).is_empty());
    assert_eq!(position(&core, 1), pt(500.0, 500.0));
}

#[test]
fn set_items_drops_selection_of_vanished_items() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    click(&mut core, 50.0, 50.0);
    let events = core.set_items(vec![item_at(2, 300.0, 0.0)]);
    assert_eq!(selection_changes(&events), vec![BTreeSet::new()]);
    assert!(!core.is_selected(&id(1)));
}

#[test]
fn upsert_items_keeps_the_rest() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    core.upsert_items(vec![item_at(2, 300.0, 0.0)]);
    assert_eq!(core.items().len(), 2);

    let mut renamed = item_at(1, 0.0, 0.0);
    renamed.title = "renamed".into();
    core.upsert_items(vec![renamed]);
    assert_eq!(core.items().len(), 2);
    assert_eq!(core.item(&id(1)).unwrap().title, "renamed");
}

#[test]
fn remove_selected_item_leaves_selection() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    click(&mut core, 50.0, 50.0);
    let events = core.remove_items(&[id(1)]);
    assert!(!core.is_selected(&id(1)));
    assert!(core.item(&id(1)).is_none());
    assert_eq!(selection_changes(&events), vec![BTreeSet::new()]);
}

#[test]
fn remove_unknown_item_is_noop() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.apply_delete(&id(99)).is_empty());
    assert_eq!(core.items().len(), 1);
}

#[test]
fn removing_dragged_item_ends_drag() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    core.apply_delete(&id(1));
    assert!(core.input().is_idle());
    assert!(core.on_pointer_move(pt(90.0, 90.0)).is_empty());
}

// =============================================================
// EngineCore: panning
// =============================================================

#[test]
fn middle_button_pans() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    let events = core.on_pointer_down(pt(100.0, 100.0), Button::Middle, no_modifiers());
    assert!(events.is_empty());
    assert!(matches!(core.input(), InputState::Panning { .. }));

    core.on_pointer_move(pt(150.0, 120.0));
    assert_eq!(core.viewport().offset(), pt(-50.0, -20.0));
    core.on_pointer_up(pt(150.0, 120.0));
    assert!(core.input().is_idle());
    assert!(core.selected_ids().is_empty());
}

#[test]
fn alt_primary_on_empty_canvas_pans() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    let alt = Modifiers { alt: true, ..Default::default() };
    let events = core.on_pointer_down(pt(500.0, 400.0), Button::Primary, alt);
    assert!(events.is_empty());
    assert!(matches!(core.input(), InputState::Panning { .. }));
    assert!(core.selected_ids().is_empty());
}

#[test]
fn alt_primary_on_an_item_selects_and_drags() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    let alt = Modifiers { alt: true, ..Default::default() };
    let events = core.on_pointer_down(pt(50.0, 50.0), Button::Primary, alt);
    assert!(matches!(core.input(), InputState::Dragging { .. }));
    assert_eq!(selection_changes(&events), vec![ids(&[1])]);
    assert_eq!(core.input().dragged_ids(), &[id(1)]);
}

#[test]
fn pan_divides_screen_delta_by_scale() {
    let mut core = core_with(Vec::new());
    core.zoom_to(2.0);
    let before = core.viewport().offset();
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers());
    core.on_pointer_move(pt(100.0, 0.0));
    assert_eq!(core.viewport().offset(), before - pt(50.0, 0.0));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.on_pointer_down(pt(50.0, 50.0), Button::Secondary, no_modifiers()).is_empty());
    assert!(core.input().is_idle());
}

#[test]
fn second_press_during_gesture_is_ignored() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    assert!(core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers()).is_empty());
    assert!(matches!(core.input(), InputState::Dragging { .. }));
}

// =============================================================
// EngineCore: press and drag
// =============================================================

#[test]
fn press_on_item_selects_exclusively_and_drags() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    click(&mut core, 350.0, 50.0);
    let events = down(&mut core, 50.0, 50.0);
    assert_eq!(selection_changes(&events), vec![ids(&[1])]);
    assert_eq!(core.input().dragged_ids(), &[id(1)]);
    assert!(has_render_needed(&events));
}

#[test]
fn press_hits_topmost_item() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 100.0, 50.0)]);
    down(&mut core, 150.0, 100.0);
    assert_eq!(core.selected_ids(), ids(&[2]));
}

#[test]
fn press_on_selected_item_drags_whole_selection() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    core.on_key_down(&key("a"), cmd_modifier());
    let events = down(&mut core, 50.0, 50.0);
    assert!(selection_changes(&events).is_empty());
    assert_eq!(core.input().dragged_ids(), &[id(1), id(2)]);
}

#[test]
fn cmd_press_toggles_into_selection_and_drags() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    click(&mut core, 50.0, 50.0);
    let events = core.on_pointer_down(pt(350.0, 50.0), Button::Primary, cmd_modifier());
    assert_eq!(selection_changes(&events), vec![ids(&[1, 2])]);
    assert_eq!(core.input().dragged_ids(), &[id(1), id(2)]);
}

#[test]
fn cmd_press_on_selected_item_keeps_selection_and_drags_it() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    core.on_key_down(&key("a"), cmd_modifier());
    let events = core.on_pointer_down(pt(50.0, 50.0), Button::Primary, Modifiers { ctrl: true, ..Default::default() });
    assert!(selection_changes(&events).is_empty());
    assert_eq!(core.selected_ids(), ids(&[1, 2]));
    assert_eq!(core.input().dragged_ids(), &[id(1), id(2)]);
}

#[test]
fn drag_moves_by_canvas_delta_and_reports_on_release() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    let during = core.on_pointer_move(pt(80.0, 70.0));
    assert!(moves(&during).is_empty());
    assert_eq!(position(&core, 1), pt(30.0, 20.0));

    let events = core.on_pointer_up(pt(80.0, 70.0));
    assert_eq!(moves(&events), vec![(id(1), pt(30.0, 20.0))]);
    assert!(core.input().is_idle());
    assert!(core.is_selected(&id(1)));
}

#[test]
fn drag_tracks_cursor_when_zoomed() {
    let mut core = core_with(vec![item_at(1, 250.0, 200.0)]);
    core.zoom_to(2.0);
    // Anchored at the screen centre: offset = (400, 300) - (400, 300) / 2.
    assert_eq!(core.viewport().offset(), pt(200.0, 150.0));
    down(&mut core, 110.0, 110.0);
    core.on_pointer_move(pt(150.0, 110.0));
    assert_eq!(position(&core, 1), pt(270.0, 200.0));
}

#[test]
fn drag_delta_accumulates_across_frames() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 10.0, 10.0);
    let steps = [(1.0, 2.0), (3.0, -1.0), (10.0, 5.0), (-4.0, 0.0), (0.0, 7.0)];
    let mut cursor = pt(10.0, 10.0);
    for (dx, dy) in steps {
        cursor = cursor + pt(dx, dy);
        core.on_pointer_move(cursor);
    }
    core.on_pointer_up(cursor);
    assert_eq!(position(&core, 1), pt(10.0, 13.0));
}

#[test]
fn release_without_movement_reports_nothing() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    let events = core.on_pointer_up(pt(50.0, 50.0));
    assert!(moves(&events).is_empty());
}

#[test]
fn multi_drag_moves_every_selected_item() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    core.on_key_down(&key("A"), cmd_modifier());
    down(&mut core, 50.0, 50.0);
    core.on_pointer_move(pt(60.0, 65.0));
    let events = core.on_pointer_up(pt(60.0, 65.0));
    assert_eq!(moves(&events), vec![(id(1), pt(10.0, 15.0)), (id(2), pt(310.0, 15.0))]);
}

#[test]
fn drag_raises_items_until_release() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 100.0, 50.0)]);
    down(&mut core, 20.0, 20.0);
    let order: Vec<ItemId> = core.items().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![id(2), id(1)]);

    core.on_pointer_up(pt(20.0, 20.0));
    let order: Vec<ItemId> = core.items().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![id(1), id(2)]);
}

#[test]
fn dragging_off_screen_updates_visible_set() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    core.on_pointer_move(pt(5050.0, 50.0));
    assert_eq!(core.visible_items(), vec![id(2)]);
}

// =============================================================
// EngineCore: lasso
// =============================================================

fn lasso_fixture() -> EngineCore {
    core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0), item_at(3, 0.0, 400.0)])
}

#[test]
fn press_on_empty_canvas_clears_and_starts_lasso() {
    let mut core = lasso_fixture();
    click(&mut core, 50.0, 50.0);
    let events = down(&mut core, 250.0, 250.0);
    assert_eq!(selection_changes(&events), vec![BTreeSet::new()]);
    assert!(matches!(core.input(), InputState::LassoSelecting { additive: false, .. }));
}

#[test]
fn lasso_selects_live_and_finalizes() {
    let mut core = lasso_fixture();
    down(&mut core, 250.0, -50.0);

    let events = core.on_pointer_move(pt(600.0, 100.0));
    assert_eq!(selection_changes(&events), vec![ids(&[2])]);

    let events = core.on_pointer_move(pt(100.0, 100.0));
    assert_eq!(selection_changes(&events), vec![ids(&[1])]);

    let events = core.on_pointer_up(pt(100.0, 100.0));
    assert!(selection_changes(&events).is_empty());
    assert_eq!(core.selected_ids(), ids(&[1]));
    assert!(core.lasso_rect().is_none());
}

#[test]
fn lasso_coalesces_changes_into_one_event_per_move() {
    let mut core = lasso_fixture();
    down(&mut core, 600.0, 250.0);
    let events = core.on_pointer_move(pt(-10.0, -10.0));
    assert_eq!(selection_changes(&events), vec![ids(&[1, 2])]);
    assert!(core.on_pointer_move(pt(-12.0, -10.0)).iter().all(|e| !matches!(e, CanvasEvent::SelectionChanged { .. })));
}

#[test]
fn shift_lasso_adds_to_existing_selection() {
    let mut core = lasso_fixture();
    click(&mut core, 50.0, 450.0);
    let events = core.on_pointer_down(pt(250.0, -50.0), Button::Primary, shift_modifier());
    assert!(selection_changes(&events).is_empty());

    core.on_pointer_move(pt(600.0, 100.0));
    core.on_pointer_up(pt(600.0, 100.0));
    assert_eq!(core.selected_ids(), ids(&[2, 3]));
}

#[test]
fn lasso_rect_is_normalized() {
    let mut core = lasso_fixture();
    down(&mut core, 250.0, 250.0);
    core.on_pointer_move(pt(230.0, 200.0));
    assert_eq!(core.lasso_rect(), Some(Rect::new(230.0, 200.0, 20.0, 50.0)));
}

#[test]
fn degenerate_lasso_is_a_background_click() {
    let mut core = lasso_fixture();
    click(&mut core, 50.0, 50.0);
    down(&mut core, 700.0, 500.0);
    core.on_pointer_move(pt(701.0, 501.0));
    let events = core.on_pointer_up(pt(702.0, 501.0));
    assert!(selection_changes(&events).is_empty());
    assert!(core.selected_ids().is_empty());
    assert!(core.input().is_idle());
}

#[test]
fn degenerate_additive_lasso_keeps_selection() {
    let mut core = lasso_fixture();
    click(&mut core, 50.0, 50.0);
    core.on_pointer_down(pt(700.0, 500.0), Button::Primary, shift_modifier());
    let events = core.on_pointer_up(pt(701.0, 500.0));
    assert!(selection_changes(&events).is_empty());
    assert_eq!(core.selected_ids(), ids(&[1]));
}

#[test]
fn lasso_slop_is_measured_on_screen() {
    let mut core = lasso_fixture();
    core.zoom_to(3.0);
    // 2 canvas units at 3x is 6 screen pixels: a real lasso, not a click.
    let start = core.viewport().canvas_to_screen(pt(201.0, 100.0));
    core.on_pointer_down(start, Button::Primary, no_modifiers());
    let end = core.viewport().canvas_to_screen(pt(199.0, 102.0));
    core.on_pointer_move(end);
    core.on_pointer_up(end);
    assert_eq!(core.selected_ids(), ids(&[1]));
}

// =============================================================
// EngineCore: keyboard and focus
// =============================================================

#[test]
fn escape_aborts_drag_keeping_position() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    core.on_pointer_move(pt(80.0, 90.0));
    let events = core.on_key_down(&key("Escape"), no_modifiers());
    assert_eq!(moves(&events), vec![(id(1), pt(30.0, 40.0))]);
    assert_eq!(selection_changes(&events), vec![BTreeSet::new()]);
    assert!(core.input().is_idle());
    assert_eq!(position(&core, 1), pt(30.0, 40.0));
}

#[test]
fn escape_when_idle_clears_selection() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    click(&mut core, 50.0, 50.0);
    let events = core.on_key_down(&key("Escape"), no_modifiers());
    assert_eq!(selection_changes(&events), vec![BTreeSet::new()]);
}

#[test]
fn escape_aborts_lasso() {
    let mut core = lasso_fixture();
    down(&mut core, 250.0, 250.0);
    core.on_pointer_move(pt(-10.0, -10.0));
    core.on_key_down(&key("Escape"), no_modifiers());
    assert!(core.input().is_idle());
    assert!(core.selected_ids().is_empty());
}

#[test]
fn delete_requests_removal_without_touching_store() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0), item_at(3, 600.0, 0.0)]);
    click(&mut core, 350.0, 50.0);
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary, cmd_modifier());
    core.on_pointer_up(pt(50.0, 50.0));

    let events = core.on_key_down(&key("Delete"), no_modifiers());
    assert_eq!(events, vec![CanvasEvent::RequestDeleteItems { ids: vec![id(1), id(2)] }]);
    assert_eq!(core.items().len(), 3);
    assert_eq!(core.selected_ids(), ids(&[1, 2]));
}

#[test]
fn backspace_also_requests_delete() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    click(&mut core, 50.0, 50.0);
    let events = core.on_key_down(&key("Backspace"), no_modifiers());
    assert_eq!(events, vec![CanvasEvent::RequestDeleteItems { ids: vec![id(1)] }]);
}

#[test]
fn delete_without_selection_is_noop() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.on_key_down(&key("Delete"), no_modifiers()).is_empty());
}

#[test]
fn delete_is_ignored_mid_gesture() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    assert!(core.on_key_down(&key("Delete"), no_modifiers()).is_empty());
}

#[test]
fn select_all_selects_every_item_once() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0)]);
    let events = core.on_key_down(&key("a"), Modifiers { ctrl: true, ..Default::default() });
    assert_eq!(selection_changes(&events), vec![ids(&[1, 2])]);
    assert!(core.on_key_down(&key("a"), cmd_modifier()).is_empty());
}

#[test]
fn plain_a_does_nothing() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.on_key_down(&key("a"), no_modifiers()).is_empty());
    assert!(core.selected_ids().is_empty());
}

#[test]
fn focus_loss_aborts_drag_but_keeps_selection() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    down(&mut core, 50.0, 50.0);
    core.on_pointer_move(pt(60.0, 50.0));
    let events = core.on_focus_lost();
    assert_eq!(moves(&events), vec![(id(1), pt(10.0, 0.0))]);
    assert!(core.input().is_idle());
    assert_eq!(core.selected_ids(), ids(&[1]));
}

#[test]
fn focus_loss_when_idle_is_noop() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.on_focus_lost().is_empty());
}

// =============================================================
// EngineCore: double-click
// =============================================================

#[test]
fn double_click_on_empty_canvas_requests_create() {
    let mut core = core_with(vec![item_at(1, 500.0, 500.0)]);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 100.0 }, no_modifiers());
    let events = core.on_double_click(pt(10.0, 20.0));
    assert_eq!(events, vec![CanvasEvent::RequestCreateItem { board_id: BOARD, at: pt(10.0, 120.0) }]);
}

#[test]
fn double_click_on_item_does_not_create() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    assert!(core.on_double_click(pt(50.0, 50.0)).is_empty());
}

#[test]
fn request_create_at_center_uses_canvas_space() {
    let mut core = core_with(Vec::new());
    core.zoom_to(2.0);
    let events = core.request_create_at_center();
    assert_eq!(events, vec![CanvasEvent::RequestCreateItem { board_id: BOARD, at: pt(400.0, 300.0) }]);
}

// =============================================================
// EngineCore: wheel and zoom
// =============================================================

#[test]
fn plain_wheel_pans() {
    let mut core = core_with(Vec::new());
    let events = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 30.0, dy: 100.0 }, no_modifiers());
    assert_eq!(core.viewport().offset(), pt(30.0, 100.0));
    assert_eq!(events, vec![CanvasEvent::RenderNeeded]);
}

#[test]
fn zero_wheel_is_noop() {
    let mut core = core_with(Vec::new());
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta::default(), no_modifiers()).is_empty());
}

#[test]
fn cmd_wheel_zooms_around_pointer() {
    let mut core = core_with(Vec::new());
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 15.0, dy: 40.0 }, no_modifiers());
    let anchor = pt(200.0, 150.0);
    let before = core.viewport().screen_to_canvas(anchor);

    let events = core.on_wheel(anchor, WheelDelta { dx: 0.0, dy: -100.0 }, cmd_modifier());
    let scale = core.viewport().scale();
    assert!((scale - 0.15_f64.exp()).abs() < 1e-12);
    assert_eq!(events, vec![CanvasEvent::ZoomChanged { scale }, CanvasEvent::RenderNeeded]);
    assert_close(core.viewport().screen_to_canvas(anchor), before);
}

#[test]
fn zoom_clamps_to_limits() {
    let mut core = core_with(Vec::new());
    let events = core.zoom_to(10.0);
    assert_eq!(events[0], CanvasEvent::ZoomChanged { scale: 3.0 });
    core.zoom_to(0.01);
    assert_eq!(core.viewport().scale(), 0.25);
}

#[test]
fn zoom_at_limit_reports_nothing() {
    let mut core = core_with(Vec::new());
    core.zoom_to(3.0);
    assert!(core.zoom_in().is_empty());
}

#[test]
fn zoom_steps_and_reset() {
    let mut core = core_with(Vec::new());
    core.zoom_in();
    assert_eq!(core.viewport().scale(), 1.25);
    core.zoom_out();
    assert!((core.viewport().scale() - 1.0).abs() < 1e-12);
    core.zoom_by(2.0);
    core.reset_zoom();
    assert_eq!(core.viewport().scale(), 1.0);
}

#[test]
fn magnify_zooms_around_anchor() {
    let mut core = core_with(Vec::new());
    let anchor = pt(600.0, 100.0);
    let before = core.viewport().screen_to_canvas(anchor);
    core.on_magnify(anchor, 1.5);
    assert_eq!(core.viewport().scale(), 1.5);
    assert_close(core.viewport().screen_to_canvas(anchor), before);
}

#[test]
fn zoom_to_fit_brings_everything_on_screen() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 1000.0, 800.0)]);
    let events = core.zoom_to_fit();
    assert!(events.iter().any(|e| matches!(e, CanvasEvent::ZoomChanged { .. })));

    let top_left = core.viewport().canvas_to_screen(pt(0.0, 0.0));
    let bottom_right = core.viewport().canvas_to_screen(pt(1200.0, 950.0));
    assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
    assert!(bottom_right.x <= 800.0 && bottom_right.y <= 600.0);
    assert_eq!(core.visible_items(), vec![id(1), id(2)]);
}

#[test]
fn zoom_to_fit_with_nothing_is_noop() {
    let mut core = core_with(Vec::new());
    assert!(core.zoom_to_fit().is_empty());
}

// =============================================================
// EngineCore: culling
// =============================================================

#[test]
fn resize_recomputes_visible_set() {
    let mut core = EngineCore::new(CanvasConfig::default(), Board::freeform(BOARD));
    core.set_items(vec![item_at(1, 10.0, 10.0)]);
    assert!(core.visible_items().is_empty());
    core.set_viewport(800.0, 600.0);
    assert_eq!(core.visible_items(), vec![id(1)]);
}

#[test]
fn pan_recomputes_visible_set() {
    let mut core = core_with(vec![item_at(1, 10.0, 10.0), item_at(2, 3000.0, 10.0)]);
    assert_eq!(core.visible_items(), vec![id(1)]);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 2800.0, dy: 0.0 }, no_modifiers());
    assert_eq!(core.visible_items(), vec![id(2)]);
}

// =============================================================
// EngineCore: layout modes
// =============================================================

#[test]
fn mode_switch_round_trip_restores_freeform_positions() {
    let mut core = core_with(vec![item_at(1, 10.0, 20.0), item_at(2, 500.0, 300.0)]);
    let events = core.set_board(Board::kanban(BOARD, ["To Do", "Doing"]));
    assert!(events.contains(&CanvasEvent::LayoutChanged { board_id: BOARD, mode: LayoutMode::Kanban }));
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(0.0, 40.0));
    assert_eq!(position(&core, 1), pt(10.0, 20.0));

    let events = core.set_board(Board::freeform(BOARD));
    assert!(moves(&events).is_empty());
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(10.0, 20.0));
    assert_eq!(core.item_bounds(&id(2)).unwrap().origin(), pt(500.0, 300.0));
}

#[test]
fn same_board_again_reports_no_layout_change() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0)]);
    let events = core.set_board(Board::freeform(BOARD));
    assert!(!events.iter().any(|e| matches!(e, CanvasEvent::LayoutChanged { .. })));
}

#[test]
fn kanban_board_defers_freeform_placement() {
    let mut core = core_on(Board::kanban(BOARD, ["To Do"]), Vec::new());
    let events = core.set_items(vec![item(1)]);
    assert!(moves(&events).is_empty());

    let events = core.set_board(Board::freeform(BOARD));
    assert_eq!(moves(&events), vec![(id(1), pt(40.0, 40.0))]);
}

#[test]
fn empty_kanban_columns_fall_back_to_unsorted() {
    let core = core_on(Board::kanban(BOARD, Vec::<String>::new()), vec![item(1)]);
    assert_eq!(core.arrangement().bucket_of(&id(1)).unwrap().name, "Unsorted");
}

fn kanban_core() -> EngineCore {
    let mut todo = item(1);
    todo.status = Some("To Do".into());
    core_on(Board::kanban(BOARD, ["To Do", "Doing", "Done"]), vec![todo])
}

#[test]
fn kanban_drop_in_other_column_reports_bucket_change() {
    let mut core = kanban_core();
    down(&mut core, 100.0, 100.0);
    core.on_pointer_move(pt(588.0, 100.0));
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(488.0, 40.0));

    let events = core.on_pointer_up(pt(588.0, 100.0));
    assert!(events.contains(&CanvasEvent::ItemBucketChanged {
        id: id(1),
        board_id: BOARD,
        from: "To Do".into(),
        to: "Done".into(),
        rule: None,
    }));
    assert!(moves(&events).is_empty());
    // Snaps back until the host pushes the edited item.
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(0.0, 40.0));
    assert!(core.item(&id(1)).unwrap().positions_by_board.is_empty());
}

#[test]
fn kanban_drop_in_same_column_reports_nothing() {
    let mut core = kanban_core();
    down(&mut core, 100.0, 100.0);
    core.on_pointer_move(pt(120.0, 300.0));
    let events = core.on_pointer_up(pt(120.0, 300.0));
    assert!(!events.iter().any(|e| matches!(e, CanvasEvent::ItemBucketChanged { .. })));
}

#[test]
fn kanban_drag_aborted_by_escape_snaps_back() {
    let mut core = kanban_core();
    down(&mut core, 100.0, 100.0);
    core.on_pointer_move(pt(588.0, 100.0));
    let events = core.on_key_down(&key("Escape"), no_modifiers());
    assert!(!events.iter().any(|e| matches!(e, CanvasEvent::ItemBucketChanged { .. })));
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(0.0, 40.0));
}

#[test]
fn grid_drop_into_date_section_is_rejected() {
    let mut high = item(1);
    high.priority = Priority::High;
    let mut late = item(2);
    late.due = Some(-10);
    let board = Board::grid(
        BOARD,
        vec![
            Section::new("High", BucketRule::Priority(Priority::High)),
            Section::new("Overdue", BucketRule::Overdue),
        ],
    );
    let mut core = core_on(board, vec![high, late]);
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(0.0, 36.0));
    assert_eq!(core.item_bounds(&id(2)).unwrap().origin(), pt(0.0, 254.0));

    down(&mut core, 100.0, 100.0);
    core.on_pointer_move(pt(100.0, 350.0));
    let events = core.on_pointer_up(pt(100.0, 350.0));
    assert!(!events.iter().any(|e| matches!(e, CanvasEvent::ItemBucketChanged { .. })));
    assert_eq!(core.item_bounds(&id(1)).unwrap().origin(), pt(0.0, 36.0));
}

#[test]
fn clock_change_rebuckets_grid() {
    let mut due = item(1);
    due.due = Some(1_000);
    let board = Board::grid(
        BOARD,
        vec![Section::new("Overdue", BucketRule::Overdue), Section::new("Rest", BucketRule::Any)],
    );
    let mut core = core_on(board, vec![due]);
    assert_eq!(core.arrangement().bucket_of(&id(1)).unwrap().name, "Rest");

    assert_eq!(core.set_clock(2_000), vec![CanvasEvent::RenderNeeded]);
    assert_eq!(core.clock(), 2_000);
    assert_eq!(core.arrangement().bucket_of(&id(1)).unwrap().name, "Overdue");
    assert!(core.set_clock(2_000).is_empty());
}

// =============================================================
// EngineCore: scene
// =============================================================

#[test]
fn scene_holds_visible_cards_with_selection_flags() {
    let mut core = core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0), item_at(3, 9000.0, 9000.0)]);
    click(&mut core, 50.0, 50.0);
    let scene = core.scene();
    let cards: Vec<(ItemId, bool)> = scene.cards.iter().map(|c| (c.id, c.selected)).collect();
    assert_eq!(cards, vec![(id(1), true), (id(2), false)]);
    assert!(scene.lasso.is_none());
    assert_eq!(scene.screen, Size::new(800.0, 600.0));
}

#[test]
fn scene_carries_lasso_overlay() {
    let mut core = core_with(Vec::new());
    down(&mut core, 10.0, 10.0);
    core.on_pointer_move(pt(50.0, 40.0));
    assert_eq!(core.scene().lasso, Some(Rect::new(10.0, 10.0, 40.0, 30.0)));
}

// =============================================================
// Engine: listeners and rendering
// =============================================================

#[test]
fn engine_dispatches_events_to_listeners() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut engine = Engine::new(core_with(vec![item_at(1, 0.0, 0.0)]), DisplayList::new());
    engine.subscribe(move |e: &CanvasEvent| sink.borrow_mut().push(e.clone()));

    let returned = engine.on_key_down(&key("a"), cmd_modifier());
    assert_eq!(*log.borrow(), returned);
    assert_eq!(engine.selected_ids(), ids(&[1]));
}

#[test]
fn engine_unsubscribed_listener_hears_nothing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut engine = Engine::new(core_with(Vec::new()), DisplayList::new());
    let listener = engine.subscribe(move |e: &CanvasEvent| sink.borrow_mut().push(e.clone()));
    assert!(engine.unsubscribe(listener));
    engine.zoom_in();
    assert!(log.borrow().is_empty());
}

#[test]
fn engine_render_draws_visible_cards_and_outlines() {
    let mut engine = Engine::new(
        core_with(vec![item_at(1, 0.0, 0.0), item_at(2, 300.0, 0.0), item_at(3, 9000.0, 0.0)]),
        DisplayList::new(),
    );
    engine.on_key_down(&key("a"), cmd_modifier());
    let Ok(()) = engine.render();
    let list = engine.surface();
    assert_eq!(list.card_count(), 2);
    let outlines = list
        .commands
        .iter()
        .filter(|c| matches!(c, crate::render::DrawCommand::Selection { .. }))
        .count();
    assert_eq!(outlines, 2);
}
