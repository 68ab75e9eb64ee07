//! Input scripts: one JSON object per line, each a host call to replay.
//!
//! ```text
//! {"op":"down","x":50,"y":50}
//! {"op":"move","x":120,"y":80}
//! {"op":"up","x":120,"y":80}
//! {"op":"key","key":"a","modifiers":{"meta":true}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use serde::Deserialize;

use notecanvas::board::Board;
use notecanvas::doc::ItemId;
use notecanvas::engine::Engine;
use notecanvas::events::CanvasEvent;
use notecanvas::geometry::Point;
use notecanvas::input::{Button, Key, Modifiers, WheelDelta};
use notecanvas::render::Surface;

/// One scripted host call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Magnify {
        x: f64,
        y: f64,
        factor: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    FocusLost,
    Resize {
        width: f64,
        height: f64,
    },
    Clock {
        now: i64,
    },
    ZoomTo {
        scale: f64,
    },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ZoomToFit,
    CreateAtCenter,
    /// The host confirms a deletion.
    Remove {
        ids: Vec<ItemId>,
    },
    /// The host switches board or layout mode.
    Board {
        board: Board,
    },
}

/// Parse one script line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns the JSON error when the line is not a valid step.
pub fn parse_line(line: &str) -> Result<Option<Step>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Feed one step to the engine and return the events it produced.
pub fn apply<S: Surface>(engine: &mut Engine<S>, step: Step) -> Vec<CanvasEvent> {
    match step {
        Step::Down { x, y, button, modifiers } => engine.on_pointer_down(Point::new(x, y), button, modifiers),
        Step::Move { x, y } => engine.on_pointer_move(Point::new(x, y)),
        Step::Up { x, y } => engine.on_pointer_up(Point::new(x, y)),
        Step::DoubleClick { x, y } => engine.on_double_click(Point::new(x, y)),
        Step::Wheel { x, y, dx, dy, modifiers } => engine.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers),
        Step::Magnify { x, y, factor } => engine.on_magnify(Point::new(x, y), factor),
        Step::Key { key, modifiers } => engine.on_key_down(&Key(key), modifiers),
        Step::FocusLost => engine.on_focus_lost(),
        Step::Resize { width, height } => engine.set_viewport(width, height),
        Step::Clock { now } => engine.set_clock(now),
        Step::ZoomTo { scale } => engine.zoom_to(scale),
        Step::ZoomIn => engine.zoom_in(),
        Step::ZoomOut => engine.zoom_out(),
        Step::ResetZoom => engine.reset_zoom(),
        Step::ZoomToFit => engine.zoom_to_fit(),
        Step::CreateAtCenter => engine.request_create_at_center(),
        Step::Remove { ids } => engine.remove_items(&ids),
        Step::Board { board } => engine.set_board(board),
    }
}

/// Ids a batch of events asks the host to delete.
#[must_use]
pub fn requested_deletes(events: &[CanvasEvent]) -> Vec<ItemId> {
    events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::RequestDeleteItems { ids } => Some(ids.as_slice()),
            _ => None,
        })
        .flatten()
        .copied()
        .collect()
}
