//! Input model: modifier keys, mouse buttons, keys, and the gesture state machine.
//!
//! `Modifiers`, `Button` and `Key` capture the raw event as the host reports it.
//! `InputState` is the active gesture between pointer-down and pointer-up,
//! carrying everything needed to apply per-frame deltas and commit on release.
//! The transitions themselves live in [`crate::engine::EngineCore`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::doc::ItemId;
use crate::geometry::{Point, Rect};

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Cmd on macOS, Ctrl elsewhere; either counts.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// The pan modifier: a primary-button drag with Alt held pans the canvas.
    #[must_use]
    pub fn pan(self) -> bool {
        self.alt
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Delete"`, `"Escape"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    /// The "A" key in either case, as used by select-all.
    #[must_use]
    pub fn is_a(&self) -> bool {
        self.0.eq_ignore_ascii_case("a")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Gesture state machine.
///
/// Exactly one variant is active. Each active variant carries the context
/// needed to compute deltas and emit final events on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// The user is moving one or more items.
    Dragging {
        /// Every item being moved (the whole selection at drag start).
        ids: Vec<ItemId>,
        /// The item under the pointer at drag start.
        anchor: ItemId,
        /// Canvas-space pointer position at drag start.
        start: Point,
        /// Canvas-space pointer position at the previous event.
        last: Point,
    },
    /// The user is dragging a rubber-band rectangle.
    LassoSelecting {
        /// Canvas-space corner where the drag started.
        start: Point,
        /// Canvas-space corner under the pointer.
        current: Point,
        /// Shift was held at lasso start.
        additive: bool,
        /// Selection captured at lasso start; unioned in when `additive`.
        base: HashSet<ItemId>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Dragging { .. } => "dragging",
            Self::LassoSelecting { .. } => "lasso",
        }
    }

    /// Canvas-space lasso rectangle while lasso-selecting.
    #[must_use]
    pub fn lasso_rect(&self) -> Option<Rect> {
        match self {
            Self::LassoSelecting { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// Items being dragged, if any.
    #[must_use]
    pub fn dragged_ids(&self) -> &[ItemId] {
        match self {
            Self::Dragging { ids, .. } => ids,
            _ => &[],
        }
    }
}
