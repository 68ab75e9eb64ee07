//! Rendering: draws a scene snapshot through a host-provided surface.
//!
//! [`draw`] is the only drawing path. It receives a read-only [`Scene`] built by
//! [`crate::engine::EngineCore::scene`] and issues primitive calls on a
//! [`Surface`]; it never mutates engine state. The host implements `Surface`
//! over its native 2D context. [`DisplayList`] is a recording surface used by
//! the CLI and tests.
//!
//! Every fallible surface call propagates the host's error type with `?`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::convert::Infallible;

use serde::Serialize;

use crate::doc::{ItemId, NoteColor};
use crate::geometry::{Point, Rect, Size, rect_intersects};
use crate::layout::Bucket;

// =============================================================
// Surface
// =============================================================

/// Drawing primitives the engine needs from the host.
///
/// All geometry after [`Surface::set_transform`] is in canvas space.
pub trait Surface {
    type Error;

    /// Clear the whole screen (screen space).
    fn clear(&mut self, screen: Size) -> Result<(), Self::Error>;

    /// Map canvas space to screen space: `screen = (canvas - offset) * scale`.
    fn set_transform(&mut self, scale: f64, offset: Point) -> Result<(), Self::Error>;

    /// Kanban column or Grid section background with its title.
    fn draw_bucket(&mut self, frame: Rect, name: &str) -> Result<(), Self::Error>;

    /// A note card.
    fn fill_card(&mut self, bounds: Rect, fill: &str, title: &str) -> Result<(), Self::Error>;

    /// Selection outline; `width` is already in canvas units.
    fn stroke_selection(&mut self, bounds: Rect, width: f64) -> Result<(), Self::Error>;

    /// Translucent rubber-band rectangle.
    fn fill_lasso(&mut self, rect: Rect) -> Result<(), Self::Error>;
}

// =============================================================
// Scene
// =============================================================

/// A card as it should appear this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a> {
    pub id: ItemId,
    pub bounds: Rect,
    pub title: &'a str,
    pub color: NoteColor,
    pub selected: bool,
}

/// Read-only snapshot of everything [`draw`] needs.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub screen: Size,
    pub scale: f64,
    pub offset: Point,
    /// Canvas-space culling area; buckets outside it are skipped.
    pub area: Rect,
    pub buckets: &'a [Bucket],
    /// Visible cards in draw order, bottom first.
    pub cards: Vec<CardView<'a>>,
    pub lasso: Option<Rect>,
    /// Selection outline width in screen pixels.
    pub outline_px: f64,
}

/// Draw the scene: bucket backgrounds, cards, selection outlines, lasso.
///
/// Selection outlines are drawn after every card so a selected card lower in
/// the stack still shows its outline.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<(), S::Error> {
    surface.clear(scene.screen)?;
    surface.set_transform(scene.scale, scene.offset)?;

    for bucket in scene.buckets.iter().filter(|b| rect_intersects(&b.frame, &scene.area)) {
        surface.draw_bucket(bucket.frame, &bucket.name)?;
    }

    for card in &scene.cards {
        surface.fill_card(card.bounds, card.color.hex(), card.title)?;
    }

    let width = scene.outline_px / scene.scale;
    for card in scene.cards.iter().filter(|c| c.selected) {
        surface.stroke_selection(card.bounds, width)?;
    }

    if let Some(rect) = scene.lasso {
        surface.fill_lasso(rect)?;
    }
    Ok(())
}

// =============================================================
// Display list
// =============================================================

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { screen: Size },
    SetTransform { scale: f64, offset: Point },
    Bucket { frame: Rect, name: String },
    Card { bounds: Rect, fill: String, title: String },
    Selection { bounds: Rect, width: f64 },
    Lasso { rect: Rect },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards drawn.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Card { .. })).count()
    }
}

impl Surface for DisplayList {
    type Error = Infallible;

    fn clear(&mut self, screen: Size) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Clear { screen });
        Ok(())
    }

    fn set_transform(&mut self, scale: f64, offset: Point) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::SetTransform { scale, offset });
        Ok(())
    }

    fn draw_bucket(&mut self, frame: Rect, name: &str) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Bucket { frame, name: name.to_owned() });
        Ok(())
    }

    fn fill_card(&mut self, bounds: Rect, fill: &str, title: &str) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Card { bounds, fill: fill.to_owned(), title: title.to_owned() });
        Ok(())
    }

    fn stroke_selection(&mut self, bounds: Rect, width: f64) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Selection { bounds, width });
        Ok(())
    }

    fn fill_lasso(&mut self, rect: Rect) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Lasso { rect });
        Ok(())
    }
}
