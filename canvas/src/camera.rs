//! Viewport state for pan/zoom on the unbounded canvas.
//!
//! `offset` is the canvas-space point shown at the top-left of the screen and
//! `scale` is screen pixels per canvas unit. The visible rectangle is derived
//! from those two values and the screen size on demand; it is never stored.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::{Point, Rect, Size};

/// Clamp a requested scale into `[min, max]`.
///
/// A NaN request resolves to `min` so a bad gesture value can never poison the viewport.
#[must_use]
pub fn clamp_zoom(requested: f64, min: f64, max: f64) -> f64 {
    if requested.is_nan() {
        return min;
    }
    requested.max(min).min(max)
}

/// Convert a screen-space point to canvas space.
#[must_use]
pub fn to_canvas_point(screen: Point, viewport: &Viewport) -> Point {
    viewport.offset + screen / viewport.scale
}

/// Convert a canvas-space point to screen space.
#[must_use]
pub fn to_screen_point(canvas: Point, viewport: &Viewport) -> Point {
    (canvas - viewport.offset) * viewport.scale
}

/// Current scale + offset mapping between canvas space and screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Point,
    screen: Size,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

impl Viewport {
    /// Identity viewport (scale 1, offset at the origin, zero-sized screen).
    ///
    /// The bounds are assumed to be ordered; [`crate::config::CanvasConfig::validate`]
    /// guarantees that for configured values.
    #[must_use]
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            scale: clamp_zoom(1.0, min_zoom, max_zoom),
            offset: Point::default(),
            screen: Size::default(),
            min_zoom,
            max_zoom,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[must_use]
    pub fn screen_size(&self) -> Size {
        self.screen
    }

    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Record a new screen size (window resize). Offset and scale are kept.
    pub fn set_screen_size(&mut self, size: Size) {
        self.screen = Size::new(size.width.max(0.0), size.height.max(0.0));
    }

    /// Place `offset` at the top-left of the screen.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Canvas-space rectangle currently on screen.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.screen.width / self.scale,
            self.screen.height / self.scale,
        )
    }

    /// Convert a screen-space point to canvas space.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        to_canvas_point(screen, self)
    }

    /// Convert a canvas-space point to screen space.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        to_screen_point(canvas, self)
    }

    /// Convert a screen-space delta (pixels) to a canvas-space delta.
    #[must_use]
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        delta / self.scale
    }

    /// Pan by a screen-space delta; content follows the pointer.
    pub fn pan_by_screen(&mut self, delta: Point) {
        self.offset = self.offset - delta / self.scale;
    }

    /// Set the scale, keeping the canvas point under `anchor` (screen space) fixed.
    ///
    /// Returns `true` when the scale actually changed.
    pub fn zoom_to(&mut self, requested: f64, anchor: Point) -> bool {
        let next = clamp_zoom(requested, self.min_zoom, self.max_zoom);
        if (next - self.scale).abs() < f64::EPSILON {
            return false;
        }
        let anchor_canvas = self.screen_to_canvas(anchor);
        self.scale = next;
        self.offset = anchor_canvas - anchor / next;
        true
    }

    /// Multiply the scale by `factor` around `anchor`. See [`Viewport::zoom_to`].
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) -> bool {
        self.zoom_to(self.scale * factor, anchor)
    }

    /// Screen-space centre of the viewport.
    #[must_use]
    pub fn screen_center(&self) -> Point {
        Point::new(self.screen.width * 0.5, self.screen.height * 0.5)
    }

    /// Scale and pan so `bounds` fills the screen minus `padding_px` on each side,
    /// centred. Returns `true` when the scale changed.
    pub fn fit(&mut self, bounds: &Rect, padding_px: f64) -> bool {
        let avail_w = (self.screen.width - 2.0 * padding_px).max(1.0);
        let avail_h = (self.screen.height - 2.0 * padding_px).max(1.0);
        let requested = if bounds.width > 0.0 && bounds.height > 0.0 {
            (avail_w / bounds.width).min(avail_h / bounds.height)
        } else {
            self.scale
        };
        let previous = self.scale;
        self.scale = clamp_zoom(requested, self.min_zoom, self.max_zoom);
        self.offset = bounds.center() - self.screen_center() / self.scale;
        (self.scale - previous).abs() >= f64::EPSILON
    }
}
