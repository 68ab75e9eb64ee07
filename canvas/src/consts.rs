//! Shared numeric constants for the canvas crate.
//!
//! These are the defaults behind [`crate::config::CanvasConfig`]; the engine
//! itself always reads the configured values.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_ZOOM: f64 = 0.25;

/// Largest allowed viewport scale.
pub const MAX_ZOOM: f64 = 3.0;

/// Multiplicative step used by the zoom in / zoom out commands.
pub const ZOOM_STEP: f64 = 1.25;

/// Wheel sensitivity: a wheel delta of `dy` pixels zooms by `exp(-dy * k)`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

/// Screen-space padding kept around content by "zoom to fit".
pub const FIT_PADDING_PX: f64 = 40.0;

// ── Items ───────────────────────────────────────────────────────

/// Default note width in canvas units.
pub const DEFAULT_ITEM_WIDTH: f64 = 200.0;

/// Default note height in canvas units.
pub const DEFAULT_ITEM_HEIGHT: f64 = 150.0;

// ── Interaction ─────────────────────────────────────────────────

/// A lasso whose screen-space width and height are both below this is a click.
pub const LASSO_CLICK_SLOP_PX: f64 = 3.0;

/// Pre-fetch margin around the visible rect, as a fraction of its size per side.
pub const CULL_MARGIN_FACTOR: f64 = 0.5;

/// Selection outline width in screen pixels.
pub const SELECTION_OUTLINE_PX: f64 = 2.0;

// ── Layout ──────────────────────────────────────────────────────

/// Top-left of the first Freeform auto-placement slot.
pub const FREEFORM_ORIGIN: (f64, f64) = (40.0, 40.0);

/// Gap between Freeform auto-placement slots.
pub const FREEFORM_SPACING: f64 = 20.0;

/// Slots per row in the Freeform placement scan.
pub const FREEFORM_SLOTS_PER_ROW: usize = 6;

/// Upper bound on probed Freeform slots before giving up and stacking below.
pub const FREEFORM_MAX_PROBES: usize = 10_000;

/// Kanban column width in canvas units.
pub const KANBAN_COLUMN_WIDTH: f64 = 220.0;

/// Horizontal gap between Kanban columns.
pub const KANBAN_COLUMN_SPACING: f64 = 24.0;

/// Height reserved for a Kanban column header.
pub const KANBAN_HEADER_HEIGHT: f64 = 40.0;

/// Vertical gap between stacked Kanban cards.
pub const KANBAN_CARD_SPACING: f64 = 12.0;

/// Cells per row in a Grid section.
pub const GRID_COLUMNS: usize = 4;

/// Grid cell width in canvas units.
pub const GRID_CELL_WIDTH: f64 = 200.0;

/// Grid cell height in canvas units.
pub const GRID_CELL_HEIGHT: f64 = 150.0;

/// Gap between Grid cells on both axes.
pub const GRID_CELL_SPACING: f64 = 20.0;

/// Height reserved for a Grid section header.
pub const GRID_HEADER_HEIGHT: f64 = 36.0;

/// Vertical gap between consecutive Grid sections.
pub const GRID_SECTION_SPACING: f64 = 32.0;

/// Name of the synthetic bucket used when a board has no usable buckets.
pub const UNSORTED_BUCKET: &str = "Unsorted";
