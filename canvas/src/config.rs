//! Engine configuration: zoom limits, interaction thresholds and layout metrics.
//!
//! Defaults come from [`crate::consts`]. A host can load overrides from JSON
//! ([`CanvasConfig::from_json_str`]) or from environment variables
//! ([`CanvasConfig::from_env`]):
//!
//! - `NOTECANVAS_MIN_ZOOM` / `NOTECANVAS_MAX_ZOOM`: zoom bounds
//! - `NOTECANVAS_CULL_MARGIN`: pre-fetch margin factor for culling
//! - `NOTECANVAS_GRID_COLUMNS`: cells per row in Grid sections

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::geometry::{Point, Size};

pub const ENV_MIN_ZOOM: &str = "NOTECANVAS_MIN_ZOOM";
pub const ENV_MAX_ZOOM: &str = "NOTECANVAS_MAX_ZOOM";
pub const ENV_CULL_MARGIN: &str = "NOTECANVAS_CULL_MARGIN";
pub const ENV_GRID_COLUMNS: &str = "NOTECANVAS_GRID_COLUMNS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid zoom range: min {min} must be positive and not above max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("invalid value for {key}: {value:?}")]
    Parse { key: &'static str, value: String },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Freeform auto-placement scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeformConfig {
    /// Top-left of the first candidate slot.
    pub origin: Point,
    /// Size of one candidate slot (before spacing).
    pub slot_size: Size,
    pub spacing: f64,
    pub slots_per_row: usize,
    pub max_probes: usize,
}

impl Default for FreeformConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(FREEFORM_ORIGIN.0, FREEFORM_ORIGIN.1),
            slot_size: Size::new(DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT),
            spacing: FREEFORM_SPACING,
            slots_per_row: FREEFORM_SLOTS_PER_ROW,
            max_probes: FREEFORM_MAX_PROBES,
        }
    }
}

/// Kanban column metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    pub column_width: f64,
    pub column_spacing: f64,
    pub header_height: f64,
    pub card_height: f64,
    pub card_spacing: f64,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            column_width: KANBAN_COLUMN_WIDTH,
            column_spacing: KANBAN_COLUMN_SPACING,
            header_height: KANBAN_HEADER_HEIGHT,
            card_height: DEFAULT_ITEM_HEIGHT,
            card_spacing: KANBAN_CARD_SPACING,
        }
    }
}

/// Grid section metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub cell_spacing: f64,
    pub header_height: f64,
    pub section_spacing: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            cell_width: GRID_CELL_WIDTH,
            cell_height: GRID_CELL_HEIGHT,
            cell_spacing: GRID_CELL_SPACING,
            header_height: GRID_HEADER_HEIGHT,
            section_spacing: GRID_SECTION_SPACING,
        }
    }
}

/// Metrics for all three layout strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub freeform: FreeformConfig,
    pub kanban: KanbanConfig,
    pub grid: GridConfig,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor applied by zoom in / zoom out commands.
    pub zoom_step: f64,
    /// Wheel zoom factor is `exp(-dy * wheel_zoom_sensitivity)`.
    pub wheel_zoom_sensitivity: f64,
    /// Screen padding kept by "zoom to fit".
    pub fit_padding_px: f64,
    /// Culling pre-fetch margin as a fraction of the visible size per side.
    pub cull_margin: f64,
    /// Lassos smaller than this on both screen axes count as clicks.
    pub lasso_click_slop_px: f64,
    pub layout: LayoutConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            fit_padding_px: FIT_PADDING_PX,
            cull_margin: CULL_MARGIN_FACTOR,
            lasso_click_slop_px: LASSO_CLICK_SLOP_PX,
            layout: LayoutConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Defaults with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a malformed variable and any [`CanvasConfig::validate`] error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            // Surfaces as a `Parse` error instead of being silently ignored.
            Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Defaults with overrides from `lookup` (an environment stand-in).
    ///
    /// # Errors
    ///
    /// Returns `Parse` for a malformed value and any [`CanvasConfig::validate`] error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_MIN_ZOOM)? {
            cfg.min_zoom = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_MAX_ZOOM)? {
            cfg.max_zoom = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_CULL_MARGIN)? {
            cfg.cull_margin = v;
        }
        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_GRID_COLUMNS)? {
            cfg.layout.grid.columns = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and any [`CanvasConfig::validate`] error.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the engine cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) || !self.max_zoom.is_finite() {
            return Err(ConfigError::InvalidZoomRange { min: self.min_zoom, max: self.max_zoom });
        }
        positive("zoom_step", self.zoom_step)?;
        if self.cull_margin < 0.0 || !self.cull_margin.is_finite() {
            return Err(ConfigError::NonPositive { field: "cull_margin", value: self.cull_margin });
        }
        let layout = &self.layout;
        positive("freeform.slot_size.width", layout.freeform.slot_size.width)?;
        positive("freeform.slot_size.height", layout.freeform.slot_size.height)?;
        positive("kanban.column_width", layout.kanban.column_width)?;
        positive("kanban.card_height", layout.kanban.card_height)?;
        positive("grid.cell_width", layout.grid.cell_width)?;
        positive("grid.cell_height", layout.grid.cell_height)?;
        if layout.freeform.slots_per_row == 0 {
            return Err(ConfigError::ZeroCount { field: "freeform.slots_per_row" });
        }
        if layout.grid.columns == 0 {
            return Err(ConfigError::ZeroCount { field: "grid.columns" });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ConfigError::Parse { key, value: raw }),
    }
}
