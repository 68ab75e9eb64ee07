//! Freeform auto-placement for items without a position on the board.

#[cfg(test)]
#[path = "freeform_test.rs"]
mod freeform_test;

use crate::config::FreeformConfig;
use crate::doc::{BoardId, Item, ItemId};
use crate::geometry::{Point, Rect, Size, bounding_rect, rect_intersects};
use crate::layout::count_f64;

/// Assign a position to every item lacking one on `board`.
///
/// Existing positions are never touched. Candidates are probed row-major on a
/// fixed grid starting at `config.origin`; the first slot whose bounds do not
/// overlap any placed item (including ones placed earlier in this call) wins.
/// Items are placed in the order given. Returns only the new placements.
#[must_use]
pub fn place_missing(items: &[&Item], board: BoardId, config: &FreeformConfig) -> Vec<(ItemId, Point)> {
    let mut placed: Vec<Rect> = items.iter().filter_map(|item| item.bounds_on(&board)).collect();
    let mut assigned = Vec::new();
    // Slots before the last winner stay blocked for items of the same size,
    // since `placed` only grows.
    let mut resume: Option<(Size, usize)> = None;

    for item in items.iter().filter(|item| item.position(&board).is_none()) {
        let first = match resume {
            Some((size, probe)) if size == item.size => probe,
            _ => 0,
        };
        let (origin, probe) = find_free_slot(item, &placed, config, first);
        resume = Some((item.size, probe));
        placed.push(Rect::from_origin_size(origin, item.size));
        assigned.push((item.id, origin));
    }

    if !assigned.is_empty() {
        tracing::debug!(%board, placed = assigned.len(), "freeform auto-placement");
    }
    assigned
}

/// First free slot at or after probe `first`, with its probe index.
/// An exhausted scan returns `max_probes` as the index.
fn find_free_slot(item: &Item, placed: &[Rect], config: &FreeformConfig, first: usize) -> (Point, usize) {
    let stride_x = config.slot_size.width.max(item.size.width) + config.spacing;
    let stride_y = config.slot_size.height.max(item.size.height) + config.spacing;
    let per_row = config.slots_per_row.max(1);

    for probe in first..config.max_probes {
        let col = probe % per_row;
        let row = probe / per_row;
        let candidate = Point::new(
            config.origin.x + count_f64(col) * stride_x,
            config.origin.y + count_f64(row) * stride_y,
        );
        let bounds = Rect::from_origin_size(candidate, item.size);
        if !placed.iter().any(|p| rect_intersects(p, &bounds)) {
            return (candidate, probe);
        }
    }

    // Every probed slot is taken: stack below everything.
    let bottom = bounding_rect(placed.iter().copied()).map_or(config.origin.y, |b| b.bottom() + config.spacing);
    tracing::warn!(item_id = %item.id, probes = config.max_probes, "freeform placement scan exhausted");
    (Point::new(config.origin.x, bottom), config.max_probes)
}
