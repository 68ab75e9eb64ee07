//! Kanban layout: items stacked in status columns.

#[cfg(test)]
#[path = "kanban_test.rs"]
mod kanban_test;

use std::collections::HashMap;

use crate::board::{Board, LayoutMode, normalize_name};
use crate::config::KanbanConfig;
use crate::doc::Item;
use crate::geometry::{Point, Rect};
use crate::layout::{Arrangement, Bucket, Slot, count_f64, sort_by_rank};

/// Decides whether an item belongs in the column with the given name.
pub type ColumnPredicate = fn(&Item, &str) -> bool;

/// Column-assignment predicates in priority order. The first predicate that
/// matches any column decides; items nothing matches go to the first column.
pub const COLUMN_PREDICATES: [ColumnPredicate; 3] = [explicit_column, status_matches, completion_matches];

const DONE_NAMES: [&str; 4] = ["done", "completed", "complete", "finished"];

/// The item was explicitly filed into this column.
fn explicit_column(item: &Item, column: &str) -> bool {
    item.column
        .as_deref()
        .is_some_and(|c| normalize_name(c) == normalize_name(column))
}

/// The item's workflow status names this column.
fn status_matches(item: &Item, column: &str) -> bool {
    item.status
        .as_deref()
        .is_some_and(|s| normalize_name(s) == normalize_name(column))
}

/// Completed items land in a "Done"-like column.
fn completion_matches(item: &Item, column: &str) -> bool {
    item.completed && DONE_NAMES.contains(&normalize_name(column).as_str())
}

/// Index of the column `item` belongs to.
#[must_use]
pub fn assign_column(item: &Item, columns: &[String]) -> usize {
    COLUMN_PREDICATES
        .iter()
        .find_map(|pred| columns.iter().position(|c| pred(item, c)))
        .unwrap_or(0)
}

/// Left edge of column `index`.
#[must_use]
pub fn column_x(index: usize, config: &KanbanConfig) -> f64 {
    count_f64(index) * (config.column_width + config.column_spacing)
}

/// Lay out `items` into the board's columns.
#[must_use]
pub fn arrange(items: &[&Item], board: &Board, config: &KanbanConfig) -> Arrangement {
    if board.uses_fallback_bucket() {
        tracing::warn!(board_id = %board.id, "kanban board has no columns; using fallback bucket");
    }
    let columns = board.effective_columns();

    let mut groups: Vec<Vec<&Item>> = vec![Vec::new(); columns.len()];
    for &item in items {
        groups[assign_column(item, &columns)].push(item);
    }

    let row_stride = config.card_height + config.card_spacing;
    let mut slots = HashMap::new();
    let mut buckets = Vec::with_capacity(columns.len());

    for (index, (name, mut members)) in columns.into_iter().zip(groups).enumerate() {
        sort_by_rank(&mut members);
        let x = column_x(index, config);
        for (row, item) in members.iter().enumerate() {
            let y = config.header_height + count_f64(row) * row_stride;
            slots.insert(item.id, Slot { origin: Point::new(x, y), bucket: index });
        }
        let rows = members.len().max(1);
        let height = config.header_height + count_f64(rows) * row_stride - config.card_spacing;
        buckets.push(Bucket { name, frame: Rect::new(x, 0.0, config.column_width, height), rule: None });
    }

    Arrangement::new(LayoutMode::Kanban, slots, buckets)
}
