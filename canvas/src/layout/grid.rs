//! Grid layout: items grouped into sections, each a fixed-width grid.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::collections::HashMap;

use crate::board::{Board, BucketRule, LayoutMode, Section};
use crate::config::GridConfig;
use crate::consts::UNSORTED_BUCKET;
use crate::doc::Item;
use crate::geometry::{Point, Rect};
use crate::layout::{Arrangement, Bucket, Slot, count_f64, sort_by_rank};

/// Index of the first section whose rule matches, or `None`.
#[must_use]
pub fn assign_section(item: &Item, sections: &[Section], now: i64) -> Option<usize> {
    sections.iter().position(|s| s.rule.matches(item, now))
}

/// Lay out `items` into the board's sections.
///
/// Items no section accepts are collected in a trailing "Unsorted" section.
/// Empty sections are omitted and the remaining ones stack vertically.
#[must_use]
pub fn arrange(items: &[&Item], board: &Board, config: &GridConfig, now: i64) -> Arrangement {
    if board.uses_fallback_bucket() {
        tracing::warn!(board_id = %board.id, "grid board has no sections; using fallback bucket");
    }
    let mut sections = board.effective_sections();
    let mut groups: Vec<Vec<&Item>> = vec![Vec::new(); sections.len()];
    let mut unsorted: Vec<&Item> = Vec::new();

    for &item in items {
        match assign_section(item, &sections, now) {
            Some(index) => groups[index].push(item),
            None => unsorted.push(item),
        }
    }
    if !unsorted.is_empty() {
        sections.push(Section::new(UNSORTED_BUCKET, BucketRule::Any));
        groups.push(unsorted);
    }

    let columns = config.columns.max(1);
    let col_stride = config.cell_width + config.cell_spacing;
    let row_stride = config.cell_height + config.cell_spacing;
    let width = count_f64(columns) * col_stride - config.cell_spacing;

    let mut slots = HashMap::new();
    let mut buckets = Vec::new();
    let mut top = 0.0;

    for (section, mut members) in sections.into_iter().zip(groups) {
        if members.is_empty() {
            continue;
        }
        sort_by_rank(&mut members);
        let bucket = buckets.len();
        for (i, item) in members.iter().enumerate() {
            let origin = Point::new(
                count_f64(i % columns) * col_stride,
                top + config.header_height + count_f64(i / columns) * row_stride,
            );
            slots.insert(item.id, Slot { origin, bucket });
        }
        let rows = members.len().div_ceil(columns);
        let height = config.header_height + count_f64(rows) * row_stride - config.cell_spacing;
        buckets.push(Bucket {
            name: section.name,
            frame: Rect::new(0.0, top, width, height),
            rule: Some(section.rule),
        });
        top += height + config.section_spacing;
    }

    Arrangement::new(LayoutMode::Grid, slots, buckets)
}
