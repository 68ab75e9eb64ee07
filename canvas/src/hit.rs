//! Hit-testing: which item (if any) is under a canvas-space point.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::ItemId;
use crate::geometry::{Point, Rect};

/// Topmost item whose bounds contain `canvas_pt`.
///
/// `candidates` must be in draw order (bottom first); the last match wins
/// because it is drawn above the others. Bounds are inclusive.
#[must_use]
pub fn hit_test<I>(canvas_pt: Point, candidates: I) -> Option<ItemId>
where
    I: IntoIterator<Item = (ItemId, Rect)>,
    I::IntoIter: DoubleEndedIterator,
{
    candidates
        .into_iter()
        .rev()
        .find(|(_, bounds)| bounds.contains(canvas_pt))
        .map(|(id, _)| id)
}
