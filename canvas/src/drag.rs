//! Typed drag payload and drop validation for bucketed layouts.
//!
//! DESIGN
//! ======
//! In Kanban and Grid a dragged card is a request to move the task into
//! another bucket, not a position change. The drag carries a [`DragPayload`]
//! naming the item and the bucket it left; on release [`resolve_drop`] finds the
//! bucket under the card and decides whether the move can be expressed as a
//! task metadata edit. The engine never edits metadata itself: an accepted drop
//! is reported outward and the card snaps back until the host pushes the
//! updated item.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use serde::{Deserialize, Serialize};

use crate::board::BucketRule;
use crate::doc::ItemId;
use crate::geometry::Point;
use crate::layout::Arrangement;

// =============================================================================
// TYPES
// =============================================================================

/// A bucket as seen by a drag: its position in the arrangement plus identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    pub index: usize,
    pub name: String,
    /// Grid section rule; `None` for Kanban columns.
    pub rule: Option<BucketRule>,
}

/// What a card carries while it is dragged in a bucketed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub item_id: ItemId,
    pub source: BucketRef,
}

/// Why a drop was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    #[error("no bucket under drop point")]
    NoTarget,
    #[error("item already in bucket {0:?}")]
    SameBucket(String),
    #[error("bucket {0:?} cannot be assigned by editing the task")]
    NotAssignable(String),
}

// =============================================================================
// PAYLOAD
// =============================================================================

impl DragPayload {
    /// Payload for `item_id` from its current slot, or `None` when the item is
    /// not part of the arrangement (Freeform boards).
    #[must_use]
    pub fn capture(item_id: ItemId, arrangement: &Arrangement) -> Option<Self> {
        let index = arrangement.slot(&item_id)?.bucket;
        let source = bucket_ref(arrangement, index)?;
        Some(Self { item_id, source })
    }
}

fn bucket_ref(arrangement: &Arrangement, index: usize) -> Option<BucketRef> {
    arrangement.bucket(index).map(|b| BucketRef {
        index,
        name: b.name.clone(),
        rule: b.rule.clone(),
    })
}

// =============================================================================
// RESOLVE
// =============================================================================

/// Validate dropping `payload` with the card centred on `center` (canvas space).
///
/// # Errors
///
/// `NoTarget` when no bucket lies under `center`, `SameBucket` when the card
/// was dropped back where it came from, and `NotAssignable` for Grid sections
/// whose rule is a date window or catch-all.
pub fn resolve_drop(payload: &DragPayload, arrangement: &Arrangement, center: Point) -> Result<BucketRef, DropError> {
    let target = arrangement
        .bucket_at(center)
        .and_then(|index| bucket_ref(arrangement, index))
        .ok_or(DropError::NoTarget)?;

    if target.index == payload.source.index {
        return Err(DropError::SameBucket(target.name));
    }
    if let Some(rule) = &target.rule
        && !rule.is_assignable()
    {
        return Err(DropError::NotAssignable(target.name));
    }
    Ok(target)
}
