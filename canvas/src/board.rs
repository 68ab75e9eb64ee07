//! Board configuration: layout mode, Kanban columns and Grid sections.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::UNSORTED_BUCKET;
use crate::doc::{BoardId, Item, Priority};

const SECS_PER_DAY: i64 = 86_400;

/// Which layout strategy arranges the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Items sit wherever the user put them.
    #[default]
    Freeform,
    /// Items stack in status columns.
    Kanban,
    /// Items fill fixed-width grids grouped into sections.
    Grid,
}

/// Predicate deciding whether an item belongs to a Grid section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BucketRule {
    /// Status equals the value (normalized comparison).
    Status(String),
    /// Priority equals the value.
    Priority(Priority),
    /// Item carries the tag (normalized comparison).
    Tag(String),
    /// Item is completed.
    Completed,
    /// Item is not completed and its due date has passed.
    Overdue,
    /// Item is not completed and due within the next `n` days (or overdue).
    DueWithinDays(u32),
    /// Matches everything.
    Any,
}

impl BucketRule {
    /// Evaluate the rule for `item` at wall-clock time `now` (unix seconds).
    #[must_use]
    pub fn matches(&self, item: &Item, now: i64) -> bool {
        match self {
            Self::Status(status) => item
                .status
                .as_deref()
                .is_some_and(|s| normalize_name(s) == normalize_name(status)),
            Self::Priority(priority) => item.priority == *priority,
            Self::Tag(tag) => {
                let wanted = normalize_name(tag);
                item.tags.iter().any(|t| normalize_name(t) == wanted)
            }
            Self::Completed => item.completed,
            Self::Overdue => !item.completed && item.due.is_some_and(|due| due < now),
            Self::DueWithinDays(days) => {
                let horizon = now.saturating_add(i64::from(*days).saturating_mul(SECS_PER_DAY));
                !item.completed && item.due.is_some_and(|due| due <= horizon)
            }
            Self::Any => true,
        }
    }

    /// Whether dropping an item into a bucket with this rule can be honoured by
    /// editing task metadata. Date windows and catch-alls cannot.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Status(_) | Self::Priority(_) | Self::Tag(_) | Self::Completed)
    }
}

/// Named Grid bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub rule: BucketRule,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>, rule: BucketRule) -> Self {
        Self { name: name.into(), rule }
    }
}

/// A board and its layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    /// Ordered Kanban column names.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Ordered Grid sections.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for Board {
    fn default() -> Self {
        Self::freeform(Uuid::nil())
    }
}

impl Board {
    /// A Freeform board with no buckets.
    #[must_use]
    pub fn freeform(id: BoardId) -> Self {
        Self {
            id,
            name: String::new(),
            layout_mode: LayoutMode::Freeform,
            columns: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// A Kanban board with the given columns.
    #[must_use]
    pub fn kanban<S: Into<String>>(id: BoardId, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            layout_mode: LayoutMode::Kanban,
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::freeform(id)
        }
    }

    /// A Grid board with the given sections.
    #[must_use]
    pub fn grid(id: BoardId, sections: Vec<Section>) -> Self {
        Self { layout_mode: LayoutMode::Grid, sections, ..Self::freeform(id) }
    }

    /// Kanban columns, or a single "Unsorted" column when none are configured.
    #[must_use]
    pub fn effective_columns(&self) -> Vec<String> {
        let columns: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .collect();
        if columns.is_empty() {
            return vec![UNSORTED_BUCKET.to_owned()];
        }
        columns
    }

    /// Grid sections, or a single catch-all "Unsorted" section when none are configured.
    #[must_use]
    pub fn effective_sections(&self) -> Vec<Section> {
        if self.sections.is_empty() {
            return vec![Section::new(UNSORTED_BUCKET, BucketRule::Any)];
        }
        self.sections.clone()
    }

    /// Whether the active mode has to fall back to the synthetic bucket.
    #[must_use]
    pub fn uses_fallback_bucket(&self) -> bool {
        match self.layout_mode {
            LayoutMode::Freeform => false,
            LayoutMode::Kanban => self.columns.iter().all(|c| c.trim().is_empty()),
            LayoutMode::Grid => self.sections.is_empty(),
        }
    }
}

/// Case- and punctuation-insensitive form of a bucket or status name.
///
/// `"To Do"`, `"to-do"` and `"TODO"` all normalize to `"todo"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
