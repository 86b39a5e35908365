//! Core types for the task tree.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque task identifier, assigned by storage at creation.
pub type TaskId = i64;

/// A single task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Optional calendar due date (no time component).
    pub due_date: Option<NaiveDate>,
    /// When the task was actually finished, epoch ms. Independent of
    /// `completed`: a task can be checked off without recording a time.
    pub finish_at: Option<i64>,
    /// `None` marks a root task.
    pub parent_id: Option<TaskId>,
    pub completed: bool,
    /// Position among siblings. Not contiguous; only the relative order
    /// matters, with ties broken by `id`.
    pub sort_order: i64,
    /// Persisted presentation hint: last known open/closed state.
    pub expanded: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    /// The finish timestamp as a `DateTime`, if one was recorded.
    pub fn finish_time(&self) -> Option<DateTime<Utc>> {
        self.finish_at.and_then(DateTime::from_timestamp_millis)
    }
}

/// A task with its children, as produced by the tree projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub task: Task,
    pub children: Vec<TreeNode>,
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_due_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("invalid due date {text:?}: expected YYYY-MM-DD")))
}

/// Parse a finish timestamp in RFC 3339 form.
pub fn parse_finish_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            Error::validation(format!(
                "invalid finish time {text:?}: expected an RFC 3339 timestamp"
            ))
        })
}
