//! Closed vocabularies for task status, category, and priority.
//!
//! Each enum serialises with its display spelling (`"In Progress"`, not
//! `"in_progress"`) so that persisted snapshots and the HTTP surface share a
//! single representation. Parsing is exact in both places: `TryFrom<&str>`
//! (query strings, stored columns) and serde accept the same spellings and
//! nothing else.

use super::{ParseTaskCategoryError, ParseTaskPriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task progress status.
///
/// Any status may replace any other; only membership is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    Pending,
    /// Work is underway.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// Every status value, in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    /// Job-related work.
    Work,
    /// Personal errands.
    Personal,
    /// Shopping lists.
    Shopping,
    /// Health and fitness.
    Health,
    /// Anything else.
    Other,
}

impl TaskCategory {
    /// Every category value, in display order.
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Personal,
        Self::Shopping,
        Self::Health,
        Self::Other,
    ];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ParseTaskCategoryError(value.to_owned()))
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Urgent.
    High,
}

impl TaskPriority {
    /// Every priority value, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| ParseTaskPriorityError(value.to_owned()))
    }
}
