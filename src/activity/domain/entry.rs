//! Activity log entries and the events that produce them.

use super::{ActivityDomainError, ActivityEntryId, ParseActivityActionError};
use crate::task::domain::{Task, TaskId, TaskStatus, stored_now};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityAction {
    /// A task was created.
    Created,
    /// Non-status fields of a task were updated, or the status was resubmitted
    /// unchanged.
    Updated,
    /// A task was deleted.
    Deleted,
    /// The status of a task changed value.
    #[serde(rename = "Status Changed")]
    StatusChanged,
}

impl ActivityAction {
    /// Every action value.
    pub const ALL: [Self; 4] = [
        Self::Created,
        Self::Updated,
        Self::Deleted,
        Self::StatusChanged,
    ];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
            Self::StatusChanged => "Status Changed",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| ParseActivityActionError(value.to_owned()))
    }
}

/// Payload of an activity entry, tagged by action.
///
/// Snapshots are full task states. A status change carries only the two
/// status values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ActivityChange {
    /// Task creation with the created state.
    #[serde(rename = "Created", rename_all = "camelCase")]
    Created {
        /// State of the task as created.
        new_value: Box<Task>,
    },
    /// Field update with before and after states.
    #[serde(rename = "Updated", rename_all = "camelCase")]
    Updated {
        /// State before the update.
        old_value: Box<Task>,
        /// State after the update.
        new_value: Box<Task>,
    },
    /// Task deletion with the last stored state.
    #[serde(rename = "Deleted", rename_all = "camelCase")]
    Deleted {
        /// State immediately before deletion.
        old_value: Box<Task>,
    },
    /// Status change.
    #[serde(rename = "Status Changed", rename_all = "camelCase")]
    StatusChanged {
        /// Status before the update.
        old_status: TaskStatus,
        /// Status after the update.
        new_status: TaskStatus,
    },
}

impl ActivityChange {
    /// Reassembles a change from its stored columns.
    ///
    /// Fields the action does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::MissingPayload`] when a field required
    /// by the action is absent.
    pub fn from_parts(
        action: ActivityAction,
        old_status: Option<TaskStatus>,
        new_status: Option<TaskStatus>,
        old_value: Option<Task>,
        new_value: Option<Task>,
    ) -> Result<Self, ActivityDomainError> {
        let require =
            |field: &'static str| ActivityDomainError::MissingPayload { action, field };
        match action {
            ActivityAction::Created => Ok(Self::Created {
                new_value: Box::new(new_value.ok_or_else(|| require("newValue"))?),
            }),
            ActivityAction::Updated => Ok(Self::Updated {
                old_value: Box::new(old_value.ok_or_else(|| require("oldValue"))?),
                new_value: Box::new(new_value.ok_or_else(|| require("newValue"))?),
            }),
            ActivityAction::Deleted => Ok(Self::Deleted {
                old_value: Box::new(old_value.ok_or_else(|| require("oldValue"))?),
            }),
            ActivityAction::StatusChanged => Ok(Self::StatusChanged {
                old_status: old_status.ok_or_else(|| require("oldStatus"))?,
                new_status: new_status.ok_or_else(|| require("newStatus"))?,
            }),
        }
    }

    /// Returns the action this change records.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        match self {
            Self::Created { .. } => ActivityAction::Created,
            Self::Updated { .. } => ActivityAction::Updated,
            Self::Deleted { .. } => ActivityAction::Deleted,
            Self::StatusChanged { .. } => ActivityAction::StatusChanged,
        }
    }

    /// Returns the prior status for a status change.
    #[must_use]
    pub const fn old_status(&self) -> Option<TaskStatus> {
        match self {
            Self::StatusChanged { old_status, .. } => Some(*old_status),
            _ => None,
        }
    }

    /// Returns the new status for a status change.
    #[must_use]
    pub const fn new_status(&self) -> Option<TaskStatus> {
        match self {
            Self::StatusChanged { new_status, .. } => Some(*new_status),
            _ => None,
        }
    }

    /// Returns the snapshot taken before the mutation, if recorded.
    #[must_use]
    pub fn old_value(&self) -> Option<&Task> {
        match self {
            Self::Updated { old_value, .. } | Self::Deleted { old_value } => {
                Some(old_value.as_ref())
            }
            Self::Created { .. } | Self::StatusChanged { .. } => None,
        }
    }

    /// Returns the snapshot taken after the mutation, if recorded.
    #[must_use]
    pub fn new_value(&self) -> Option<&Task> {
        match self {
            Self::Created { new_value } | Self::Updated { new_value, .. } => {
                Some(new_value.as_ref())
            }
            Self::Deleted { .. } | Self::StatusChanged { .. } => None,
        }
    }
}

/// An accepted mutation awaiting a log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    task_id: TaskId,
    change: ActivityChange,
}

impl ActivityEvent {
    /// Event for a newly created task.
    #[must_use]
    pub fn created(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            change: ActivityChange::Created {
                new_value: Box::new(task.clone()),
            },
        }
    }

    /// Event for a field update.
    #[must_use]
    pub fn updated(old_value: Task, new_value: Task) -> Self {
        Self {
            task_id: new_value.id(),
            change: ActivityChange::Updated {
                old_value: Box::new(old_value),
                new_value: Box::new(new_value),
            },
        }
    }

    /// Event for a deleted task.
    #[must_use]
    pub fn deleted(old_value: Task) -> Self {
        Self {
            task_id: old_value.id(),
            change: ActivityChange::Deleted {
                old_value: Box::new(old_value),
            },
        }
    }

    /// Event for a status change.
    #[must_use]
    pub const fn status_changed(
        task_id: TaskId,
        old_status: TaskStatus,
        new_status: TaskStatus,
    ) -> Self {
        Self {
            task_id,
            change: ActivityChange::StatusChanged {
                old_status,
                new_status,
            },
        }
    }

    /// Returns the task the event refers to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the event payload.
    #[must_use]
    pub const fn change(&self) -> &ActivityChange {
        &self.change
    }
}

/// Immutable activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    id: ActivityEntryId,
    task_id: TaskId,
    #[serde(flatten)]
    change: ActivityChange,
    timestamp: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Stamps an event with a fresh identifier and the current time,
    /// truncated to microseconds.
    #[must_use]
    pub fn record(event: ActivityEvent, clock: &impl Clock) -> Self {
        Self {
            id: ActivityEntryId::new(),
            task_id: event.task_id,
            change: event.change,
            timestamp: stored_now(clock),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ActivityEntryId,
        task_id: TaskId,
        change: ActivityChange,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            change,
            timestamp,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityEntryId {
        self.id
    }

    /// Returns the referenced task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.change.action()
    }

    /// Returns the recorded payload.
    #[must_use]
    pub const fn change(&self) -> &ActivityChange {
        &self.change
    }

    /// Returns the write timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
