//! Diesel row models for activity log persistence.

use super::schema::activity_log;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for activity entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activity_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Referenced task identifier.
    pub task_id: uuid::Uuid,
    /// Action display name.
    pub action: String,
    /// Prior status.
    pub old_status: Option<String>,
    /// New status.
    pub new_status: Option<String>,
    /// Snapshot before the mutation.
    pub old_value: Option<Value>,
    /// Snapshot after the mutation.
    pub new_value: Option<Value>,
    /// Write timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Append sequence.
    pub seq: i64,
}

/// Insert model for activity entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activity_log)]
pub struct NewActivityRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Referenced task identifier.
    pub task_id: uuid::Uuid,
    /// Action display name.
    pub action: String,
    /// Prior status.
    pub old_status: Option<String>,
    /// New status.
    pub new_status: Option<String>,
    /// Snapshot before the mutation.
    pub old_value: Option<Value>,
    /// Snapshot after the mutation.
    pub new_value: Option<Value>,
    /// Write timestamp.
    pub recorded_at: DateTime<Utc>,
}
