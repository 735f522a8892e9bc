//! `PostgreSQL` repository implementation for the activity log.

use super::{
    models::{ActivityRow, NewActivityRow},
    schema::activity_log,
};
use crate::activity::{
    domain::{ActivityAction, ActivityChange, ActivityEntryId, ActivityLogEntry},
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by the activity adapter.
pub type ActivityPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed activity log.
#[derive(Debug, Clone)]
pub struct PostgresActivityLog {
    pool: ActivityPgPool,
}

impl PostgresActivityLog {
    /// Creates a new activity log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ActivityPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ActivityLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActivityLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ActivityLogError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ActivityLogError::persistence)?
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLog {
    async fn append(&self, entry: &ActivityLogEntry) -> ActivityLogResult<()> {
        let entry_id = entry.id();
        let new_row = to_new_row(entry)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(activity_log::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ActivityLogError::DuplicateEntry(entry_id)
                    }
                    _ => ActivityLogError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityLogEntry>> {
        self.run_blocking(move |connection| {
            let rows = activity_log::table
                .filter(activity_log::task_id.eq(task_id.into_inner()))
                .select(ActivityRow::as_select())
                .order((activity_log::recorded_at.desc(), activity_log::seq.desc()))
                .load::<ActivityRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

fn snapshot_to_json(task: Option<&Task>) -> ActivityLogResult<Option<Value>> {
    task.map(serde_json::to_value)
        .transpose()
        .map_err(ActivityLogError::persistence)
}

fn snapshot_from_json(value: Option<Value>) -> ActivityLogResult<Option<Task>> {
    value
        .map(serde_json::from_value::<Task>)
        .transpose()
        .map_err(ActivityLogError::persistence)
}

fn status_from_column(value: Option<String>) -> ActivityLogResult<Option<TaskStatus>> {
    value
        .map(|status| TaskStatus::try_from(status.as_str()))
        .transpose()
        .map_err(ActivityLogError::persistence)
}

fn to_new_row(entry: &ActivityLogEntry) -> ActivityLogResult<NewActivityRow> {
    let change = entry.change();
    Ok(NewActivityRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        action: entry.action().as_str().to_owned(),
        old_status: change.old_status().map(|status| status.as_str().to_owned()),
        new_status: change.new_status().map(|status| status.as_str().to_owned()),
        old_value: snapshot_to_json(change.old_value())?,
        new_value: snapshot_to_json(change.new_value())?,
        recorded_at: entry.timestamp(),
    })
}

fn row_to_entry(row: ActivityRow) -> ActivityLogResult<ActivityLogEntry> {
    let ActivityRow {
        id,
        task_id,
        action: persisted_action,
        old_status,
        new_status,
        old_value,
        new_value,
        recorded_at,
        ..
    } = row;

    let action = ActivityAction::try_from(persisted_action.as_str())
        .map_err(ActivityLogError::persistence)?;
    let change = ActivityChange::from_parts(
        action,
        status_from_column(old_status)?,
        status_from_column(new_status)?,
        snapshot_from_json(old_value)?,
        snapshot_from_json(new_value)?,
    )
    .map_err(ActivityLogError::persistence)?;

    Ok(ActivityLogEntry::from_persisted(
        ActivityEntryId::from_uuid(id),
        TaskId::from_uuid(task_id),
        change,
        recorded_at,
    ))
}
