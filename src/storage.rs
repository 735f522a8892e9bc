//! Storage handle construction.
//!
//! The handle is built once at startup and its repositories are shared with
//! the services through `Arc`.

use crate::activity::adapters::memory::InMemoryActivityLog;
use crate::activity::adapters::postgres::PostgresActivityLog;
use crate::config::DatabaseConfig;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::adapters::postgres::{PostgresTaskRepository, TaskPgPool};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while opening storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The connection pool could not be built.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
    /// The blocking pool construction task failed.
    #[error("database pool construction was interrupted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Repositories for the configured backend.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Process-local storage.
    InMemory {
        /// Task repository.
        tasks: Arc<InMemoryTaskRepository>,
        /// Activity log.
        activity: Arc<InMemoryActivityLog>,
    },
    /// `PostgreSQL` storage sharing one connection pool.
    Postgres {
        /// Task repository.
        tasks: Arc<PostgresTaskRepository>,
        /// Activity log.
        activity: Arc<PostgresActivityLog>,
    },
}

impl Storage {
    /// Creates empty in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::InMemory {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            activity: Arc::new(InMemoryActivityLog::new()),
        }
    }

    /// Opens storage for the given settings.
    ///
    /// Without database settings the handle is in-memory. Otherwise a pool
    /// is built and its first connections are established eagerly, so an
    /// unreachable database fails here rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the pool cannot connect.
    pub async fn open(database: Option<&DatabaseConfig>) -> Result<Self, StorageError> {
        let Some(settings) = database.cloned() else {
            tracing::info!("using in-memory storage");
            return Ok(Self::in_memory());
        };

        let max_pool_size = settings.max_pool_size;
        let pool = tokio::task::spawn_blocking(move || build_pool(&settings)).await??;
        tracing::info!(max_pool_size, "connected to PostgreSQL");
        Ok(Self::Postgres {
            tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
            activity: Arc::new(PostgresActivityLog::new(pool)),
        })
    }
}

fn build_pool(settings: &DatabaseConfig) -> Result<TaskPgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(settings.url.as_str());
    Pool::builder()
        .max_size(settings.max_pool_size)
        .build(manager)
}
