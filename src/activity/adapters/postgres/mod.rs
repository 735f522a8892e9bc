//! `PostgreSQL` adapter for the activity log.

mod models;
mod repository;
mod schema;

pub use repository::{ActivityPgPool, PostgresActivityLog};
