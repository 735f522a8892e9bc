//! Append-only activity log for task mutations.
//!
//! Every accepted create, update, or delete of a task produces exactly one
//! [`domain::ActivityLogEntry`]. Entries reference tasks by identifier only,
//! so the history of a deleted task stays queryable. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The recording service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
