//! Taskledger: task tracking with an append-only activity audit trail.
//!
//! Tasks are created, listed, updated, and deleted through the task store;
//! every accepted mutation appends one entry to the activity log, which
//! keeps a task's history after the task itself is deleted.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports with an injected clock
//!
//! # Modules
//!
//! - [`task`]: Task records, validation, filtering, and mutation
//! - [`activity`]: Activity log entries and history queries
//! - [`http`]: axum JSON adapter over the services
//! - [`config`], [`storage`], [`telemetry`]: server wiring

pub mod activity;
pub mod config;
pub mod http;
pub mod storage;
pub mod task;
pub mod telemetry;
