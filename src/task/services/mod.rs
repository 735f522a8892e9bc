//! Application services for task storage and mutation.

mod store;

pub use store::{CreateTaskRequest, TaskStoreError, TaskStoreResult, TaskStoreService};
