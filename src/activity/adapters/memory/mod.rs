//! In-memory activity log adapter.

mod activity_log;

pub use activity_log::InMemoryActivityLog;
