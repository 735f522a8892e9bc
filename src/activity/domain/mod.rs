//! Domain model for activity log entries.

mod entry;
mod error;
mod ids;

pub use entry::{ActivityAction, ActivityChange, ActivityEvent, ActivityLogEntry};
pub use error::{ActivityDomainError, ParseActivityActionError};
pub use ids::ActivityEntryId;
