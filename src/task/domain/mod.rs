//! Domain model for task records.
//!
//! The task domain owns field validation, the closed status, category, and
//! priority vocabularies, and partial-update semantics while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod fields;
mod filter;
mod ids;
mod patch;
mod task;
mod timestamp;

pub use error::{
    ParseTaskCategoryError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
    TaskField,
};
pub use fields::{TaskCategory, TaskPriority, TaskStatus};
pub use filter::TaskFilter;
pub use ids::TaskId;
pub use patch::TaskPatch;
pub use task::{PersistedTaskData, Task, TaskDetails};
pub use timestamp::stored_now;
