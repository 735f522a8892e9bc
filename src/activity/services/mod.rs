//! Application services for the activity log.

mod recorder;

pub use recorder::ActivityRecorder;
