//! Error types for activity entry parsing and reconstruction.

use super::ActivityAction;
use thiserror::Error;

/// Errors returned while reconstructing activity entries from stored parts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivityDomainError {
    /// A payload field required by the action is absent.
    #[error("{action} entry is missing {field}")]
    MissingPayload {
        /// The entry action.
        action: ActivityAction,
        /// The absent payload field.
        field: &'static str,
    },
}

/// Error returned while parsing an activity action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity action: {0}")]
pub struct ParseActivityActionError(pub String);
