//! JSON response envelope shared by every endpoint.

use serde::Serialize;

/// Response body of the form `{success, data | error, count?, message?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of items in a collection payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Human-readable confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error description on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful response carrying a single item.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            error: None,
        }
    }

    /// Attaches a confirmation message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// Successful response carrying a collection and its size.
    #[must_use]
    pub fn collection(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            message: None,
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            message: None,
            error: Some(error.into()),
        }
    }
}
