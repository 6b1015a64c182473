//! Access event model for asynchronous access counting.

/// A redirect that should be counted against a short code.
///
/// Sent from the redirect handler to the background access worker over a
/// bounded channel, so the redirect response never waits on the counter
/// update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub code: String,
}

impl AccessEvent {
    /// Creates a new access event for `code`.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
