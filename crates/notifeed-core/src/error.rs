use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifeedError {
    /// A record without an id reached the merge step.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The initial full fetch during open() failed; the subscription stays
    /// idle and open() may be retried.
    #[error("Opening subscription failed: {0}")]
    OpenFailed(#[source] Box<NotifeedError>),

    /// A scheduled poll cycle failed; reported via the log, never thrown
    /// into caller code. The watermark is left untouched.
    #[error("Poll cycle failed: {0}")]
    PollCycleFailed(#[source] Box<NotifeedError>),

    #[error("Subscription is closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
