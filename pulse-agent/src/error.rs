use thiserror::Error;

/// Errors raised while delivering a single reading.
///
/// All of these are non-fatal: a failed tick is logged and never resent,
/// and it never affects other ticks or other clients.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("collector returned unexpected status {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },

    #[error("failed to serialize reading: {0}")]
    Serialize(String),

    #[error("stream channel is closed")]
    ChannelClosed,
}
