use std::io;

use thiserror::Error;

/// Result type used across the Pulse core crate.
pub type Result<T> = std::result::Result<T, PulseError>;

/// Canonical error representation shared by the emitter crates.
///
/// Delivery failures never reach this type; they stay inside the agent's
/// transport error and are only logged.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

/// Dedicated configuration error used by the configuration module.
///
/// Any variant is fatal at startup: a malformed configuration aborts the
/// whole process before a single client runner is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration document: {0}")]
    Parse(String),

    #[error("missing required field {field} for client {client_id}")]
    MissingField {
        field: &'static str,
        client_id: String,
    },

    #[error("invalid interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: &'static str },

    #[error("invalid endpoint URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("duplicate client id: {0}")]
    DuplicateClient(String),

    #[error("configuration declares no clients")]
    NoClients,
}

impl From<ConfigError> for PulseError {
    fn from(value: ConfigError) -> Self {
        PulseError::ConfigError(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_fold_into_the_canonical_error() {
        let err: PulseError = ConfigError::NoClients.into();
        assert!(matches!(err, PulseError::ConfigError(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: configuration declares no clients"
        );
    }
}
