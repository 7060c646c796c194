use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigError;
use crate::interval::parse_interval;

/// How a client delivers its readings to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// One complete POST request per reading.
    Batched,
    /// One persistent NDJSON channel per client, one line per reading.
    Streamed,
}

impl Default for DeliveryMode {
    fn default() -> Self {
        DeliveryMode::Batched
    }
}

/// One client entry as written in the configuration file.
///
/// The cadence is kept textual here; the supervisor parses it (fatally on
/// error) before any runner starts.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEntry {
    pub client_id: String,
    pub secret: String,
    pub interval: String,
    #[serde(default)]
    pub mode: DeliveryMode,
    /// Optional per-client endpoint; falls back to the process-wide default.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ClientEntry {
    /// Parses the cadence string and resolves the endpoint override into a
    /// ready-to-run [`ClientSpec`].
    pub fn resolve(&self, default_endpoint: &Url) -> Result<ClientSpec, ConfigError> {
        let cadence = parse_interval(&self.interval)?;
        let endpoint = match self.endpoint.as_deref() {
            Some(raw) => parse_http_url(raw)?,
            None => default_endpoint.clone(),
        };

        Ok(ClientSpec {
            client_id: self.client_id.clone(),
            secret: self.secret.clone(),
            cadence,
            mode: self.mode,
            endpoint,
        })
    }
}

/// Fully validated per-client specification.
///
/// Immutable after load; owned exclusively by that client's runner for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct ClientSpec {
    pub client_id: String,
    pub secret: String,
    pub cadence: Duration,
    pub mode: DeliveryMode,
    pub endpoint: Url,
}

/// Process-wide agent configuration loaded from a YAML document.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Default collector endpoint for clients without an override.
    pub api_url: String,
    pub clients: Vec<ClientEntry>,
}

impl AgentConfig {
    /// Loads and validates the configuration file.
    ///
    /// Every error here is fatal: the process must not start a partial
    /// client set from a document it could not fully honour.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            source: err,
        })?;

        Self::from_yaml(&raw)
    }

    /// Parses a configuration document from its YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig =
            serde_yaml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the validated process-wide default endpoint.
    pub fn default_endpoint(&self) -> Result<Url, ConfigError> {
        parse_http_url(&self.api_url)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url(&self.api_url)?;

        if self.clients.is_empty() {
            return Err(ConfigError::NoClients);
        }

        let mut seen = HashSet::new();
        for client in &self.clients {
            if client.client_id.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "client_id",
                    client_id: client.client_id.clone(),
                });
            }
            if client.secret.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "secret",
                    client_id: client.client_id.clone(),
                });
            }
            if !seen.insert(client.client_id.clone()) {
                return Err(ConfigError::DuplicateClient(client.client_id.clone()));
            }
            if let Some(endpoint) = client.endpoint.as_deref() {
                parse_http_url(endpoint)?;
            }
        }

        Ok(())
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            reason: "endpoint must use http or https".to_string(),
        });
    }

    Ok(parsed)
}
