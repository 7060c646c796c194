use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use pulse_core::{AgentConfig, ClientSpec, ConfigError, PulseError, SyntheticSource, ValueSource};

use crate::batch::BatchTransport;
use crate::runner::ClientRunner;
use crate::stream::StreamTransport;

/// Launches one independent, never-joining runner task per configured
/// client.
pub struct AgentSupervisor {
    source: Arc<dyn ValueSource>,
    http: reqwest::Client,
}

impl Default for AgentSupervisor {
    fn default() -> Self {
        Self::new(Arc::new(SyntheticSource))
    }
}

impl AgentSupervisor {
    pub fn new(source: Arc<dyn ValueSource>) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
        }
    }

    /// Resolves every client spec, then starts one runner per client.
    ///
    /// Resolution is fail-fast: a single malformed cadence or endpoint
    /// aborts before ANY runner spawns, so a configuration that cannot be
    /// fully honoured never yields a partial client set. Returns once all
    /// runners are launched; they do not finish under normal operation.
    pub fn start(&self, config: &AgentConfig) -> Result<AgentHandle, PulseError> {
        let default_endpoint = config.default_endpoint()?;

        let specs = config
            .clients
            .iter()
            .map(|entry| entry.resolve(&default_endpoint))
            .collect::<Result<Vec<ClientSpec>, ConfigError>>()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut runners = Vec::with_capacity(specs.len());

        for spec in specs {
            info!(
                client_id = %spec.client_id,
                interval = ?spec.cadence,
                mode = ?spec.mode,
                "started agent client (aligned)"
            );
            let runner = ClientRunner::new(
                spec,
                self.source.clone(),
                BatchTransport::new(self.http.clone()),
                StreamTransport::new(self.http.clone()),
            );
            runners.push(tokio::spawn(runner.run(shutdown_rx.clone())));
        }

        Ok(AgentHandle {
            shutdown: shutdown_tx,
            runners,
        })
    }
}

/// Handle owning the runner tasks and their shutdown signal.
pub struct AgentHandle {
    shutdown: watch::Sender<bool>,
    runners: Vec<JoinHandle<()>>,
}

impl AgentHandle {
    pub fn client_count(&self) -> usize {
        self.runners.len()
    }

    /// Signals every runner to stop issuing ticks and waits for them to
    /// wind down; stream sessions close as their runners drop them.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.runners {
            if let Err(err) = handle.await {
                error!("client runner crashed: {:?}", err);
            }
        }
    }
}
