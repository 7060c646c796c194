use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use pulse_core::{ClientSpec, DeliveryMode, Reading, ValueSource};

use crate::align::{self, CadenceClass};
use crate::batch::BatchTransport;
use crate::error::DeliveryError;
use crate::stream::{StreamSession, StreamTransport};

/// Owns one client's emission lifecycle for the process lifetime.
///
/// Each runner is fully independent: it never communicates with or blocks
/// on another client's runner.
pub struct ClientRunner {
    spec: ClientSpec,
    source: Arc<dyn ValueSource>,
    batch: BatchTransport,
    stream: StreamTransport,
}

enum SessionState {
    NotOpened,
    Open(StreamSession),
    /// The channel is gone and there is no reconnect; further ticks for
    /// this client are no-ops (accepted degraded state).
    Broken,
}

impl ClientRunner {
    pub fn new(
        spec: ClientSpec,
        source: Arc<dyn ValueSource>,
        batch: BatchTransport,
        stream: StreamTransport,
    ) -> Self {
        Self {
            spec,
            source,
            batch,
            stream,
        }
    }

    /// Runs the client's tick loop until the shutdown signal fires.
    ///
    /// The first tick is phase-aligned to the wall clock for the cadence
    /// class; later ticks re-arm on a fixed period with no realignment, so
    /// they stay on the boundary as long as the process keeps up.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let class = CadenceClass::classify(self.spec.cadence);
        let delay = align::delay_to_boundary(class, Utc::now());
        debug!(
            client_id = %self.spec.client_id,
            initial_delay_ms = delay.as_millis() as u64,
            "arming aligned timer"
        );

        let mut ticks = time::interval_at(Instant::now() + delay, self.spec.cadence);
        let mut session = SessionState::NotOpened;

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    self.fire(class, &mut session);
                }
                _ = shutdown.changed() => {
                    info!(client_id = %self.spec.client_id, "stopping client runner");
                    break;
                }
            }
        }
        // The stream session (if any) drops here, ending the NDJSON body.
    }

    /// Emits one reading. Dispatch is fire-and-forget relative to the
    /// timer: nothing here awaits network completion.
    fn fire(&self, class: CadenceClass, session: &mut SessionState) {
        let reading = Reading::new(
            align::label_timestamp(class, Utc::now()),
            self.source.sample(),
        );

        match self.spec.mode {
            DeliveryMode::Batched => self.dispatch_batched(reading),
            DeliveryMode::Streamed => self.dispatch_streamed(reading, session),
        }
    }

    fn dispatch_batched(&self, reading: Reading) {
        let transport = self.batch.clone();
        let spec = self.spec.clone();
        tokio::spawn(async move {
            match transport.deliver(&spec, &reading).await {
                Ok(()) => info!(
                    client_id = %spec.client_id,
                    timestamp = %reading.timestamp,
                    value = reading.value,
                    "reading sent"
                ),
                Err(err) => warn!(
                    client_id = %spec.client_id,
                    timestamp = %reading.timestamp,
                    error = %err,
                    "delivery failed"
                ),
            }
        });
    }

    fn dispatch_streamed(&self, reading: Reading, session: &mut SessionState) {
        if matches!(session, SessionState::NotOpened) {
            // Opened on the first aligned tick, reused for every later one.
            *session = SessionState::Open(self.stream.open(&self.spec));
        }

        if let SessionState::Open(open) = session {
            match open.append(&reading) {
                Ok(()) => info!(
                    client_id = %self.spec.client_id,
                    timestamp = %reading.timestamp,
                    value = reading.value,
                    "reading appended"
                ),
                Err(DeliveryError::ChannelClosed) => {
                    warn!(
                        client_id = %self.spec.client_id,
                        timestamp = %reading.timestamp,
                        "stream channel closed, client degraded"
                    );
                    *session = SessionState::Broken;
                }
                Err(err) => warn!(
                    client_id = %self.spec.client_id,
                    timestamp = %reading.timestamp,
                    error = %err,
                    "stream write failed"
                ),
            }
        }
    }
}
