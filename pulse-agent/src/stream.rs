use futures::channel::mpsc;
use reqwest::Body;
use tracing::{debug, error, warn};

use pulse_core::{ClientSpec, Reading};

use crate::batch::CLIENT_ID_HEADER;
use crate::error::DeliveryError;

/// Content type announced on the persistent channel.
const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

type LineSender = mpsc::UnboundedSender<Result<Vec<u8>, std::io::Error>>;

/// Opens one long-lived NDJSON request per streamed client.
#[derive(Clone, Default)]
pub struct StreamTransport {
    http: reqwest::Client,
}

impl StreamTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Opens the client's append-only channel.
    ///
    /// One POST is issued whose body is an open-ended line channel; the
    /// request is driven by a detached task, so an arbitrarily slow
    /// collector can never block the caller's timer. Establishment failure
    /// surfaces as a closed channel on the next append; there is no
    /// reconnect.
    pub fn open(&self, spec: &ClientSpec) -> StreamSession {
        let (tx, rx) = mpsc::unbounded();
        let request = self
            .http
            .post(spec.endpoint.clone())
            .bearer_auth(&spec.secret)
            .header(CLIENT_ID_HEADER, &spec.client_id)
            .header(reqwest::header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .body(Body::wrap_stream(rx));

        let client_id = spec.client_id.clone();
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(client_id = %client_id, "stream closed");
                }
                Ok(response) => {
                    warn!(
                        client_id = %client_id,
                        status = %response.status(),
                        "stream ended with unexpected status"
                    );
                }
                Err(err) => {
                    error!(
                        client_id = %client_id,
                        error = %err,
                        "failed to establish stream"
                    );
                }
            }
        });

        StreamSession { tx }
    }
}

/// One open outbound channel, exclusively owned by a client's runner from
/// its first aligned tick until shutdown.
///
/// Dropping the session ends the request body, which closes the stream
/// cleanly on the collector side.
pub struct StreamSession {
    tx: LineSender,
}

impl StreamSession {
    /// Appends one reading as a single JSON line.
    ///
    /// Fire-and-forget relative to the timer: the push never awaits, so
    /// collector backpressure cannot stall the scheduling loop for any
    /// client.
    pub fn append(&self, reading: &Reading) -> Result<(), DeliveryError> {
        let line = reading
            .to_ndjson_line()
            .map_err(|err| DeliveryError::Serialize(err.to_string()))?;

        self.tx
            .unbounded_send(Ok(line.into_bytes()))
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}
