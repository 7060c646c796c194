use pulse_core::{ClientSpec, Reading};

use crate::error::DeliveryError;

/// Correlation header carrying the client identity.
pub const CLIENT_ID_HEADER: &str = "X-Client-ID";

/// Delivers one reading as one complete POST request per tick.
///
/// The shared client may pool connections, but no reuse guarantee exists
/// across ticks; every tick is an independent request.
#[derive(Clone, Default)]
pub struct BatchTransport {
    http: reqwest::Client,
}

impl BatchTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Sends one reading to the client's resolved endpoint.
    ///
    /// The outcome is observed only for logging; the caller never blocks a
    /// subsequent tick on it.
    pub async fn deliver(
        &self,
        spec: &ClientSpec,
        reading: &Reading,
    ) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(spec.endpoint.clone())
            .bearer_auth(&spec.secret)
            .header(CLIENT_ID_HEADER, &spec.client_id)
            .json(reading)
            .send()
            .await
            .map_err(|err| DeliveryError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::UnexpectedStatus {
                status: response.status(),
            });
        }

        Ok(())
    }
}
