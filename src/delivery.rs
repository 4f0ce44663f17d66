//! Message delivery over the messages API.

use thiserror::Error;

use crate::external::HTTP_CLIENT;
use crate::message::Message;

/// Production endpoint messages are posted to
pub const DEFAULT_API_URL: &str = "https://api.ciscospark.com/v1/messages";

/// Delivery failure shapes, as seen by the orchestrator.
///
/// A completed HTTP exchange is never an error here, whatever its status;
/// judging 200-versus-the-rest belongs to the caller.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The API server did not provide a response; likely intermittent
    #[error("no response from the messages API")]
    Transport(#[source] reqwest::Error),

    /// Anything unexpected while issuing the request
    #[error("message delivery failed unexpectedly")]
    Internal(#[source] anyhow::Error),
}

/// Posts messages to the messages API with bearer-token auth.
///
/// One POST per call, no retries; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    url: String,
}

impl Default for DeliveryClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl DeliveryClient {
    /// Create a client posting to `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Post one message, returning the raw HTTP status of the exchange.
    ///
    /// # Errors
    /// `Transport` when no response could be obtained (connect failure or
    /// timeout), `Internal` for any other fault during the call.
    pub async fn send(&self, message: &Message, token: &str) -> Result<u16, DeliveryError> {
        let response = HTTP_CLIENT
            .post(&self.url)
            .bearer_auth(token)
            .json(message)
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().as_u16()),
            Err(e) if e.is_connect() || e.is_timeout() => Err(DeliveryError::Transport(e)),
            Err(e) => Err(DeliveryError::Internal(e.into())),
        }
    }
}
