use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{FundReply, FundRequest};
use crate::core::constants::{HTTP_CONNECT_TIMEOUT, HTTP_REQUEST_TIMEOUT};

/// Anything that can answer an emergency fund question.
///
/// The terminal client talks to [`FundClient`]; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait FundService: Send + Sync {
    async fn calculate(&self, message: &str) -> Result<FundReply, FundServiceError>;
}

/// Errors that can occur while asking the calculation service for a reply.
///
/// The transcript shows the same message for every variant; the detail is
/// only written to the diagnostic log.
#[derive(Debug)]
pub enum FundServiceError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    Transport(reqwest::Error),

    /// The service answered with a non-success status.
    Status {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    Decode(serde_json::Error),
}

impl fmt::Display for FundServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundServiceError::Transport(source) => write!(f, "request failed: {source}"),
            FundServiceError::Status { status, body } => {
                write!(f, "service returned status {status}: {}", body.trim())
            }
            FundServiceError::Decode(source) => write!(f, "invalid response body: {source}"),
        }
    }
}

impl StdError for FundServiceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            FundServiceError::Transport(source) => Some(source),
            FundServiceError::Status { .. } => None,
            FundServiceError::Decode(source) => Some(source),
        }
    }
}

/// HTTP client for the remote calculation endpoint.
#[derive(Clone, Debug)]
pub struct FundClient {
    client: reqwest::Client,
    endpoint: String,
}

impl FundClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FundServiceError> {
        Self::with_timeouts(endpoint, HTTP_CONNECT_TIMEOUT, HTTP_REQUEST_TIMEOUT)
    }

    /// A client whose requests give up after `request` even if the service
    /// accepted the connection and went quiet.
    pub fn with_timeouts(
        endpoint: impl Into<String>,
        connect: Duration,
        request: Duration,
    ) -> Result<Self, FundServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .build()
            .map_err(FundServiceError::Transport)?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FundService for FundClient {
    async fn calculate(&self, message: &str) -> Result<FundReply, FundServiceError> {
        debug!(endpoint = %self.endpoint, chars = message.chars().count(), "posting fund question");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&FundRequest { message })
            .send()
            .await
            .map_err(FundServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(FundServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(FundServiceError::Transport)?;
        let reply = serde_json::from_slice::<FundReply>(&bytes).map_err(FundServiceError::Decode)?;
        debug!(has_reply = reply.text().is_some(), "fund service answered");
        Ok(reply)
    }
}
