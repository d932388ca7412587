//! HTTP Plumbing
//!
//! Shared request execution for every backend client. Non-success responses
//! are turned into `SyncError::Transport` carrying the server's `message`
//! when it sent one.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

/// Error body variants seen from the backend
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    answer: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .or(self.answer)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Thin wrapper over a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send and require a success status; `failure` is the fallback message
    pub(crate) async fn execute(&self, request: RequestBuilder, failure: &str) -> SyncResult<Response> {
        self.execute_with(request, failure, failure).await
    }

    /// Like [`execute`](Self::execute) with a separate text for unreachable hosts
    pub(crate) async fn execute_with(
        &self,
        request: RequestBuilder,
        network_failure: &str,
        status_failure: &str,
    ) -> SyncResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed to send");
            SyncError::transport(network_failure)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), url = %response.url(), "request ok");
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| status_failure.to_string());
        warn!(status = status.as_u16(), %message, "request rejected");
        Err(SyncError::transport(message))
    }

    /// Decode a JSON body, mapping parse failures to transport errors
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response, failure: &str) -> SyncResult<T> {
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "response body did not decode");
            SyncError::transport(failure)
        })
    }
}
