//! Upstream client.
//!
//! Makes the single outbound call per relayed request and classifies the
//! result into a [`ForwardOutcome`]; the relay maps that to a response.

use crate::config::{ApiKey, RelayConfig};
use crate::error::TransportError;
use crate::generation::{GenerationKind, API_KEY_PARAM};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Result of one outbound call
#[derive(Debug)]
pub enum ForwardOutcome {
    /// Upstream answered 2xx with a JSON body
    Success(Value),
    /// Upstream answered with a non-success status
    Rejected { status: StatusCode, body: String },
    /// The call could not be completed or its body could not be decoded
    Transport(TransportError),
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base: String,
}

impl UpstreamClient {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base: config.upstream_base.clone(),
        })
    }

    /// POST `payload` to the endpoint for `kind`, passing the key as a query
    /// parameter. The payload is serialised as-is.
    pub async fn forward(
        &self,
        kind: GenerationKind,
        api_key: &ApiKey,
        payload: &Value,
    ) -> ForwardOutcome {
        let url = kind.endpoint_url(&self.base);
        debug!("Forwarding {} request to {}", kind, url);

        let response = match self
            .client
            .post(&url)
            .query(&[(API_KEY_PARAM, api_key.expose())])
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return ForwardOutcome::Transport(TransportError::request(e)),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return ForwardOutcome::Transport(TransportError::decode(e)),
        };

        if !status.is_success() {
            return ForwardOutcome::Rejected {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            };
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => ForwardOutcome::Success(value),
            Err(e) => ForwardOutcome::Transport(TransportError::InvalidJson(e)),
        }
    }
}
