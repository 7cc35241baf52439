//! Relay handler.
//!
//! Checks run in a fixed order:
//! 1. Method: OPTIONS answers the preflight, anything but POST is 405
//! 2. Configuration: the upstream API key must be present
//! 3. Body: `type` and `payload` must both be non-empty
//! 4. Type: `type` must name a [`GenerationKind`]
//!
//! A request passing all four is forwarded once; the [`ForwardOutcome`] is
//! mapped to exactly one response.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::generation::GenerationKind;
use crate::upstream::{ForwardOutcome, UpstreamClient};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::ALLOW, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared, read-only state handed to every invocation
pub struct RelayState {
    pub config: RelayConfig,
    pub upstream: UpstreamClient,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self { config, upstream })
    }
}

/// Validated inbound request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub kind: GenerationKind,
    pub payload: Value,
}

impl GenerateRequest {
    /// Decode a raw body. Invalid JSON or a non-object body counts as both
    /// fields missing.
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        let mut fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            _ => return Err(RelayError::MissingFields),
        };

        let kind = fields.remove("type").filter(|v| !is_empty(v));
        let payload = fields.remove("payload").filter(|v| !is_empty(v));

        let (kind, payload) = match (kind, payload) {
            (Some(kind), Some(payload)) => (kind, payload),
            _ => return Err(RelayError::MissingFields),
        };

        let kind = kind
            .as_str()
            .and_then(GenerationKind::from_tag)
            .ok_or_else(|| RelayError::InvalidKind(kind.to_string()))?;

        Ok(Self { kind, payload })
    }
}

/// `null`, `false`, `0` and `""` count as absent. Empty objects and arrays
/// are present and go upstream, which reports its own error for them.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Entry point for every relayed request
pub async fn handle(
    State(state): State<Arc<RelayState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(ALLOW, "POST")],
            "Method Not Allowed",
        )
            .into_response();
    }

    match relay(&state, &body).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn relay(state: &RelayState, body: &[u8]) -> Result<Value, RelayError> {
    let api_key = state.config.api_key.as_ref().ok_or_else(|| {
        error!("Rejecting request: upstream API key is not configured");
        RelayError::MissingApiKey
    })?;

    let request = GenerateRequest::parse(body).map_err(|e| {
        warn!("Rejecting request: {}", e);
        e
    })?;

    info!(
        "Relaying {} request to {} ({} bytes)",
        request.kind,
        request.kind.model(),
        body.len()
    );

    let outcome = state
        .upstream
        .forward(request.kind, api_key, &request.payload)
        .await;

    into_result(request.kind, outcome)
}

fn into_result(kind: GenerationKind, outcome: ForwardOutcome) -> Result<Value, RelayError> {
    match outcome {
        ForwardOutcome::Success(value) => {
            info!("Upstream {} request succeeded", kind);
            Ok(value)
        }
        ForwardOutcome::Rejected { status, body } => {
            error!("Google AI API error ({}): {}", status, body);
            Err(RelayError::Upstream { status, body })
        }
        ForwardOutcome::Transport(e) => {
            if e.is_timeout() {
                error!("Upstream {} request timed out: {}", kind, e);
            } else {
                error!("Internal error relaying {} request: {}", kind, e);
            }
            Err(RelayError::Internal(e))
        }
    }
}
