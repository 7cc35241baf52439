//! Relay error taxonomy and its HTTP mapping.
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `MissingApiKey` | 500 | generic configuration message |
//! | `MissingFields` | 400 | names `type` and `payload` |
//! | `InvalidKind` | 400 | lists the accepted kinds |
//! | `Upstream` | upstream status | reason phrase + raw upstream body as `details` |
//! | `Internal` | 500 | generic message, cause logged only |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const MISSING_API_KEY_MESSAGE: &str = "API key is not configured on the server.";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing 'type' or 'payload' in request body.";
pub const INVALID_KIND_MESSAGE: &str = "Invalid 'type'. Must be 'text' or 'image'.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Failure to complete the outbound call or read its result
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Upstream request failed: {0}")]
    Request(reqwest::Error),
    #[error("Failed to read upstream response: {0}")]
    Decode(reqwest::Error),
    #[error("Upstream returned invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

impl TransportError {
    /// The request URL carries the API key in its query string; strip it
    /// before the error can reach a log line.
    pub fn request(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }

    pub fn decode(err: reqwest::Error) -> Self {
        Self::Decode(err.without_url())
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) | Self::Decode(e) => e.is_timeout(),
            Self::InvalidJson(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Upstream API key is not configured")]
    MissingApiKey,

    #[error("Request body is missing 'type' or 'payload'")]
    MissingFields,

    #[error("Unsupported generation type: {0}")]
    InvalidKind(String),

    #[error("Upstream rejected request with status {status}")]
    Upstream { status: StatusCode, body: String },

    #[error(transparent)]
    Internal(#[from] TransportError),
}

/// JSON error body returned to callers
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingFields | Self::InvalidKind(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
        }
    }

    /// Body shown to the caller. Internal causes are never included.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::MissingApiKey => ErrorBody {
                error: MISSING_API_KEY_MESSAGE.to_string(),
                details: None,
            },
            Self::MissingFields => ErrorBody {
                error: MISSING_FIELDS_MESSAGE.to_string(),
                details: None,
            },
            Self::InvalidKind(_) => ErrorBody {
                error: INVALID_KIND_MESSAGE.to_string(),
                details: None,
            },
            Self::Upstream { status, body } => ErrorBody {
                error: format!(
                    "Google AI API request failed: {}",
                    status.canonical_reason().unwrap_or("Unknown Status")
                ),
                details: Some(body.clone()),
            },
            Self::Internal(_) => ErrorBody {
                error: INTERNAL_ERROR_MESSAGE.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
