//! Generative AI Relay
//!
//! Forwards text and image generation requests from browser clients to the
//! Google Generative Language API, attaching a server-side API key so the key
//! never reaches the client.
//!
//! ## Module Structure
//!
//! - `config`: Relay configuration read once at startup
//! - `generation`: Supported generation kinds and their endpoints
//! - `upstream`: Outbound client and forward outcomes
//! - `error`: Error taxonomy and HTTP mapping
//! - `relay`: Request validation and the relay handler
//! - `server`: Router, CORS headers, server startup

pub mod config;
pub mod error;
pub mod generation;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::{ApiKey, ConfigError, RelayConfig, API_KEY_ENV};
pub use error::{ErrorBody, RelayError, TransportError};
pub use generation::{GenerationKind, DEFAULT_UPSTREAM_BASE};
pub use relay::{handle, GenerateRequest, RelayState};
pub use server::{build_router, run_server, GENERATE_PATH};
pub use upstream::{ForwardOutcome, UpstreamClient};
