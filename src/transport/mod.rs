//! HTTP transport seam.
//!
//! The engine never talks to the network directly; it hands a resolved
//! request to an [`HttpTransport`] and awaits a response or a transport
//! error. The trait is object-safe so hosts can inject their own client
//! (and tests can inject scripted ones). [`NativeTransport`] is the
//! reqwest-backed implementation. The transport owns timeouts; the engine
//! has none of its own and never retries.

pub mod config;
pub mod native;

pub use config::TransportConfig;
pub use native::NativeTransport;

use crate::models::{HttpResponse, ResolvedRequest};
use async_trait::async_trait;
use std::fmt;

/// Errors produced while sending a single request.
///
/// Any of these aborts the running chain; none is retried by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network failure: connection refused, DNS error, broken transfer.
    Network(String),

    /// The request exceeded the transport's configured timeout.
    Timeout,

    /// The resolved URL could not be parsed.
    InvalidUrl(String),

    /// TLS/SSL failure during an HTTPS connection.
    Tls(String),

    /// The request could not be constructed from the resolved data.
    Build(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Timeout => write!(f, "Request timed out"),
            TransportError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            TransportError::Tls(msg) => write!(f, "TLS/SSL error: {}", msg),
            TransportError::Build(msg) => write!(f, "Request build error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Convert reqwest errors to TransportError.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() || err.is_request() {
            TransportError::Network(err.to_string())
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else if err.to_string().contains("certificate")
            || err.to_string().contains("TLS")
            || err.to_string().contains("SSL")
        {
            TransportError::Tls(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Convert URL parsing errors to TransportError.
impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        TransportError::InvalidUrl(err.to_string())
    }
}

/// One-shot request sender.
///
/// `send` is the only suspension point in the engine: everything around it
/// (substitution, extraction, cursor bookkeeping) is synchronous CPU work.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one resolved request and returns its response.
    ///
    /// No retries: a failure is returned as-is and the caller decides what
    /// to do with it.
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError>;
}
