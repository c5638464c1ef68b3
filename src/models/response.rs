//! HTTP response data models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// An HTTP response received from a server.
///
/// Immutable once received: the engine records it into history and reads
/// from it during extraction but never modifies it afterwards. Header keys
/// are kept case-sensitive as received; lookups that need to be
/// case-insensitive go through [`HttpResponse::content_type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// HTTP status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers as key-value pairs, keys as received.
    pub headers: HashMap<String, String>,

    /// Response body as raw text.
    pub body: String,

    /// Total round-trip duration as measured by the transport.
    #[serde(default)]
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a new HttpResponse with the given status code and text and
    /// no headers or body.
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: String::new(),
            duration: Duration::ZERO,
        }
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Checks if the response status indicates a redirection (3xx).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Checks if the response status indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Checks if the response status indicates a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Gets the Content-Type header value if present (case-insensitive
    /// lookup).
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Sets the response body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }
}
