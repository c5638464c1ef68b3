//! Native HTTP transport backed by reqwest.

use super::config::TransportConfig;
use super::{HttpTransport, TransportError};
use crate::models::{HttpMethod, HttpResponse, ResolvedRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use url::Url;

/// Reqwest-backed [`HttpTransport`].
///
/// One client instance is built up front (connection pooling, timeout) and
/// reused for every send.
#[derive(Debug, Clone)]
pub struct NativeTransport {
    client: reqwest::Client,
}

impl NativeTransport {
    /// Creates a transport with the default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates a transport with the given configuration.
    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl HttpTransport for NativeTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError> {
        // The template layer only checks the scheme prefix; the resolved
        // URL is parsed strictly here, after substitution.
        let url = Url::parse(&request.url)?;

        let start = Instant::now();
        let mut builder = self.client.request(to_reqwest_method(request.method), url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_connect() {
                TransportError::Network(format!("Connection failed: {}", e))
            } else {
                TransportError::from(e)
            }
        })?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status_code,
            status_text,
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(HttpMethod::GET), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::PATCH), reqwest::Method::PATCH);
        assert_eq!(
            to_reqwest_method(HttpMethod::OPTIONS),
            reqwest::Method::OPTIONS
        );
    }

    #[test]
    fn test_with_config_builds() {
        let transport = NativeTransport::with_config(&TransportConfig::new(5));
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_resolved_url_rejected() {
        let transport = NativeTransport::new().unwrap();
        let request = ResolvedRequest {
            method: HttpMethod::GET,
            url: "not a url".to_string(),
            headers: HashMap::new(),
            body: String::new(),
        };

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
