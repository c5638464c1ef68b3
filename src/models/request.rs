//! HTTP request data models.
//!
//! This module defines the core data structures for representing request
//! templates and the resolved requests produced from them, including the
//! request method, headers, body, and optional extraction rule.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Errors produced when constructing or validating a request template.
///
/// These are rejected before a template ever reaches execution, so the
/// engine never has to special-case malformed steps at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Method string did not match one of the recognized verbs.
    UnknownMethod(String),

    /// Template URL is empty or whitespace.
    MissingUrl,

    /// Template URL does not use the `http` or `https` scheme.
    UnsupportedScheme(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownMethod(method) => {
                write!(f, "Unknown HTTP method: {}", method)
            }
            ValidationError::MissingUrl => write!(f, "Request template has no URL"),
            ValidationError::UnsupportedScheme(url) => {
                write!(f, "URL must use http:// or https://: {}", url)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// HTTP request method.
///
/// The seven verbs a request template may carry. Parsing is
/// case-insensitive; rendering is always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Parses a string into an HttpMethod.
    ///
    /// # Arguments
    ///
    /// * `s` - A string slice representing the HTTP method, any casing
    ///
    /// # Returns
    ///
    /// The matching `HttpMethod`, or `ValidationError::UnknownMethod` if the
    /// string is not one of the seven recognized verbs.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            other => Err(ValidationError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule for extracting a value from a step's response body.
///
/// The path uses the restricted grammar understood by
/// [`crate::variables::extract_path`]: dotted field names with optional
/// single-level array indices, e.g. `$.items[0].id`. The extracted value is
/// bound into the variable environment under `variable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRule {
    /// Path expression evaluated against the decoded JSON response body.
    pub path: String,

    /// Name of the variable the extracted value is bound to.
    pub variable: String,
}

impl ExtractRule {
    /// Creates a new extraction rule.
    pub fn new(path: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            variable: variable.into(),
        }
    }
}

/// A single step of a request chain, before substitution.
///
/// URL, header values, and body may all contain `{{name}}` placeholders
/// that are resolved against the variable environment immediately before
/// the request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// HTTP method (one of the seven recognized verbs).
    pub method: HttpMethod,

    /// Target URL. May contain placeholders anywhere, including the host.
    pub url: String,

    /// Request headers as key-value pairs. Values may contain placeholders;
    /// names are sent as stored.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body. The empty string means "no body". May contain
    /// placeholders.
    #[serde(default)]
    pub body: String,

    /// Optional extraction applied to the response of this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractRule>,
}

impl RequestTemplate {
    /// Creates a new template with the given method and URL and no headers,
    /// body, or extraction.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: String::new(),
            extract: None,
        }
    }

    /// Adds a header (builder style).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body (builder style).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Declares an extraction from this step's response (builder style).
    ///
    /// # Arguments
    ///
    /// * `path` - Path expression, e.g. `$.token`
    /// * `variable` - Variable name to bind the extracted value to
    pub fn extract_into(mut self, path: impl Into<String>, variable: impl Into<String>) -> Self {
        self.extract = Some(ExtractRule::new(path, variable));
        self
    }

    /// Checks if the template has a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Structural check applied by the registry on every mutation.
    ///
    /// Only rejects templates that could not be executed at all (no URL).
    /// Scheme and method validation belong to the producing collaborator;
    /// see [`RequestTemplate::validate`].
    pub fn validate_structure(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        Ok(())
    }

    /// Full template validation for form/UI collaborators.
    ///
    /// Enforces the template invariant: a non-empty URL matching
    /// `http://...` or `https://...`. Placeholders are permitted anywhere in
    /// the URL, so this checks the scheme prefix only; the resolved URL is
    /// parsed strictly by the transport.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_structure()?;
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::UnsupportedScheme(self.url.clone()));
        }
        Ok(())
    }
}

/// A request template with every placeholder substituted and the body
/// encoded, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// HTTP method.
    pub method: HttpMethod,

    /// Fully substituted target URL.
    pub url: String,

    /// Headers with substituted values.
    pub headers: HashMap<String, String>,

    /// Substituted body. Empty string means "no body".
    pub body: String,
}
