//! Core data models for request templates, resolved requests, and responses.

pub mod request;
pub mod response;

pub use request::{ExtractRule, HttpMethod, RequestTemplate, ResolvedRequest, ValidationError};
pub use response::HttpResponse;
