//! Request-chain execution engine.
//!
//! This crate executes named, ordered lists of HTTP request templates one
//! at a time: each step is resolved against a shared variable environment,
//! sent over a pluggable transport, and may extract a value from its
//! response that later steps substitute into their own URL, headers, or
//! body.
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//!
//! - **models**: Request templates, resolved requests, and responses
//! - **variables**: The variable environment, `{{name}}` substitution, and
//!   response extraction via a restricted path grammar
//! - **chain**: Chain definitions, the registry, and the execution state
//!   machine with its observable events
//! - **history**: Append-only log of sent requests and their responses
//! - **transport**: The `HttpTransport` seam and a reqwest-backed
//!   implementation
//!
//! # Example
//!
//! ```no_run
//! use request_chain::{
//!     Chain, ChainRunner, HistoryLog, HttpMethod, NativeTransport, RequestTemplate,
//!     VariableEnvironment,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = Chain::new("login-flow")
//!     .step(
//!         RequestTemplate::new(HttpMethod::POST, "https://api.test/auth/login")
//!             .header("Content-Type", "application/json")
//!             .with_body(r#"{"user": "demo", "password": "demo"}"#)
//!             .extract_into("$.token", "token"),
//!     )
//!     .step(
//!         RequestTemplate::new(HttpMethod::GET, "https://api.test/profile")
//!             .header("Authorization", "Bearer {{token}}"),
//!     );
//!
//! let runner = ChainRunner::new(NativeTransport::new()?);
//! let mut env = VariableEnvironment::new();
//! let mut history = HistoryLog::new();
//!
//! let report = runner.run(&chain, &mut env, &mut history).await;
//! println!("outcome: {:?}", report.outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Placeholder syntax
//!
//! `{{identifier}}`, where the identifier is any run of characters
//! excluding `}`. Unresolved placeholders are left verbatim so partially
//! bound chains can be edited incrementally. Substitution is single-pass
//! and never recursive.
//!
//! # What the engine does not do
//!
//! No retries, no backoff, no parallel steps, no persistence, and no
//! general JSONPath: the extraction grammar is dotted fields plus
//! single-level array indices, nothing more.

pub mod chain;
pub mod history;
pub mod models;
pub mod transport;
pub mod variables;

pub use chain::{
    AbortHandle, Chain, ChainError, ChainEvent, ChainExecution, ChainObserver, ChainOutcome,
    ChainRegistry, ChainRunner, ChainState, FnObserver, RegistryError, RunReport, StepFailure,
};
pub use history::{HistoryEntry, HistoryLog};
pub use models::{
    ExtractRule, HttpMethod, HttpResponse, RequestTemplate, ResolvedRequest, ValidationError,
};
pub use transport::{HttpTransport, NativeTransport, TransportConfig, TransportError};
pub use variables::{
    capture, extract_path, resolve_template, substitute, ExtractError, VarValue,
    VariableEnvironment,
};
