//! Chain definitions, registry, and the execution state machine.

pub mod events;
pub mod registry;
pub mod runner;

pub use events::{ChainEvent, ChainObserver, FnObserver};
pub use registry::{ChainRegistry, RegistryError};
pub use runner::{
    AbortHandle, ChainError, ChainExecution, ChainOutcome, ChainRunner, ChainState, RunReport,
    StepFailure,
};

use crate::models::RequestTemplate;
use serde::{Deserialize, Serialize};

/// A named, ordered sequence of request templates.
///
/// Steps are executed strictly in stored order; step positions are 1-based
/// everywhere a position appears in the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// Chain name, unique within a registry.
    pub name: String,

    /// Ordered steps.
    pub steps: Vec<RequestTemplate>,
}

impl Chain {
    /// Creates a new empty chain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step (builder style).
    pub fn step(mut self, template: RequestTemplate) -> Self {
        self.steps.push(template);
        self
    }

    /// Returns the step at a 1-based position.
    pub fn step_at(&self, position: usize) -> Option<&RequestTemplate> {
        if position == 0 {
            return None;
        }
        self.steps.get(position - 1)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Checks if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
