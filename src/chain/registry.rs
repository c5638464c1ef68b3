//! Registry of chain definitions.
//!
//! The registry owns every chain definition by name and exposes the CRUD
//! surface a management UI drives: create, fetch, delete, and per-step
//! append/remove/replace. All operations are synchronous and immediate.
//! Step indices are 1-based, matching the execution cursor.
//!
//! The registry performs only structural validation on templates (a URL
//! must exist); scheme and method validation happen where templates are
//! produced, via [`crate::models::RequestTemplate::validate`] and
//! [`crate::models::HttpMethod::parse`].

use super::Chain;
use crate::models::RequestTemplate;
use std::collections::HashMap;
use std::fmt;

/// Errors produced by registry operations.
///
/// All of these are local to the mutating call; the caller retries with
/// corrected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A chain with this name already exists.
    AlreadyExists(String),

    /// No chain with this name.
    NotFound(String),

    /// Step index outside `[1, step_count]`.
    IndexOutOfRange {
        /// The offending 1-based index.
        index: usize,
        /// Number of steps in the chain.
        steps: usize,
    },

    /// The supplied template is structurally invalid.
    Validation(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyExists(name) => {
                write!(f, "Chain already exists: {}", name)
            }
            RegistryError::NotFound(name) => write!(f, "Chain not found: {}", name),
            RegistryError::IndexOutOfRange { index, steps } => {
                write!(f, "Step index {} out of range (chain has {} steps)", index, steps)
            }
            RegistryError::Validation(msg) => write!(f, "Invalid template: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

/// In-memory mapping of chain name to definition.
///
/// Chains live until explicitly deleted or the process ends; nothing is
/// persisted by the registry itself.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, Chain>,
}

impl ChainRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty chain under `name`.
    ///
    /// # Returns
    ///
    /// `RegistryError::AlreadyExists` if the name is taken.
    pub fn create(&mut self, name: impl Into<String>) -> Result<(), RegistryError> {
        let name = name.into();
        if self.chains.contains_key(&name) {
            return Err(RegistryError::AlreadyExists(name));
        }
        self.chains.insert(name.clone(), Chain::new(name));
        Ok(())
    }

    /// Fetches a chain by name.
    pub fn get(&self, name: &str) -> Result<&Chain, RegistryError> {
        self.chains
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Deletes a chain, returning its definition.
    pub fn delete(&mut self, name: &str) -> Result<Chain, RegistryError> {
        self.chains
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Appends a step to the named chain.
    pub fn append_step(
        &mut self,
        name: &str,
        template: RequestTemplate,
    ) -> Result<(), RegistryError> {
        Self::check_template(&template)?;
        let chain = self.get_mut(name)?;
        chain.steps.push(template);
        Ok(())
    }

    /// Removes the step at a 1-based index, returning it.
    ///
    /// # Returns
    ///
    /// `RegistryError::IndexOutOfRange` if `index` is outside
    /// `[1, step_count]`.
    pub fn remove_step(&mut self, name: &str, index: usize) -> Result<RequestTemplate, RegistryError> {
        let chain = self.get_mut(name)?;
        Self::check_index(index, chain.len())?;
        Ok(chain.steps.remove(index - 1))
    }

    /// Replaces the step at a 1-based index.
    pub fn replace_step(
        &mut self,
        name: &str,
        index: usize,
        template: RequestTemplate,
    ) -> Result<(), RegistryError> {
        Self::check_template(&template)?;
        let chain = self.get_mut(name)?;
        Self::check_index(index, chain.len())?;
        chain.steps[index - 1] = template;
        Ok(())
    }

    /// All chain names, sorted. Sorting keeps the listing stable across
    /// calls within a process run.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chains.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Checks if the registry has no chains.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Chain, RegistryError> {
        self.chains
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    fn check_template(template: &RequestTemplate) -> Result<(), RegistryError> {
        template
            .validate_structure()
            .map_err(|e| RegistryError::Validation(e.to_string()))
    }

    fn check_index(index: usize, steps: usize) -> Result<(), RegistryError> {
        if index == 0 || index > steps {
            return Err(RegistryError::IndexOutOfRange { index, steps });
        }
        Ok(())
    }
}
