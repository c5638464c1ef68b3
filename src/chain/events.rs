//! Observable chain-execution events.
//!
//! The engine reports progress through an optional observer so a UI layer
//! can render activity without the engine knowing anything about
//! presentation. Observers are entirely optional; execution behaves the
//! same without one.

use super::runner::ChainOutcome;
use crate::history::HistoryEntry;
use crate::models::ResolvedRequest;
use std::sync::Arc;

/// Events emitted while a chain runs.
#[derive(Debug, Clone)]
pub enum ChainEvent {
    /// A resolved request was handed to the transport.
    RequestSent {
        /// Name of the running chain.
        chain: String,
        /// 1-based step position.
        step: usize,
        /// The request exactly as sent.
        request: ResolvedRequest,
    },

    /// A response arrived and was recorded into history.
    ResponseReceived {
        /// Name of the running chain.
        chain: String,
        /// 1-based step position.
        step: usize,
        /// The completed history entry (request paired with response).
        entry: HistoryEntry,
    },

    /// The run reached a terminal state.
    ChainFinished {
        /// Name of the chain.
        chain: String,
        /// How the run ended.
        outcome: ChainOutcome,
    },
}

/// Receiver for chain-execution events.
///
/// # Example
///
/// ```
/// use request_chain::chain::events::{ChainEvent, ChainObserver};
///
/// struct PrintObserver;
///
/// impl ChainObserver for PrintObserver {
///     fn on_event(&self, event: ChainEvent) {
///         match event {
///             ChainEvent::RequestSent { chain, step, .. } => {
///                 println!("[{}] step {} sent", chain, step)
///             }
///             ChainEvent::ResponseReceived { step, .. } => println!("step {} done", step),
///             ChainEvent::ChainFinished { chain, .. } => println!("{} finished", chain),
///         }
///     }
/// }
/// ```
pub trait ChainObserver: Send + Sync {
    /// Called once per event, on the task driving the chain.
    fn on_event(&self, event: ChainEvent);
}

/// A [`ChainObserver`] backed by a closure.
pub struct FnObserver<F: Fn(ChainEvent) + Send + Sync>(pub F);

impl<F: Fn(ChainEvent) + Send + Sync> ChainObserver for FnObserver<F> {
    fn on_event(&self, event: ChainEvent) {
        (self.0)(event);
    }
}

/// Emit an event if an observer is present. No-op otherwise.
pub(crate) fn emit(observer: &Option<Arc<dyn ChainObserver>>, event: ChainEvent) {
    if let Some(obs) = observer {
        obs.on_event(event);
    }
}
