//! Chain execution state machine.
//!
//! A [`ChainRunner`] drives one chain at a time through the step pipeline:
//! resolve the template against the variable environment, record and send
//! the request, record the response, run the step's extraction if it has
//! one, advance the cursor. The transport call is the only suspension
//! point; everything else is synchronous.
//!
//! Execution state is a value ([`ChainExecution`]) owned by whoever starts
//! the run, so nothing stops a host from running several chains at once;
//! each run just needs its own environment and history (or external
//! serialization of access to shared ones).

use super::events::{emit, ChainEvent, ChainObserver};
use super::Chain;
use crate::history::HistoryLog;
use crate::transport::{HttpTransport, TransportError};
use crate::variables::{capture, resolve_template, ExtractError, VariableEnvironment};
use log::{debug, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// States of a chain execution.
///
/// `Idle` is both the initial state and the state a runner conceptually
/// returns to after a terminal state; a finished [`ChainExecution`] is
/// simply dropped and a new one created for the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// No step has run yet.
    Idle,
    /// The cursor points at a step awaiting execution.
    Running,
    /// Every step completed.
    Completed,
    /// The run stopped early: a failure or an explicit abort.
    Aborted,
}

/// Errors that stop a running chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// The transport failed to deliver the step's request.
    Transport(TransportError),

    /// The step declared an extraction and it failed.
    Extract(ExtractError),

    /// The abort handle was triggered between steps.
    AbortRequested,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Transport(err) => write!(f, "Transport failure: {}", err),
            ChainError::Extract(err) => write!(f, "Extraction failed: {}", err),
            ChainError::AbortRequested => write!(f, "Aborted by caller"),
        }
    }
}

impl std::error::Error for ChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChainError::Transport(err) => Some(err),
            ChainError::Extract(err) => Some(err),
            ChainError::AbortRequested => None,
        }
    }
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        ChainError::Transport(err)
    }
}

impl From<ExtractError> for ChainError {
    fn from(err: ExtractError) -> Self {
        ChainError::Extract(err)
    }
}

/// The step a run stopped on, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    /// 1-based position of the step that failed (for an abort request, the
    /// step that was about to run).
    pub step: usize,

    /// What went wrong.
    pub error: ChainError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {}", self.step, self.error)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// Every step completed.
    Completed,
    /// The run stopped early.
    Aborted(StepFailure),
}

impl ChainOutcome {
    /// Checks if the run completed every step.
    pub fn is_completed(&self) -> bool {
        matches!(self, ChainOutcome::Completed)
    }
}

/// Execution state of a single run: which chain, where the cursor is, and
/// whether the run is still going.
///
/// The cursor is a 1-based index into the step sequence and starts at 1.
/// After a completed run it is `step_count + 1`; after an aborted run it
/// still points at the step that did not finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainExecution {
    /// Name of the chain being executed.
    pub chain: String,

    /// 1-based cursor into the step sequence.
    pub cursor: usize,

    /// Current state.
    pub state: ChainState,
}

impl ChainExecution {
    fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            cursor: 1,
            state: ChainState::Idle,
        }
    }
}

/// Report returned by [`ChainRunner::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Final execution state (terminal cursor position and state).
    pub execution: ChainExecution,

    /// How the run ended.
    pub outcome: ChainOutcome,
}

/// Shared flag for stopping a run between steps.
///
/// Aborting never interrupts an in-flight transport call; it takes effect
/// at the next step boundary. The flag stays set once triggered, so clear
/// it before reusing a runner for another run.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Creates a new unset handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop at the next step boundary.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Checks whether an abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears the flag so the runner can be reused.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drives chains through the resolve, send, extract, advance pipeline.
///
/// The runner is generic over its transport; tests inject scripted
/// transports, hosts inject [`crate::transport::NativeTransport`].
pub struct ChainRunner<T: HttpTransport> {
    transport: T,
    observer: Option<Arc<dyn ChainObserver>>,
    abort: AbortHandle,
}

impl<T: HttpTransport> ChainRunner<T> {
    /// Creates a runner over the given transport, with no observer.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            observer: None,
            abort: AbortHandle::new(),
        }
    }

    /// Attaches an observer (builder style).
    pub fn with_observer(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns a handle that aborts the current (or next) run at a step
    /// boundary. Clones share the same flag.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Runs `chain` to completion or until it aborts.
    ///
    /// Steps execute strictly in stored order, one at a time. Variables
    /// extracted by earlier steps are visible to later ones through `env`.
    /// Every resolved request is appended to `history` before it is sent.
    ///
    /// A run never returns `Err`: failures are terminal outcomes, reported
    /// in the [`RunReport`] and via the observer. Variables extracted
    /// before an abort stay bound in `env`.
    pub async fn run(
        &self,
        chain: &Chain,
        env: &mut VariableEnvironment,
        history: &mut HistoryLog,
    ) -> RunReport {
        let mut execution = ChainExecution::new(chain.name.clone());
        execution.state = ChainState::Running;
        let total = chain.len();
        debug!("chain '{}' starting, {} steps", chain.name, total);

        while let Some(template) = chain.step_at(execution.cursor) {
            if self.abort.is_aborted() {
                warn!(
                    "chain '{}' abort requested before step {}",
                    chain.name, execution.cursor
                );
                return self.finish_aborted(execution, ChainError::AbortRequested);
            }

            let step = execution.cursor;
            let resolved = resolve_template(template, env);
            debug!(
                "chain '{}' step {}/{}: {} {}",
                chain.name, step, total, resolved.method, resolved.url
            );

            // The request is on the record before the transport sees it.
            let entry_index = history.begin(chain.name.clone(), step, resolved.clone());
            emit(
                &self.observer,
                ChainEvent::RequestSent {
                    chain: chain.name.clone(),
                    step,
                    request: resolved.clone(),
                },
            );

            let response = match self.transport.send(&resolved).await {
                Ok(response) => response,
                Err(err) => {
                    warn!("chain '{}' step {} transport failure: {}", chain.name, step, err);
                    history.record_failure(entry_index, err.to_string());
                    return self.finish_aborted(execution, ChainError::Transport(err));
                }
            };

            if let Some(entry) = history.record_response(entry_index, response.clone()) {
                emit(
                    &self.observer,
                    ChainEvent::ResponseReceived {
                        chain: chain.name.clone(),
                        step,
                        entry: entry.clone(),
                    },
                );
            }

            if let Some(rule) = template.extract.as_ref().filter(|r| !r.path.is_empty()) {
                match capture(&response.body, rule, env) {
                    Ok(value) => {
                        debug!(
                            "chain '{}' step {} bound '{}' = {}",
                            chain.name,
                            step,
                            rule.variable,
                            value.render()
                        );
                    }
                    Err(err) => {
                        warn!("chain '{}' step {} extraction failure: {}", chain.name, step, err);
                        return self.finish_aborted(execution, ChainError::Extract(err));
                    }
                }
            }

            execution.cursor += 1;
        }

        execution.state = ChainState::Completed;
        debug!("chain '{}' completed", chain.name);
        emit(
            &self.observer,
            ChainEvent::ChainFinished {
                chain: chain.name.clone(),
                outcome: ChainOutcome::Completed,
            },
        );
        RunReport {
            execution,
            outcome: ChainOutcome::Completed,
        }
    }

    fn finish_aborted(&self, mut execution: ChainExecution, error: ChainError) -> RunReport {
        execution.state = ChainState::Aborted;
        let outcome = ChainOutcome::Aborted(StepFailure {
            step: execution.cursor,
            error,
        });
        emit(
            &self.observer,
            ChainEvent::ChainFinished {
                chain: execution.chain.clone(),
                outcome: outcome.clone(),
            },
        );
        RunReport { execution, outcome }
    }
}
