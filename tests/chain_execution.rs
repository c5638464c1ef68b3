//! End-to-end chain execution tests against a scripted transport.
//!
//! These exercise the full pipeline (registry, substitution, state
//! machine, extraction, history) without touching the network.

use async_trait::async_trait;
use request_chain::{
    Chain, ChainError, ChainOutcome, ChainRegistry, ChainRunner, ChainState, ExtractError,
    HistoryLog, HttpMethod, HttpResponse, HttpTransport, RegistryError, RequestTemplate,
    ResolvedRequest, TransportError, VariableEnvironment,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays a fixed sequence of transport results. What was actually sent
/// is asserted through the history log, which records every request.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, _request: &ResolvedRequest) -> Result<HttpResponse, TransportError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}

fn json_response(body: &str) -> HttpResponse {
    let mut response = HttpResponse::new(200, "OK");
    response.add_header("Content-Type", "application/json");
    response.set_body(body);
    response
}

/// Three steps; step 2 extracts `$.id` into `userId`, step 3 uses it in
/// its URL.
fn user_chain() -> Chain {
    Chain::new("user-flow")
        .step(RequestTemplate::new(HttpMethod::GET, "https://api.test/health"))
        .step(
            RequestTemplate::new(HttpMethod::POST, "https://api.test/users")
                .header("Content-Type", "application/json")
                .with_body(r#"{"name": "demo"}"#)
                .extract_into("$.id", "userId"),
        )
        .step(RequestTemplate::new(
            HttpMethod::GET,
            "https://api.test/users/{{userId}}",
        ))
}

#[tokio::test]
async fn extracted_value_resolves_next_step_url() {
    let transport = ScriptedTransport::new(vec![
        Ok(json_response(r#"{"status": "ok"}"#)),
        Ok(json_response(r#"{"id": 42}"#)),
        Ok(json_response(r#"{"id": 42, "name": "demo"}"#)),
    ]);
    let runner = ChainRunner::new(transport);
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();

    let report = runner.run(&user_chain(), &mut env, &mut history).await;

    assert!(report.outcome.is_completed());
    assert_eq!(report.execution.state, ChainState::Completed);

    // Step 3's URL was resolved with the value extracted at step 2.
    assert_eq!(history.entries()[2].request.url, "https://api.test/users/42");
    assert_eq!(env.get("userId").unwrap().render(), "42");
}

#[tokio::test]
async fn transport_failure_mid_chain_stops_the_run() {
    let transport = ScriptedTransport::new(vec![
        Ok(json_response(r#"{"status": "ok"}"#)),
        Err(TransportError::Network("connection refused".to_string())),
    ]);
    let runner = ChainRunner::new(transport);
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();

    let report = runner.run(&user_chain(), &mut env, &mut history).await;

    match report.outcome {
        ChainOutcome::Aborted(failure) => {
            assert_eq!(failure.step, 2);
            assert!(matches!(failure.error, ChainError::Transport(_)));
        }
        other => panic!("expected abort, got {:?}", other),
    }

    // Step 1 completed, step 2 is the failed attempt, step 3 never ran.
    assert_eq!(history.len(), 2);
    assert!(history.entries()[0].is_complete());
    assert!(history.entries()[1].is_failure());
    assert!(history.entries()[1].response.is_none());
    assert!(env.get("userId").is_none());
}

#[tokio::test]
async fn identical_runs_with_fresh_environments_are_deterministic() {
    let responses = || {
        vec![
            Ok(json_response(r#"{"status": "ok"}"#)),
            Ok(json_response(r#"{"id": 42}"#)),
            Ok(json_response(r#"{"id": 42}"#)),
        ]
    };

    let first = ChainRunner::new(ScriptedTransport::new(responses()));
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();
    first.run(&user_chain(), &mut env, &mut history).await;
    let first_sent: Vec<ResolvedRequest> = history
        .entries()
        .iter()
        .map(|e| e.request.clone())
        .collect();

    let second = ChainRunner::new(ScriptedTransport::new(responses()));
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();
    second.run(&user_chain(), &mut env, &mut history).await;
    let second_sent: Vec<ResolvedRequest> = history
        .entries()
        .iter()
        .map(|e| e.request.clone())
        .collect();

    assert_eq!(first_sent, second_sent);
}

#[tokio::test]
async fn parse_error_on_declared_extraction_aborts() {
    let chain = Chain::new("c").step(
        RequestTemplate::new(HttpMethod::GET, "https://api.test/data").extract_into("$.id", "id"),
    );

    let transport = ScriptedTransport::new(vec![Ok(json_response("<html>not json</html>"))]);
    let runner = ChainRunner::new(transport);
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();

    let report = runner.run(&chain, &mut env, &mut history).await;

    match report.outcome {
        ChainOutcome::Aborted(failure) => {
            assert!(matches!(
                failure.error,
                ChainError::Extract(ExtractError::Parse(_))
            ));
        }
        other => panic!("expected abort, got {:?}", other),
    }
    assert!(env.get("id").is_none());
}

#[tokio::test]
async fn steps_without_extraction_ignore_non_json_bodies() {
    let chain = Chain::new("c")
        .step(RequestTemplate::new(HttpMethod::GET, "https://api.test/page"))
        .step(RequestTemplate::new(HttpMethod::GET, "https://api.test/other"));

    let transport = ScriptedTransport::new(vec![
        Ok(json_response("<html></html>")),
        Ok(json_response("plain text")),
    ]);
    let runner = ChainRunner::new(transport);
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();

    let report = runner.run(&chain, &mut env, &mut history).await;
    assert!(report.outcome.is_completed());
}

#[tokio::test]
async fn unresolved_placeholders_are_sent_verbatim() {
    let chain = Chain::new("c").step(RequestTemplate::new(
        HttpMethod::GET,
        "https://api.test/users/{{missing}}",
    ));

    let transport = ScriptedTransport::new(vec![Ok(json_response("{}"))]);
    let runner = ChainRunner::new(transport);
    let mut env = VariableEnvironment::new();
    let mut history = HistoryLog::new();

    runner.run(&chain, &mut env, &mut history).await;

    // History records the request exactly as sent.
    assert_eq!(
        history.entries()[0].request.url,
        "https://api.test/users/{{missing}}"
    );
}

#[test]
fn registry_crud_errors() {
    let mut registry = ChainRegistry::new();

    registry.create("x").unwrap();
    assert_eq!(
        registry.create("x").unwrap_err(),
        RegistryError::AlreadyExists("x".to_string())
    );

    registry
        .append_step("x", RequestTemplate::new(HttpMethod::GET, "https://a.test/1"))
        .unwrap();
    registry
        .append_step("x", RequestTemplate::new(HttpMethod::GET, "https://a.test/2"))
        .unwrap();

    assert_eq!(
        registry.remove_step("x", 5).unwrap_err(),
        RegistryError::IndexOutOfRange { index: 5, steps: 2 }
    );

    assert!(matches!(
        registry.get("missing"),
        Err(RegistryError::NotFound(_))
    ));
}

#[test]
fn registry_feeds_runner_definitions() {
    let mut registry = ChainRegistry::new();
    registry.create("flow").unwrap();
    registry
        .append_step(
            "flow",
            RequestTemplate::new(HttpMethod::GET, "https://a.test").extract_into("$.id", "id"),
        )
        .unwrap();

    let chain = registry.get("flow").unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.step_at(1).unwrap().extract.as_ref().unwrap().variable, "id");
}
