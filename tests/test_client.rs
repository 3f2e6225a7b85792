//! Integration tests for `OptimizerClient`
//!
//! Drives the session controller over scripted in-memory transports

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prompt_optimizer::types::model_status::{KeyStatus, ModelInfo, ModelRoster};
use prompt_optimizer::{
    AgentId, ByteStream, CANCELLED_MESSAGE, ClientOptions, ModelStatusDisplay, ModelStatusReport,
    OptimizeRequest, OptimizerClient, OptimizerError, Result, SessionStatus, SessionUpdate,
    Transport, UpdateFeed,
};
use tokio::sync::Notify;

/// One step of a scripted response body
enum Step {
    Chunk(Vec<u8>),
    Fail(String),
    Wait(Arc<Notify>),
}

/// Scripted response for one submission
enum Script {
    Body(Vec<Step>),
    Refuse { status: u16, body: String },
}

#[derive(Default)]
struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    requests: Arc<Mutex<Vec<OptimizeRequest>>>,
    status: Option<ModelStatusReport>,
}

impl ScriptedTransport {
    fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Default::default()
        }
    }

    fn requests(&self) -> Arc<Mutex<Vec<OptimizeRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl Transport for ScriptedTransport {
    async fn open_stream(&self, request: &OptimizeRequest) -> Result<ByteStream> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Body(Vec::new()));

        let steps = match script {
            Script::Refuse { status, body } => {
                return Err(OptimizerError::http_status(status, body));
            }
            Script::Body(steps) => steps,
        };

        let stream = async_stream::stream! {
            for step in steps {
                match step {
                    Step::Chunk(bytes) => yield Ok(bytes),
                    Step::Fail(message) => yield Err(OptimizerError::transport(message)),
                    Step::Wait(gate) => gate.notified().await,
                }
            }
        };
        Ok(Box::pin(stream))
    }

    async fn fetch_status(&self) -> Result<ModelStatusReport> {
        self.status
            .clone()
            .ok_or_else(|| OptimizerError::http_status(503, "unavailable"))
    }
}

fn chunks(body: &str, size: usize) -> Vec<Step> {
    body.as_bytes()
        .chunks(size)
        .map(|chunk| Step::Chunk(chunk.to_vec()))
        .collect()
}

fn client(transport: ScriptedTransport) -> OptimizerClient<ScriptedTransport> {
    client_with(transport, &ClientOptions::default())
}

fn client_with(
    transport: ScriptedTransport,
    options: &ClientOptions,
) -> OptimizerClient<ScriptedTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    OptimizerClient::with_transport(transport, options)
}

fn drain(rx: &mut UpdateFeed) -> Vec<SessionUpdate> {
    rx.drain()
}

const HAIKU_BODY: &str = concat!(
    r#"{"type":"log","agent":"Manager","message":"planning"}"#,
    "\n",
    r#"{"type":"log","agent":"Agent A","message":"draft 1"}"#,
    "\n",
    r#"{"type":"result","content":"Haiku: ..."}"#,
    "\n",
);

#[tokio::test]
async fn test_haiku_end_to_end() {
    let transport = ScriptedTransport::new(vec![Script::Body(chunks(HAIKU_BODY, 7))]);
    let requests = transport.requests();
    let client = client(transport);

    let status = client.submit("write a haiku").await;

    assert_eq!(status, Some(SessionStatus::Complete));
    let session = client.snapshot();
    assert_eq!(session.logs().get(AgentId::Manager), ["planning".to_string()]);
    assert_eq!(session.logs().get(AgentId::AgentA), ["draft 1".to_string()]);
    assert!(session.logs().get(AgentId::AgentB).is_empty());
    assert_eq!(session.result(), "Haiku: ...");
    assert_eq!(session.dropped_lines(), 0);

    let requests = requests.lock().unwrap();
    assert_eq!(
        requests.as_slice(),
        [OptimizeRequest {
            prompt: "write a haiku".to_string(),
            starting_prompt: None,
        }]
    );
}

#[tokio::test]
async fn test_error_event_end_to_end() {
    let body = "{\"type\":\"error\",\"message\":\"rate limited\"}\n";
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(body, 64))]));

    let status = client.submit("write a haiku").await;

    assert_eq!(status, Some(SessionStatus::Failed("rate limited".to_string())));
    let session = client.snapshot();
    assert_eq!(
        session.logs().get(AgentId::Manager),
        ["ERROR: rate limited".to_string()]
    );
    assert!(!session.is_in_flight());
}

#[tokio::test]
async fn test_updates_are_published_in_order() {
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(HAIKU_BODY, 3))]));
    let mut rx = client.subscribe();

    client.submit("write a haiku").await;

    let updates = drain(&mut rx);
    assert_eq!(updates.len(), 5);
    assert!(matches!(updates[0], SessionUpdate::Started { ref request, .. } if request.prompt == "write a haiku"));
    assert_eq!(
        updates[1..],
        [
            SessionUpdate::Log {
                agent: AgentId::Manager,
                message: "planning".to_string(),
            },
            SessionUpdate::Log {
                agent: AgentId::AgentA,
                message: "draft 1".to_string(),
            },
            SessionUpdate::Result {
                content: "Haiku: ...".to_string(),
            },
            SessionUpdate::Completed,
        ]
    );
}

#[tokio::test]
async fn test_blank_prompt_issues_no_request() {
    let transport = ScriptedTransport::new(vec![]);
    let requests = transport.requests();
    let client = client(transport);

    assert_eq!(client.submit("").await, None);
    assert_eq!(client.submit("   ").await, None);

    assert_eq!(client.status(), SessionStatus::Ready);
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_line_does_not_disturb_neighbours() {
    let body = concat!(
        r#"{"type":"log","agent":"Manager","message":"one"}"#,
        "\n",
        "{this is not json\n",
        r#"{"type":"log","agent":"Manager","message":"two"}"#,
        "\n",
    );
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(body, 5))]));

    assert_eq!(client.submit("p").await, Some(SessionStatus::Complete));
    let session = client.snapshot();
    assert_eq!(
        session.logs().get(AgentId::Manager),
        ["one".to_string(), "two".to_string()]
    );
    assert_eq!(session.dropped_lines(), 1);
}

#[tokio::test]
async fn test_blank_lines_and_unknown_agents_are_skipped() {
    let body = concat!(
        "\n",
        "   \n",
        r#"{"type":"log","agent":"Agent C","message":"who?"}"#,
        "\n",
        r#"{"type":"log","agent":"Agent B","message":"review"}"#,
        "\n",
    );
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(body, 64))]));

    assert_eq!(client.submit("p").await, Some(SessionStatus::Complete));
    let session = client.snapshot();
    assert_eq!(session.logs().total_len(), 1);
    assert_eq!(session.logs().get(AgentId::AgentB), ["review".to_string()]);
    assert_eq!(session.dropped_lines(), 0);
}

#[tokio::test]
async fn test_trailing_fragment_is_parsed_when_complete() {
    let body = r#"{"type":"result","content":"no newline"}"#;
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(body, 10))]));

    assert_eq!(client.submit("p").await, Some(SessionStatus::Complete));
    assert_eq!(client.snapshot().result(), "no newline");
}

#[tokio::test]
async fn test_trailing_fragment_is_dropped_when_truncated() {
    let body = concat!(
        r#"{"type":"result","content":"kept"}"#,
        "\n",
        r#"{"type":"result","content":"trunc"#,
    );
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(body, 10))]));

    assert_eq!(client.submit("p").await, Some(SessionStatus::Complete));
    let session = client.snapshot();
    assert_eq!(session.result(), "kept");
    assert_eq!(session.dropped_lines(), 1);
}

#[tokio::test]
async fn test_refused_request_fails_session() {
    let client = client(ScriptedTransport::new(vec![Script::Refuse {
        status: 500,
        body: "boom".to_string(),
    }]));

    let status = client.submit("p").await;

    assert_eq!(
        status,
        Some(SessionStatus::Failed("HTTP status 500: boom".to_string()))
    );
    let session = client.snapshot();
    assert!(session.logs().is_empty());
    assert!(!session.is_in_flight());
}

#[tokio::test]
async fn test_stream_failure_stops_consumption() {
    let mut steps = chunks(
        "{\"type\":\"log\",\"agent\":\"Manager\",\"message\":\"before\"}\n",
        64,
    );
    steps.push(Step::Fail("connection reset".to_string()));
    steps.extend(chunks(
        "{\"type\":\"log\",\"agent\":\"Manager\",\"message\":\"after\"}\n",
        64,
    ));
    let client = client(ScriptedTransport::new(vec![Script::Body(steps)]));

    let status = client.submit("p").await;

    assert_eq!(
        status,
        Some(SessionStatus::Failed(
            "Transport error: connection reset".to_string()
        ))
    );
    assert_eq!(
        client.snapshot().logs().get(AgentId::Manager),
        ["before".to_string()]
    );
}

#[tokio::test]
async fn test_refine_again_sends_previous_result() {
    let second = concat!(
        r#"{"type":"log","agent":"Agent B","message":"second round"}"#,
        "\n",
        r#"{"type":"result","content":"Haiku v2"}"#,
        "\n",
    );
    let transport = ScriptedTransport::new(vec![
        Script::Body(chunks(HAIKU_BODY, 16)),
        Script::Body(chunks(second, 16)),
    ]);
    let requests = transport.requests();
    let client = client(transport);

    client.submit("write a haiku").await;
    assert!(client.set_input("about autumn"));
    assert_eq!(client.refine().await, Some(SessionStatus::Complete));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].prompt, "about autumn");
    assert_eq!(requests[1].starting_prompt.as_deref(), Some("Haiku: ..."));

    let session = client.snapshot();
    assert!(session.logs().get(AgentId::Manager).is_empty());
    assert!(session.logs().get(AgentId::AgentA).is_empty());
    assert_eq!(session.logs().get(AgentId::AgentB), ["second round".to_string()]);
    assert_eq!(session.result(), "Haiku v2");
}

#[tokio::test]
async fn test_second_submit_while_streaming_is_rejected() {
    let gate = Arc::new(Notify::new());
    let mut steps = chunks(
        "{\"type\":\"log\",\"agent\":\"Manager\",\"message\":\"working\"}\n",
        64,
    );
    steps.push(Step::Wait(Arc::clone(&gate)));
    steps.extend(chunks("{\"type\":\"result\",\"content\":\"done\"}\n", 64));

    let transport = ScriptedTransport::new(vec![Script::Body(steps)]);
    let requests = transport.requests();
    let client = client(transport);
    let mut rx = client.subscribe();

    let running = client.clone();
    let handle = tokio::spawn(async move { running.submit("first").await });

    // Wait until the first stream is mid-flight
    loop {
        if let SessionUpdate::Log { .. } = rx.next().await.unwrap() {
            break;
        }
    }

    assert_eq!(client.status(), SessionStatus::Optimizing);
    assert_eq!(client.submit("second").await, None);
    assert!(!client.reset());
    assert!(!client.set_input("edited"));
    assert_eq!(requests.lock().unwrap().len(), 1);

    gate.notify_one();
    assert_eq!(handle.await.unwrap(), Some(SessionStatus::Complete));
    assert_eq!(client.snapshot().result(), "done");
    assert_eq!(client.snapshot().input(), "first");
}

#[tokio::test]
async fn test_reset_after_complete() {
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(HAIKU_BODY, 64))]));
    client.submit("write a haiku").await;
    let mut rx = client.subscribe();

    assert!(client.reset());

    let session = client.snapshot();
    assert_eq!(session.status(), &SessionStatus::Ready);
    assert!(session.input().is_empty());
    assert!(session.result().is_empty());
    assert!(session.logs().is_empty());
    assert_eq!(drain(&mut rx), vec![SessionUpdate::Reset]);
}

fn status_report() -> ModelStatusReport {
    ModelStatusReport {
        keys: KeyStatus {
            openai: "active".to_string(),
            gemini: "error".to_string(),
            openai_error: None,
            gemini_error: Some("invalid key".to_string()),
        },
        models: ModelRoster {
            manager: ModelInfo {
                name: "gpt-4o".to_string(),
                status: "active".to_string(),
                provider: Some("openai".to_string()),
            },
            agent_a: ModelInfo {
                name: "gpt-5.2".to_string(),
                status: "active".to_string(),
                provider: Some("openai".to_string()),
            },
            agent_b: ModelInfo {
                name: "gemini-3-pro-preview".to_string(),
                status: "error".to_string(),
                provider: Some("gemini".to_string()),
            },
        },
    }
}

#[tokio::test]
async fn test_model_status_loaded() {
    let transport = ScriptedTransport {
        status: Some(status_report()),
        ..Default::default()
    };
    let client = client(transport);
    assert_eq!(client.model_status(), ModelStatusDisplay::Checking);

    let display = client.load_model_status().await;

    assert_eq!(display, ModelStatusDisplay::Loaded(status_report()));
    assert_eq!(client.model_status(), display);
}

#[tokio::test]
async fn test_model_status_failure_stays_checking() {
    let client = client(ScriptedTransport::default());
    assert_eq!(client.load_model_status().await, ModelStatusDisplay::Checking);
}

#[test]
fn test_status_report_decodes_server_payload() {
    let payload = serde_json::json!({
        "keys": {
            "openai": "active",
            "gemini": "missing",
            "openai_error": null,
            "gemini_error": null
        },
        "models": {
            "manager": {"name": "gpt-4o", "status": "active", "provider": "openai"},
            "agent_a": {"name": "gpt-5.2", "status": "active", "provider": "openai"},
            "agent_b": {"name": "gemini-3-pro-preview", "status": "missing"}
        }
    });

    let report: ModelStatusReport = serde_json::from_value(payload).unwrap();
    assert!(!report.has_key_errors());
    assert_eq!(report.models.agent_b.provider, None);
    assert_eq!(
        report.models.agent_b.health(),
        prompt_optimizer::ModelHealth::Unknown
    );
}

#[tokio::test]
async fn test_oversized_line_is_dropped_and_stream_continues() {
    let long = format!(
        "{{\"type\":\"log\",\"agent\":\"Agent B\",\"message\":\"{}\"}}\n",
        "x".repeat(500)
    );
    let body = format!(
        "{}\n{long}{}\n",
        r#"{"type":"log","agent":"Manager","message":"before"}"#,
        r#"{"type":"result","content":"after"}"#,
    );
    let options = ClientOptions::builder().max_line_bytes(80).build();
    let client = client_with(
        ScriptedTransport::new(vec![Script::Body(chunks(&body, 32))]),
        &options,
    );

    let status = client.submit("p").await;

    assert_eq!(status, Some(SessionStatus::Complete));
    let session = client.snapshot();
    assert_eq!(session.dropped_lines(), 1);
    assert_eq!(session.logs().get(AgentId::Manager), ["before".to_string()]);
    assert!(session.logs().get(AgentId::AgentB).is_empty());
    assert_eq!(session.result(), "after");
}

#[tokio::test]
async fn test_slow_subscriber_keeps_receiving_after_burst() {
    let burst: String = (0..400)
        .map(|i| format!("{{\"type\":\"log\",\"agent\":\"Agent A\",\"message\":\"line {i}\"}}\n"))
        .collect();
    let options = ClientOptions::builder().update_capacity(8).build();
    let client = client_with(
        ScriptedTransport::new(vec![
            Script::Body(vec![Step::Chunk(burst.into_bytes())]),
            Script::Body(chunks(HAIKU_BODY, 64)),
        ]),
        &options,
    );
    let mut rx = client.subscribe();

    assert_eq!(client.submit("burst").await, Some(SessionStatus::Complete));
    let first = drain(&mut rx);
    assert!(rx.missed() > 0);
    assert!(!first.is_empty());
    assert_eq!(first.last(), Some(&SessionUpdate::Completed));

    assert_eq!(client.submit("write a haiku").await, Some(SessionStatus::Complete));
    let second = drain(&mut rx);
    assert!(matches!(second.first(), Some(SessionUpdate::Started { .. })));
    assert!(second.contains(&SessionUpdate::Log {
        agent: AgentId::Manager,
        message: "planning".to_string(),
    }));
    assert_eq!(second.last(), Some(&SessionUpdate::Completed));
}

#[tokio::test]
async fn test_dropped_submit_releases_session() {
    let gate = Arc::new(Notify::new());
    let mut steps = chunks(
        "{\"type\":\"log\",\"agent\":\"Manager\",\"message\":\"working\"}\n",
        64,
    );
    steps.push(Step::Wait(Arc::clone(&gate)));
    let client = client(ScriptedTransport::new(vec![
        Script::Body(steps),
        Script::Body(chunks(HAIKU_BODY, 64)),
    ]));
    let mut rx = client.subscribe();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), client.submit("first")).await;
    assert!(timed_out.is_err());

    let session = client.snapshot();
    assert!(!session.is_in_flight());
    assert_eq!(
        session.status(),
        &SessionStatus::Failed(CANCELLED_MESSAGE.to_string())
    );
    assert_eq!(session.logs().get(AgentId::Manager), ["working".to_string()]);
    assert_eq!(
        drain(&mut rx).last(),
        Some(&SessionUpdate::Failed {
            message: CANCELLED_MESSAGE.to_string(),
        })
    );

    assert!(client.reset());
    assert_eq!(
        client.submit("write a haiku").await,
        Some(SessionStatus::Complete)
    );
}

#[tokio::test]
async fn test_completed_submit_is_not_cancelled() {
    let client = client(ScriptedTransport::new(vec![Script::Body(chunks(HAIKU_BODY, 64))]));
    let mut rx = client.subscribe();

    client.submit("write a haiku").await;

    assert_eq!(client.status(), SessionStatus::Complete);
    assert!(
        !drain(&mut rx)
            .iter()
            .any(|update| matches!(update, SessionUpdate::Failed { .. }))
    );
}
