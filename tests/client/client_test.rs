//! Client dispatch against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use druid_query::client::{DruidClient, HttpRequest, HttpResponse, Method, TaskState, Transport};
use druid_query::config::Settings;
use druid_query::spec::{LookupDefinition, LookupExtractorFactory};
use druid_query::task::KillTask;
use druid_query::types::{Granularity, Interval};
use druid_query::{DruidError, DruidResult};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<DruidResult<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, retriable: bool) -> Self {
        self.responses.lock().unwrap().push_back(Err(DruidError::Transport {
            message: "connection refused".to_string(),
            retriable,
        }));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> DruidResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for {}", request.url))
    }
}

fn client(transport: &ScriptedTransport) -> DruidClient {
    let settings = Settings {
        retry_delay_ms: 0,
        polling_sleep_secs: 0,
        ..Settings::default()
    };
    DruidClient::with_transport(settings, transport.clone())
}

fn timeseries(client: &DruidClient) -> druid_query::query::Query {
    client
        .query_builder("wikipedia", Granularity::Hour)
        .interval_str("2015-09-12/2015-09-13")
        .unwrap()
        .count("edits")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_execute_query_posts_to_broker() {
    let transport = ScriptedTransport::default().respond(
        200,
        r#"[{"timestamp": "2015-09-12T00:00:00.000Z", "result": {"edits": 12}}]"#,
    );
    let client = client(&transport);
    let query = timeseries(&client);
    let document = serde_json::to_value(&query).unwrap();

    let response = client.execute_query(query).await.unwrap();
    assert_eq!(response.query_type(), "timeseries");
    assert_eq!(
        Value::Object(response.rows()[0].clone()),
        json!({"timestamp": "2015-09-12T00:00:00.000Z", "edits": 12})
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, "http://localhost:8082/druid/v2");
    assert_eq!(requests[0].body, Some(document));
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let transport = ScriptedTransport::default()
        .respond(503, "")
        .respond(200, "[]");
    let client = client(&transport);

    let response = client.execute_query(timeseries(&client)).await.unwrap();
    assert!(response.rows().is_empty());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let transport = ScriptedTransport::default().respond(
        400,
        r#"{"error": "Unknown exception", "errorMessage": "Unknown aggregator type [sumLong]"}"#,
    );
    let client = client(&transport);
    let query = timeseries(&client);
    let document = serde_json::to_value(&query).unwrap();

    let err = client.execute_query(query).await.unwrap_err();
    match &err {
        DruidError::QueryResponse { message, status, .. } => {
            assert_eq!(message, "Unknown aggregator type [sumLong]");
            assert_eq!(*status, Some(400));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.query(), Some(&document));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let transport = ScriptedTransport::default()
        .respond(500, "broker unavailable")
        .respond(500, "broker unavailable")
        .respond(500, "broker unavailable");
    let client = client(&transport);

    let err = client.execute_raw_query(json!({"queryType": "timeseries"})).await.unwrap_err();
    assert_eq!(err.to_string(), "druid request failed: broker unavailable");
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_non_json_success_body_carries_request() {
    let transport = ScriptedTransport::default().respond(200, "<html>proxy</html>");
    let client = client(&transport);

    let document = json!({"queryType": "timeseries"});
    let err = client.execute_raw_query(document.clone()).await.unwrap_err();
    match &err {
        DruidError::QueryResponse { message, status, .. } => {
            assert!(message.starts_with("invalid JSON in response body"));
            assert_eq!(*status, Some(200));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.query(), Some(&document));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_transport_failures() {
    let transport = ScriptedTransport::default().fail(true).respond(200, "[]");
    let client = client(&transport);
    assert!(client.execute_raw_query(json!({})).await.is_ok());
    assert_eq!(transport.requests().len(), 2);

    let transport = ScriptedTransport::default().fail(false);
    let client = self::client(&transport);
    let err = client.execute_raw_query(json!({})).await.unwrap_err();
    assert!(matches!(err, DruidError::Transport { retriable: false, .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_cancel_query() {
    let transport = ScriptedTransport::default().respond(202, "");
    client(&transport).cancel_query("q-17").await.unwrap();
    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(requests[0].url, "http://localhost:8082/druid/v2/q-17");
}

#[tokio::test]
async fn test_submit_task_returns_id() {
    let transport = ScriptedTransport::default().respond(200, r#"{"task": "kill_wikipedia_1"}"#);
    let kill = KillTask::new("wikipedia", Interval::parse("2015-09-12/2015-09-13").unwrap());

    let task_id = client(&transport).submit_task(kill).await.unwrap();
    assert_eq!(task_id, "kill_wikipedia_1");

    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://localhost:8090/druid/indexer/v1/task");
    assert_eq!(requests[0].body.as_ref().unwrap()["type"], "kill");
}

#[tokio::test]
async fn test_submit_task_without_id_in_response() {
    let transport = ScriptedTransport::default().respond(200, "{}");
    let kill = KillTask::new("wikipedia", Interval::parse("2015-09-12/2015-09-13").unwrap());
    let err = client(&transport).submit_task(kill).await.unwrap_err();
    assert!(matches!(err, DruidError::QueryResponse { status: None, .. }));
}

#[tokio::test]
async fn test_task_status() {
    let transport = ScriptedTransport::default().respond(
        200,
        r#"{"task": "t1", "status": {"id": "t1", "status": "RUNNING", "type": "index_parallel", "duration": -1}}"#,
    );
    let status = client(&transport).task_status("t1").await.unwrap();
    assert_eq!(status.status, TaskState::Running);
    assert_eq!(status.task_type.as_deref(), Some("index_parallel"));
    assert!(!status.status.is_complete());
    assert_eq!(
        transport.requests()[0].url,
        "http://localhost:8090/druid/indexer/v1/task/t1/status"
    );
}

#[tokio::test]
async fn test_poll_task_until_success() {
    let transport = ScriptedTransport::default()
        .respond(200, r#"{"status": {"id": "t1", "status": "RUNNING"}}"#)
        .respond(200, r#"{"status": {"id": "t1", "status": "SUCCESS", "duration": 5400}}"#);
    let status = client(&transport).poll_task("t1", None).await.unwrap();
    assert_eq!(status.status, TaskState::Success);
    assert_eq!(status.duration, Some(5400));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_poll_task_failure() {
    let transport = ScriptedTransport::default().respond(
        200,
        r#"{"status": {"id": "t1", "status": "FAILED", "errorMsg": "No valid rows"}}"#,
    );
    let err = client(&transport)
        .poll_task("t1", Some(Duration::from_secs(60)))
        .await
        .unwrap_err();
    match err {
        DruidError::TaskFailed { task_id, status } => {
            assert_eq!(task_id, "t1");
            assert_eq!(status, "No valid rows");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_task_timeout() {
    let transport = ScriptedTransport::default().respond(200, r#"{"status": {"id": "t1", "status": "PENDING"}}"#);
    let err = client(&transport)
        .poll_task("t1", Some(Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, DruidError::Timeout(0)));
}

#[tokio::test]
async fn test_coordinator_endpoints() {
    let transport = ScriptedTransport::default()
        .respond(200, r#"["wikipedia", "koalas"]"#)
        .respond(202, "");
    let client = client(&transport);

    assert_eq!(client.data_sources().await.unwrap(), vec!["wikipedia", "koalas"]);

    let definition = LookupDefinition::new("v1", LookupExtractorFactory::map([("NZ", "New Zealand")]));
    client.create_lookup("__default", "countries", &definition).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url, "http://localhost:8081/druid/coordinator/v1/datasources");
    assert_eq!(
        requests[1].url,
        "http://localhost:8081/druid/coordinator/v1/lookups/config/__default/countries"
    );
    assert_eq!(
        requests[1].body.as_ref().unwrap()["lookupExtractorFactory"]["type"],
        "map"
    );
}
