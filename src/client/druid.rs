//! Client for the broker, coordinator and overlord HTTP APIs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::response::{QueryResponse, TaskState, TaskStatus};
use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::config::Settings;
use crate::error::{DruidError, DruidResult};
use crate::query::{Query, QueryBuilder};
use crate::spec::{DataSource, LookupDefinition, ToJson};
use crate::task::Task;
use crate::types::Granularity;

/// Async client for a Druid cluster.
///
/// Requests failing with a connection error or a 5xx status are retried
/// `retries` times, `retry_delay_ms` apart. Any other failure is returned
/// immediately as `DruidError::QueryResponse`, carrying the request document.
///
/// # Example
///
/// ```ignore
/// use druid_query::prelude::*;
///
/// let client = DruidClient::new(Settings::load()?)?;
/// let query = client
///     .query_builder("wikipedia", Granularity::Hour)
///     .interval_str("2015-09-12/2015-09-13")?
///     .long_sum("added", "added")
///     .build()?;
/// let response = client.execute_query(query).await?;
/// ```
#[derive(Clone)]
pub struct DruidClient {
    settings: Settings,
    transport: Arc<dyn Transport>,
}

impl DruidClient {
    /// Create a client using the `reqwest` transport.
    pub fn new(settings: Settings) -> DruidResult<Self> {
        let transport = ReqwestTransport::new(&settings)?;
        Ok(Self::with_transport(settings, transport))
    }

    pub fn with_transport(settings: Settings, transport: impl Transport + 'static) -> Self {
        Self {
            settings,
            transport: Arc::new(transport),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start building a query against `data_source`.
    pub fn query_builder(&self, data_source: impl Into<DataSource>, granularity: Granularity) -> QueryBuilder {
        QueryBuilder::new(data_source, granularity)
    }

    // -------------------------------------------------------------------------
    // Broker
    // -------------------------------------------------------------------------

    pub async fn execute_query(&self, query: impl Into<Query>) -> DruidResult<QueryResponse> {
        let query = query.into();
        let body = self.execute_raw_query(query.to_json()?).await?;
        Ok(QueryResponse::new(query.query_type(), body))
    }

    /// Post an already serialized query document.
    pub async fn execute_raw_query(&self, query: Value) -> DruidResult<Value> {
        let url = format!("{}/druid/v2", trim_slash(&self.settings.broker_url));
        self.send(HttpRequest::post(url, query)).await
    }

    /// Cancel a running query by the `queryId` set in its context.
    pub async fn cancel_query(&self, query_id: &str) -> DruidResult<()> {
        let url = format!("{}/druid/v2/{}", trim_slash(&self.settings.broker_url), query_id);
        self.send(HttpRequest::delete(url)).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Overlord
    // -------------------------------------------------------------------------

    /// Submit a task and return its id.
    pub async fn submit_task(&self, task: impl Into<Task>) -> DruidResult<String> {
        let task = task.into();
        let document = task.to_json()?;
        let url = format!("{}/druid/indexer/v1/task", trim_slash(&self.settings.overlord_url));
        let body = self.send(HttpRequest::post(url, document.clone())).await?;
        let task_id = body
            .get("task")
            .and_then(Value::as_str)
            .ok_or_else(|| DruidError::query_response("overlord response has no task id", None, document))?;
        info!(task_id, task_type = task.task_type(), "submitted task");
        Ok(task_id.to_string())
    }

    pub async fn task_status(&self, task_id: &str) -> DruidResult<TaskStatus> {
        let url = format!(
            "{}/druid/indexer/v1/task/{}/status",
            trim_slash(&self.settings.overlord_url),
            task_id
        );
        let mut body = self.send(HttpRequest::get(url)).await?;
        match body.get_mut("status").map(Value::take) {
            Some(status @ Value::Object(_)) => Ok(serde_json::from_value(status)?),
            _ => Err(DruidError::query_response(
                format!("no status reported for task {}", task_id),
                None,
                body,
            )),
        }
    }

    /// Wait until a task leaves the running states.
    ///
    /// Checks every `polling_sleep_secs`. A failed task is returned as
    /// `DruidError::TaskFailed`; exceeding `max_wait` as `DruidError::Timeout`.
    pub async fn poll_task(&self, task_id: &str, max_wait: Option<Duration>) -> DruidResult<TaskStatus> {
        let started = Instant::now();
        loop {
            let status = self.task_status(task_id).await?;
            match status.status {
                TaskState::Success => {
                    info!(task_id, "task succeeded");
                    return Ok(status);
                }
                TaskState::Failed => {
                    return Err(DruidError::TaskFailed {
                        task_id: task_id.to_string(),
                        status: status.error_msg.unwrap_or_else(|| "FAILED".to_string()),
                    })
                }
                state => debug!(task_id, ?state, "task still running"),
            }

            if let Some(max_wait) = max_wait {
                if started.elapsed() >= max_wait {
                    return Err(DruidError::Timeout(max_wait.as_secs()));
                }
            }
            tokio::time::sleep(self.settings.polling_sleep()).await;
        }
    }

    // -------------------------------------------------------------------------
    // Coordinator
    // -------------------------------------------------------------------------

    pub async fn data_sources(&self) -> DruidResult<Vec<String>> {
        let url = format!(
            "{}/druid/coordinator/v1/datasources",
            trim_slash(&self.settings.coordinator_url)
        );
        let body = self.send(HttpRequest::get(url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Create or replace a lookup in the given tier.
    pub async fn create_lookup(&self, tier: &str, name: &str, definition: &LookupDefinition) -> DruidResult<()> {
        let url = format!(
            "{}/druid/coordinator/v1/lookups/config/{}/{}",
            trim_slash(&self.settings.coordinator_url),
            tier,
            name
        );
        self.send(HttpRequest::post(url, definition.to_json()?)).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    async fn send(&self, request: HttpRequest) -> DruidResult<Value> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(method = request.method.as_str(), url = %request.url, attempt, "sending request");

            let error = match self.transport.send(&request).await {
                Ok(response) if response.is_success() => return parse_body(&response, &request),
                Ok(response) => error_from_response(&response, &request),
                Err(error) => error,
            };

            if error.is_retriable() && attempt <= self.settings.retries {
                warn!(url = %request.url, attempt, %error, "request failed, retrying");
                tokio::time::sleep(self.settings.retry_delay()).await;
                continue;
            }
            return Err(error);
        }
    }
}

fn trim_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Read a 2xx body as JSON; a body that is not JSON fails with the request attached.
fn parse_body(response: &HttpResponse, request: &HttpRequest) -> DruidResult<Value> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| {
        DruidError::query_response(
            format!("invalid JSON in response body: {}", e),
            Some(response.status),
            request.body.clone().unwrap_or(Value::Null),
        )
    })
}

/// Build a `QueryResponse` error from a non-2xx answer, preferring the
/// engine's `errorMessage`, then `error`, then the raw body.
fn error_from_response(response: &HttpResponse, request: &HttpRequest) -> DruidError {
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
    let message = parsed
        .as_ref()
        .and_then(|body| {
            body.get("errorMessage")
                .and_then(Value::as_str)
                .or_else(|| body.get("error").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = response.body.trim();
            if text.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                text.to_string()
            }
        });
    DruidError::query_response(
        message,
        Some(response.status),
        request.body.clone().unwrap_or(Value::Null),
    )
}
