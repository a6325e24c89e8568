//! Typed views over broker and overlord responses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DruidResult;

/// Result of a query, flattened into rows according to its query type.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    query_type: String,
    raw: Value,
}

impl QueryResponse {
    pub fn new(query_type: impl Into<String>, raw: Value) -> Self {
        Self {
            query_type: query_type.into(),
            raw,
        }
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// The response body exactly as the broker returned it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// One flat map per result row.
    ///
    /// Time-bucketed results carry the bucket start as `timestamp`.
    pub fn rows(&self) -> Vec<Map<String, Value>> {
        let Some(entries) = self.raw.as_array() else {
            return match &self.raw {
                Value::Object(map) => vec![map.clone()],
                _ => Vec::new(),
            };
        };

        let mut rows = Vec::new();
        for entry in entries {
            let timestamp = entry.get("timestamp");
            match self.query_type.as_str() {
                "timeseries" => {
                    if let Some(result) = entry.get("result").and_then(Value::as_object) {
                        rows.push(with_timestamp(timestamp, result));
                    }
                }
                "topN" | "search" => {
                    if let Some(result) = entry.get("result").and_then(Value::as_array) {
                        rows.extend(
                            result
                                .iter()
                                .filter_map(Value::as_object)
                                .map(|row| with_timestamp(timestamp, row)),
                        );
                    }
                }
                "groupBy" => {
                    if let Some(event) = entry.get("event").and_then(Value::as_object) {
                        rows.push(with_timestamp(timestamp, event));
                    } else if let Some(row) = entry.as_object() {
                        rows.push(row.clone());
                    }
                }
                "scan" => rows.extend(scan_rows(entry)),
                _ => {
                    if let Some(row) = entry.as_object() {
                        rows.push(row.clone());
                    }
                }
            }
        }
        rows
    }

    /// Deserialize every row into `T`.
    pub fn rows_as<T: DeserializeOwned>(&self) -> DruidResult<Vec<T>> {
        self.rows()
            .into_iter()
            .map(|row| Ok(serde_json::from_value(Value::Object(row))?))
            .collect()
    }
}

fn with_timestamp(timestamp: Option<&Value>, fields: &Map<String, Value>) -> Map<String, Value> {
    let mut row = Map::new();
    if let Some(timestamp) = timestamp {
        row.insert("timestamp".to_string(), timestamp.clone());
    }
    for (key, value) in fields {
        row.insert(key.clone(), value.clone());
    }
    row
}

/// Scan batches hold `events` either as objects (`list`) or as arrays
/// aligned with `columns` (`compactedList`).
fn scan_rows(batch: &Value) -> Vec<Map<String, Value>> {
    let columns: Vec<&str> = batch
        .get("columns")
        .and_then(Value::as_array)
        .map(|cols| cols.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let Some(events) = batch.get("events").and_then(Value::as_array) else {
        return Vec::new();
    };
    events
        .iter()
        .filter_map(|event| match event {
            Value::Object(row) => Some(row.clone()),
            Value::Array(values) => Some(
                columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| (column.to_string(), value.clone()))
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

/// Lifecycle state of an overlord task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Waiting,
    Running,
    Success,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether the task has stopped, successfully or not.
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failed)
    }
}

/// The `status` object of the overlord's task status endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub id: String,
    #[serde(default)]
    pub status: TaskState,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub created_time: Option<String>,
    pub duration: Option<i64>,
    pub error_msg: Option<String>,
}
