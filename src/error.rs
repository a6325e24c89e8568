//! Error types shared by every layer of the crate.

use serde_json::Value;
use thiserror::Error;

/// Result type for builder, serialization and client operations.
pub type DruidResult<T> = Result<T, DruidError>;

/// Errors raised while building, validating or submitting Druid documents.
#[derive(Error, Debug)]
pub enum DruidError {
    /// A string did not match any member of a closed enum.
    #[error("the value {value:?} is not a valid {kind}; allowed values: {}", .allowed.join(", "))]
    InvalidEnumValue {
        /// Name of the enum family (e.g. "granularity").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Every accepted wire value.
        allowed: Vec<&'static str>,
    },

    /// Malformed interval string or non-chronological bounds.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// A recognized context or tuning-config key received a value of the wrong shape.
    #[error("invalid value for {key:?}: expected {expected}, got {value}")]
    InvalidContextValue {
        /// Wire name of the key.
        key: String,
        /// Shape the key requires (e.g. "integer").
        expected: &'static str,
        /// The rejected value.
        value: Value,
    },

    /// A collection was asked to build an element it cannot hold.
    #[error("a {collection} collection cannot hold {given}")]
    InvalidCapability {
        /// Collection element kind (e.g. "aggregation").
        collection: &'static str,
        /// Description of the rejected input.
        given: String,
    },

    /// Any other argument the builders reject.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine answered with an error for the given request document.
    #[error("druid request failed: {message}")]
    QueryResponse {
        /// Error text reported by the engine.
        message: String,
        /// HTTP status code, when the request reached the server.
        status: Option<u16>,
        /// The serialized query or task that was sent.
        query: Value,
    },

    /// The HTTP transport failed before a response was received.
    #[error("transport error: {message}")]
    Transport {
        /// Transport error description.
        message: String,
        /// Whether retrying the same request may succeed.
        retriable: bool,
    },

    /// An ingestion task finished in a failed state.
    #[error("task {task_id} finished with status {status}")]
    TaskFailed {
        /// Overlord task identifier.
        task_id: String,
        /// Final status code reported by the overlord.
        status: String,
    },

    /// Waiting for a task exceeded the configured deadline.
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// Failed to encode or decode JSON.
    #[error("json error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DruidError {
    /// Create an enum validation error.
    pub fn invalid_enum(kind: &'static str, value: impl Into<String>, allowed: &[&'static str]) -> Self {
        Self::InvalidEnumValue {
            kind,
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }

    /// Create a context value error.
    pub fn invalid_context(key: impl Into<String>, expected: &'static str, value: Value) -> Self {
        Self::InvalidContextValue {
            key: key.into(),
            expected,
            value,
        }
    }

    /// Create a response error that carries the request document.
    pub fn query_response(message: impl Into<String>, status: Option<u16>, query: Value) -> Self {
        Self::QueryResponse {
            message: message.into(),
            status,
            query,
        }
    }

    /// The request document attached to this error, if any.
    pub fn query(&self) -> Option<&Value> {
        match self {
            Self::QueryResponse { query, .. } => Some(query),
            _ => None,
        }
    }

    /// Check if this error was raised while validating user input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEnumValue { .. }
                | Self::InvalidInterval(_)
                | Self::InvalidContextValue { .. }
                | Self::InvalidCapability { .. }
                | Self::InvalidArgument(_)
        )
    }

    /// Check if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Transport { retriable, .. } => *retriable,
            Self::QueryResponse {
                status: Some(status),
                ..
            } => *status >= 500,
            _ => false,
        }
    }
}
