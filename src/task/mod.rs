//! Overlord task documents: ingestion, kill and compaction.

pub mod index;
pub mod input;

use serde::Serialize;

use crate::context::{TaskContext, TuningConfig};
use crate::types::Interval;

pub use index::{DataSchema, DimensionSchema, IndexTask, IndexTaskBuilder, TimestampSpec};
pub use input::{InputFormat, InputSource};

/// Permanently deletes unused segments of a datasource in an interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "kill", rename_all = "camelCase")]
pub struct KillTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data_source: String,
    pub interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(skip_serializing_if = "TaskContext::is_empty")]
    pub context: TaskContext,
}

impl KillTask {
    pub fn new(data_source: impl Into<String>, interval: Interval) -> Self {
        Self {
            id: None,
            data_source: data_source.into(),
            interval,
            batch_size: None,
            context: TaskContext::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "interval")]
pub struct CompactionInputSpec {
    pub interval: Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "compact", rename_all = "camelCase")]
pub struct CompactIoConfig {
    pub input_spec: CompactionInputSpec,
}

/// Rewrites the segments of an interval, typically into fewer, larger ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "compact", rename_all = "camelCase")]
pub struct CompactTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data_source: String,
    pub io_config: CompactIoConfig,
    #[serde(skip_serializing_if = "TuningConfig::is_empty")]
    pub tuning_config: TuningConfig,
    #[serde(skip_serializing_if = "TaskContext::is_empty")]
    pub context: TaskContext,
}

impl CompactTask {
    pub fn new(data_source: impl Into<String>, interval: Interval) -> Self {
        Self {
            id: None,
            data_source: data_source.into(),
            io_config: CompactIoConfig {
                input_spec: CompactionInputSpec { interval },
            },
            tuning_config: TuningConfig::new(),
            context: TaskContext::new(),
        }
    }

    pub fn with_tuning_config(mut self, tuning_config: TuningConfig) -> Self {
        self.tuning_config = tuning_config;
        self
    }

    pub fn with_context(mut self, context: TaskContext) -> Self {
        self.context = context;
        self
    }
}

/// Any task document accepted by the overlord.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Task {
    Index(IndexTask),
    Kill(KillTask),
    Compact(CompactTask),
}

impl Task {
    pub fn task_type(&self) -> &str {
        match self {
            Task::Index(task) => &task.kind,
            Task::Kill(_) => "kill",
            Task::Compact(_) => "compact",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Task::Index(task) => task.id.as_deref(),
            Task::Kill(task) => task.id.as_deref(),
            Task::Compact(task) => task.id.as_deref(),
        }
    }
}

impl From<IndexTask> for Task {
    fn from(task: IndexTask) -> Self {
        Task::Index(task)
    }
}

impl From<KillTask> for Task {
    fn from(task: KillTask) -> Self {
        Task::Kill(task)
    }
}

impl From<CompactTask> for Task {
    fn from(task: CompactTask) -> Self {
        Task::Compact(task)
    }
}
