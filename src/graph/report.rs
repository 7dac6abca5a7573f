use indexmap::IndexMap;
use std::fmt::Display;

use crate::error::{Error, Result};

/// Outcome of one task in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    SkippedDisabled,
    Completed,
    Failed(String),
    /// A dependency failed, was blocked or was cancelled.
    Blocked { dependency: String },
    Cancelled,
}

impl TaskStatus {
    /// Whether dependents may run after this status.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::SkippedDisabled)
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::SkippedDisabled => write!(f, "skipped (disabled)"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed(message) => write!(f, "failed: {message}"),
            TaskStatus::Blocked { dependency } => write!(f, "blocked by '{dependency}'"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Statuses of every task a run touched, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    statuses: IndexMap<String, TaskStatus>,
}

impl RunReport {
    pub(crate) fn record(&mut self, task: &str, status: TaskStatus) {
        self.statuses.insert(task.to_string(), status);
    }

    pub fn status(&self, task: &str) -> Option<&TaskStatus> {
        self.statuses.get(task)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskStatus)> {
        self.statuses.iter().map(|(name, status)| (name.as_str(), status))
    }

    /// Task names in the order they were visited.
    pub fn order(&self) -> Vec<&str> {
        self.statuses.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.statuses.values().all(TaskStatus::is_satisfied)
    }

    /// Names of failed, blocked and cancelled tasks.
    pub fn unsuccessful(&self) -> Vec<String> {
        self.statuses
            .iter()
            .filter(|(_, status)| !status.is_satisfied())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Converts an unsuccessful report into `PipelineFailed`.
    pub fn into_result(self, pipeline: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::PipelineFailed { pipeline: pipeline.to_string(), tasks: self.unsuccessful() })
        }
    }
}
