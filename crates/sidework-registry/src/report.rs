//! Report value types.
//!
//! Reports are immutable values with no shared mutable state, safe to hand
//! across execution-context boundaries. A task produces zero or more
//! progress reports followed by exactly one completion report.

use crate::error::{TaskError, WorkerError};
use crate::registry::TaskId;
use crate::state_machine::TaskStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One interim progress update for a running task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport<P> {
    pub task_id: TaskId,
    /// Percentage complete, monotonically non-decreasing in `[0, 100]`
    /// within one task's stream.
    pub percent_complete: u8,
    /// Payload-specific detail value (for the prime payload: the latest
    /// prime found).
    pub detail: P,
    /// The caller's opaque token, echoed back verbatim.
    pub user_token: Option<Value>,
}

/// Terminal outcome of a task — the three arms are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskOutcome<R> {
    /// The worker finished naturally with a result.
    Completed(R),
    /// A failure inside the worker, contained and carried here rather than
    /// propagated to the caller's context.
    Failed(WorkerError),
    /// Cancellation won the race; no result guarantees.
    Cancelled,
}

impl<R> TaskOutcome<R> {
    /// The terminal status this outcome maps to.
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Completed(_) => TaskStatus::Completed,
            TaskOutcome::Failed(_) => TaskStatus::Failed,
            TaskOutcome::Cancelled => TaskStatus::Cancelled,
        }
    }
}

/// The single terminal notification for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport<R> {
    pub task_id: TaskId,
    /// The caller's opaque token, echoed back verbatim.
    pub user_token: Option<Value>,
    pub outcome: TaskOutcome<R>,
}

impl<R> CompletionReport<R> {
    pub fn new(task_id: TaskId, user_token: Option<Value>, outcome: TaskOutcome<R>) -> Self {
        Self {
            task_id,
            user_token,
            outcome,
        }
    }

    /// The terminal status of this task.
    pub fn status(&self) -> TaskStatus {
        self.outcome.status()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Cancelled)
    }

    /// The contained worker failure, if the task failed.
    pub fn error(&self) -> Option<&WorkerError> {
        match &self.outcome {
            TaskOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The success value.
    ///
    /// Fails with [`TaskError::ResultUnavailable`] when the outcome was a
    /// failure or cancellation — callers must check the outcome before
    /// reading result fields.
    pub fn result(&self) -> Result<&R, TaskError> {
        match &self.outcome {
            TaskOutcome::Completed(result) => Ok(result),
            other => Err(TaskError::ResultUnavailable {
                status: other.status(),
            }),
        }
    }

    /// Consuming variant of [`CompletionReport::result`].
    pub fn into_result(self) -> Result<R, TaskError> {
        match self.outcome {
            TaskOutcome::Completed(result) => Ok(result),
            other => Err(TaskError::ResultUnavailable {
                status: other.status(),
            }),
        }
    }
}
