//! Unified error types for task registration and reporting.

use crate::registry::TaskId;
use crate::state_machine::TaskStatus;
use serde::{Deserialize, Serialize};

/// Unified error type for registry and report operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Duplicate task id: {0}")]
    DuplicateTask(TaskId),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Maximum live tasks limit reached: {0}")]
    MaxTasksReached(usize),

    #[error("Invalid status transition: {current:?} -> {requested:?}")]
    InvalidTransition {
        current: TaskStatus,
        requested: TaskStatus,
    },

    #[error("Task is in terminal status: {0:?}")]
    TerminalState(TaskStatus),

    #[error("Task result unavailable: task {status:?}")]
    ResultUnavailable { status: TaskStatus },
}

/// A failure raised inside a worker computation.
///
/// Fully contained by the engine — carried on the completion report's
/// `Failed` arm, never propagated to the caller's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WorkerError {
    #[error("Worker failed: {0}")]
    Failed(String),

    #[error("Worker panicked: {0}")]
    Panicked(String),
}
