//! Task status state machine enforcement.
//!
//! Validates transitions per the task lifecycle:
//!
//! ```text
//! Created -> Running
//! Running -> Completed | Failed | Cancelled
//! Completed/Failed/Cancelled -> ERROR (terminal, no further transitions)
//! ```

use crate::error::TaskError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
///
/// A task starts `Created` when registered, moves to `Running` once the
/// worker picks it up, and ends in exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Created,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Validate a task status transition per the lifecycle rules.
///
/// Returns `Ok(())` if the transition is valid, or `Err(TaskError)` if not.
pub fn validate_transition(from: TaskStatus, to: TaskStatus) -> Result<(), TaskError> {
    match from {
        TaskStatus::Created => match to {
            TaskStatus::Running => Ok(()),
            _ => Err(TaskError::InvalidTransition {
                current: from,
                requested: to,
            }),
        },
        TaskStatus::Running => match to {
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled => Ok(()),
            _ => Err(TaskError::InvalidTransition {
                current: from,
                requested: to,
            }),
        },
        TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled => {
            Err(TaskError::TerminalState(from))
        }
    }
}

/// Returns `true` if the status is a terminal state (no further transitions allowed).
pub fn is_terminal(status: TaskStatus) -> bool {
    matches!(
        status,
        TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
    )
}
