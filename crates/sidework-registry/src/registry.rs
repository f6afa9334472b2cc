//! The live-task table.
//!
//! The registry is the sole source of truth for "is this task still wanted."
//! Entries are stored in a `HashMap` behind an `RwLock`; the lock is held for
//! the duration of the table access only, never across a computation.

use crate::dispatch::Dispatcher;
use crate::error::TaskError;
use crate::state_machine::{self, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Opaque, caller-supplied task identifier.
///
/// Uniqueness among currently live tasks is a precondition of
/// [`TaskRegistry::start`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Bookkeeping record for one live task.
///
/// Holds the delivery context captured when the task was started, the
/// caller's opaque user token, and the current (non-terminal) status.
/// Created on `start`, removed exactly once — by the worker on natural
/// completion or by an explicit cancel, never both.
#[derive(Clone)]
pub struct TaskHandle {
    dispatcher: Arc<dyn Dispatcher>,
    user_token: Option<Value>,
    status: TaskStatus,
}

impl TaskHandle {
    /// Create a handle capturing `dispatcher` as the delivery context.
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher,
            user_token: None,
            status: TaskStatus::Created,
        }
    }

    /// Attach an opaque user token, echoed back on every report.
    pub fn with_user_token(mut self, token: Value) -> Self {
        self.user_token = Some(token);
        self
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn user_token(&self) -> Option<&Value> {
        self.user_token.as_ref()
    }
}

/// The delivery half of a live [`TaskHandle`], cloned out under the lock so
/// reports can be posted without holding it.
#[derive(Clone)]
pub struct DeliveryContext {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub user_token: Option<Value>,
}

/// Configuration for the task registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of concurrently live tasks (0 = unlimited)
    pub max_tasks: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_tasks: 0 }
    }
}

/// Process-wide table mapping task ids to live-task bookkeeping.
///
/// Uses `Arc<RwLock<HashMap>>` for concurrent access. An id is present in
/// the table if and only if a task with that id is running and has not been
/// cancelled; absence is the cancellation signal workers poll for.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<HashMap<TaskId, TaskHandle>>>,
    config: RegistryConfig,
}

impl TaskRegistry {
    /// Create a new registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a task under `task_id`.
    ///
    /// Fails with [`TaskError::DuplicateTask`] if the id is already live —
    /// duplicate ids are a caller error and nothing is registered.
    pub async fn start(&self, task_id: TaskId, handle: TaskHandle) -> Result<(), TaskError> {
        let mut tasks = self.tasks.write().await;

        if self.config.max_tasks > 0 && tasks.len() >= self.config.max_tasks {
            return Err(TaskError::MaxTasksReached(self.config.max_tasks));
        }
        if tasks.contains_key(&task_id) {
            return Err(TaskError::DuplicateTask(task_id));
        }

        tasks.insert(task_id.clone(), handle);
        debug!(task_id = %task_id, "Registered task");
        Ok(())
    }

    /// Whether `task_id` is still wanted.
    ///
    /// This is the sole cancellation-check primitive: absence means "treat
    /// as cancelled," covering both explicit cancellation and unknown ids.
    pub async fn is_live(&self, task_id: &TaskId) -> bool {
        let tasks = self.tasks.read().await;
        tasks.contains_key(task_id)
    }

    /// Remove the entry for `task_id` if present. Returns whether an entry
    /// was removed.
    ///
    /// Idempotent — the worker's natural-completion path and an explicit
    /// cancel may race to remove the same entry; whichever gets here first
    /// wins and the loser sees `false`.
    pub async fn remove(&self, task_id: &TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(task_id).is_some();
        if removed {
            debug!(task_id = %task_id, "Removed task entry");
        }
        removed
    }

    /// Request cooperative cancellation of `task_id`.
    ///
    /// Removes the entry if present; the worker is not stopped directly and
    /// must itself observe `is_live == false` and unwind. Cancelling an
    /// unknown or already-finished id is a silent no-op (`false`).
    pub async fn cancel(&self, task_id: &TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        let cancelled = tasks.remove(task_id).is_some();
        if cancelled {
            debug!(task_id = %task_id, "Cancellation requested, task entry removed");
        }
        cancelled
    }

    /// Update the status of a live entry with state machine validation.
    ///
    /// Returns [`TaskError::TaskNotFound`] when the entry was already
    /// cancelled away.
    pub async fn update_status(
        &self,
        task_id: &TaskId,
        new_status: TaskStatus,
    ) -> Result<TaskStatus, TaskError> {
        let mut tasks = self.tasks.write().await;

        let handle = tasks
            .get_mut(task_id)
            .ok_or_else(|| TaskError::TaskNotFound(task_id.clone()))?;

        state_machine::validate_transition(handle.status, new_status)?;
        handle.status = new_status;

        debug!(task_id = %task_id, status = ?new_status, "Task status updated");
        Ok(new_status)
    }

    /// Clone out the delivery half of a live entry, or `None` if the task is
    /// no longer wanted.
    ///
    /// Workers use this as the combined liveness-check-and-lookup when
    /// posting progress: a `None` here is the cancellation observation after
    /// which no further progress may be emitted.
    pub async fn live_delivery(&self, task_id: &TaskId) -> Option<DeliveryContext> {
        let tasks = self.tasks.read().await;
        tasks.get(task_id).map(|handle| DeliveryContext {
            dispatcher: Arc::clone(&handle.dispatcher),
            user_token: handle.user_token.clone(),
        })
    }

    /// Number of currently live tasks.
    pub async fn live_count(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchCallback;
    use serde_json::json;

    /// Discards every callback; registry tests only exercise bookkeeping.
    struct NullDispatcher;

    impl Dispatcher for NullDispatcher {
        fn post(&self, _callback: DispatchCallback) {}
    }

    fn make_handle() -> TaskHandle {
        TaskHandle::new(Arc::new(NullDispatcher))
    }

    #[tokio::test]
    async fn test_start_and_is_live() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        assert!(registry.is_live(&"task-1".into()).await);
        assert!(!registry.is_live(&"task-2".into()).await);
        assert_eq!(registry.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_start_rejected() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        let result = registry.start("task-1".into(), make_handle()).await;
        match result.unwrap_err() {
            TaskError::DuplicateTask(id) => assert_eq!(id.as_str(), "task-1"),
            other => panic!("Expected DuplicateTask, got: {:?}", other),
        }
        assert_eq!(registry.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        assert!(registry.remove(&"task-1".into()).await);
        assert!(!registry.remove(&"task-1".into()).await);
        assert!(!registry.remove(&"never-started".into()).await);
    }

    #[tokio::test]
    async fn test_cancel_removes_entry() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        assert!(registry.cancel(&"task-1".into()).await);
        assert!(!registry.is_live(&"task-1".into()).await);
    }

    #[tokio::test]
    async fn test_cancel_unknown_is_noop() {
        let registry = TaskRegistry::new();
        assert!(!registry.cancel(&"unknown".into()).await);
    }

    #[tokio::test]
    async fn test_id_reusable_after_removal() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();
        registry.remove(&"task-1".into()).await;

        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();
        assert!(registry.is_live(&"task-1".into()).await);
    }

    #[tokio::test]
    async fn test_max_tasks_limit() {
        let registry = TaskRegistry::with_config(RegistryConfig { max_tasks: 2 });
        registry.start("a".into(), make_handle()).await.unwrap();
        registry.start("b".into(), make_handle()).await.unwrap();

        let result = registry.start("c".into(), make_handle()).await;
        match result.unwrap_err() {
            TaskError::MaxTasksReached(n) => assert_eq!(n, 2),
            other => panic!("Expected MaxTasksReached, got: {:?}", other),
        }

        // Capacity frees up once an entry is removed.
        registry.remove(&"a".into()).await;
        registry.start("c".into(), make_handle()).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_status_created_to_running() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        let status = registry
            .update_status(&"task-1".into(), TaskStatus::Running)
            .await
            .unwrap();
        assert_eq!(status, TaskStatus::Running);
    }

    #[tokio::test]
    async fn test_update_status_rejects_invalid_transition() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();

        let result = registry
            .update_status(&"task-1".into(), TaskStatus::Created)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            TaskError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_status_after_cancel_is_not_found() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();
        registry.cancel(&"task-1".into()).await;

        let result = registry
            .update_status(&"task-1".into(), TaskStatus::Running)
            .await;
        match result.unwrap_err() {
            TaskError::TaskNotFound(id) => assert_eq!(id.as_str(), "task-1"),
            other => panic!("Expected TaskNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_live_delivery_carries_user_token() {
        let registry = TaskRegistry::new();
        let handle = make_handle().with_user_token(json!({"caller": "ui"}));
        registry.start("task-1".into(), handle).await.unwrap();

        let delivery = registry.live_delivery(&"task-1".into()).await.unwrap();
        assert_eq!(delivery.user_token, Some(json!({"caller": "ui"})));
    }

    #[tokio::test]
    async fn test_live_delivery_gone_after_cancel() {
        let registry = TaskRegistry::new();
        registry
            .start("task-1".into(), make_handle())
            .await
            .unwrap();
        registry.cancel(&"task-1".into()).await;

        assert!(registry.live_delivery(&"task-1".into()).await.is_none());
    }
}
