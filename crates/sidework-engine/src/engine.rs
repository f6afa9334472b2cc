//! Task engine — worker dispatch and report marshaling.
//!
//! Bridges the registry's bookkeeping with actual execution: each started
//! task gets its own spawned tokio task, and every report travels back to
//! the caller through the delivery context captured at start time.

use crate::worker::{ProgressFn, TaskWorker, WorkerContext};
use futures::FutureExt;
use sidework_registry::{
    CompletionReport, Dispatcher, ProgressReport, RegistryConfig, TaskError, TaskHandle, TaskId,
    TaskOutcome, TaskRegistry, TaskStatus, WorkerError,
};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates worker dispatch onto background tokio tasks and marshals
/// progress/completion reports back onto the caller's delivery context.
///
/// One engine serves any number of concurrently live tasks of its worker's
/// payload type; there is no bound beyond task-id uniqueness (and the
/// optional registry cap).
pub struct TaskEngine<W: TaskWorker> {
    registry: TaskRegistry,
    worker: Arc<W>,
}

impl<W: TaskWorker> Clone for TaskEngine<W> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            worker: Arc::clone(&self.worker),
        }
    }
}

impl<W: TaskWorker> TaskEngine<W> {
    /// Create an engine around `worker` with an unbounded registry.
    pub fn new(worker: W) -> Self {
        Self::with_config(worker, RegistryConfig::default())
    }

    /// Create an engine with a custom registry configuration.
    pub fn with_config(worker: W, config: RegistryConfig) -> Self {
        Self {
            registry: TaskRegistry::with_config(config),
            worker: Arc::new(worker),
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Number of currently live tasks.
    pub async fn live_count(&self) -> usize {
        self.registry.live_count().await
    }

    /// Start a task. See [`TaskEngine::start_with_token`].
    pub async fn start<FP, FC>(
        &self,
        input: W::Input,
        task_id: impl Into<TaskId>,
        dispatcher: Arc<dyn Dispatcher>,
        on_progress: FP,
        on_completion: FC,
    ) -> Result<(), TaskError>
    where
        FP: Fn(ProgressReport<W::Progress>) + Send + Sync + 'static,
        FC: FnOnce(CompletionReport<W::Output>) + Send + 'static,
    {
        self.start_with_token(input, task_id, None, dispatcher, on_progress, on_completion)
            .await
    }

    /// Start a task, carrying an opaque user token echoed on every report.
    ///
    /// Captures `dispatcher` as the task's delivery context, registers the
    /// task (a duplicate id fails here, before anything is spawned), then
    /// dispatches the worker onto a background tokio task and returns.
    /// Never blocks on worker completion.
    ///
    /// `on_completion` runs exactly once per started task; `on_progress`
    /// runs zero or more times, all strictly before the completion and in
    /// the order the worker produced them. Both run on the dispatcher's
    /// context, never inline on the worker's.
    pub async fn start_with_token<FP, FC>(
        &self,
        input: W::Input,
        task_id: impl Into<TaskId>,
        user_token: Option<Value>,
        dispatcher: Arc<dyn Dispatcher>,
        on_progress: FP,
        on_completion: FC,
    ) -> Result<(), TaskError>
    where
        FP: Fn(ProgressReport<W::Progress>) + Send + Sync + 'static,
        FC: FnOnce(CompletionReport<W::Output>) + Send + 'static,
    {
        let task_id = task_id.into();

        let mut handle = TaskHandle::new(Arc::clone(&dispatcher));
        if let Some(token) = user_token.clone() {
            handle = handle.with_user_token(token);
        }
        // Duplicate ids surface here, synchronously; no worker is spawned.
        self.registry.start(task_id.clone(), handle).await?;

        let registry = self.registry.clone();
        let worker = Arc::clone(&self.worker);
        let on_progress: ProgressFn<W::Progress> = Arc::new(on_progress);

        tokio::spawn(async move {
            let outcome = match registry.update_status(&task_id, TaskStatus::Running).await {
                Ok(_) => {
                    let mut ctx =
                        WorkerContext::new(task_id.clone(), registry.clone(), on_progress);
                    match AssertUnwindSafe(worker.run(input, &mut ctx))
                        .catch_unwind()
                        .await
                    {
                        Ok(Ok(output)) => TaskOutcome::Completed(output),
                        Ok(Err(err)) => TaskOutcome::Failed(err),
                        Err(panic) => {
                            TaskOutcome::Failed(WorkerError::Panicked(panic_message(&*panic)))
                        }
                    }
                }
                // Entry already cancelled away before the worker got a slice.
                Err(_) => TaskOutcome::Cancelled,
            };

            // Whichever removal happens first wins and fixes the terminal
            // outcome: losing to the cancel path means Cancelled, regardless
            // of what the worker returned.
            let outcome = if registry.remove(&task_id).await {
                outcome
            } else {
                TaskOutcome::Cancelled
            };

            debug!(task_id = %task_id, status = ?outcome.status(), "Task reached terminal status");
            let report = CompletionReport::new(task_id, user_token, outcome);
            dispatcher.post(Box::new(move || on_completion(report)));
        });

        Ok(())
    }

    /// Request cooperative cancellation of `task_id`.
    ///
    /// Returns immediately: the registry no longer considers the task live
    /// and no further progress will be delivered, but the worker may still
    /// be unwinding. Its completion report (with the cancelled outcome) is
    /// still delivered. Unknown or already-finished ids are a silent no-op.
    pub async fn cancel(&self, task_id: &TaskId) {
        self.registry.cancel(task_id).await;
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
