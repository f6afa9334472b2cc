//! Worker contract — the pluggable long-running computation.
//!
//! A worker is any checkpointable computation: between discrete units of
//! work it checks liveness, and on cancellation it must abandon work
//! promptly (no more than a small bounded step). The engine owns the
//! terminal bookkeeping; the worker only computes and reports.

use async_trait::async_trait;
use sidework_registry::{ProgressReport, TaskId, TaskRegistry, WorkerError};
use std::sync::Arc;

/// Progress callback shared between the engine and the worker context.
pub(crate) type ProgressFn<P> = Arc<dyn Fn(ProgressReport<P>) + Send + Sync>;

/// A long-running, checkpointable computation.
///
/// Implementations hold no per-task state — one worker value can serve any
/// number of concurrently started tasks.
#[async_trait]
pub trait TaskWorker: Send + Sync + 'static {
    /// The task's input payload.
    type Input: Send + 'static;
    /// Payload-specific progress detail value.
    type Progress: Send + 'static;
    /// The success result.
    type Output: Send + 'static;

    /// Perform the computation.
    ///
    /// Must call [`WorkerContext::is_live`] between bounded units of work
    /// and return promptly once it observes cancellation; whatever it
    /// returns on that path is discarded by the engine. Failures are
    /// returned, not panicked — though a panic is still contained and
    /// surfaced as [`WorkerError::Panicked`].
    async fn run(
        &self,
        input: Self::Input,
        ctx: &mut WorkerContext<Self::Progress>,
    ) -> Result<Self::Output, WorkerError>;
}

/// Per-task capabilities handed to a running worker: the cancellation
/// check, progress emission, and the cooperative yield.
pub struct WorkerContext<P> {
    task_id: TaskId,
    registry: TaskRegistry,
    on_progress: ProgressFn<P>,
    last_percent: u8,
    cancellation_observed: bool,
}

impl<P: Send + 'static> WorkerContext<P> {
    pub(crate) fn new(task_id: TaskId, registry: TaskRegistry, on_progress: ProgressFn<P>) -> Self {
        Self {
            task_id,
            registry,
            on_progress,
            last_percent: 0,
            cancellation_observed: false,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Whether this task is still wanted.
    ///
    /// Once cancellation has been observed the answer stays `false` without
    /// touching the registry again.
    pub async fn is_live(&mut self) -> bool {
        if self.cancellation_observed {
            return false;
        }
        if self.registry.is_live(&self.task_id).await {
            true
        } else {
            self.cancellation_observed = true;
            false
        }
    }

    /// Emit one progress report on the captured delivery context.
    ///
    /// The liveness lookup doubles as the cancellation observation: once the
    /// registry entry is gone the report is dropped and no further progress
    /// is emitted. Percent is clamped to `[last, 100]` so the stream stays
    /// monotonically non-decreasing.
    pub async fn emit_progress(&mut self, percent_complete: u8, detail: P) {
        if self.cancellation_observed {
            return;
        }
        let Some(delivery) = self.registry.live_delivery(&self.task_id).await else {
            self.cancellation_observed = true;
            return;
        };

        let percent_complete = percent_complete.min(100).max(self.last_percent);
        self.last_percent = percent_complete;

        let report = ProgressReport {
            task_id: self.task_id.clone(),
            percent_complete,
            detail,
            user_token: delivery.user_token,
        };
        let on_progress = Arc::clone(&self.on_progress);
        delivery
            .dispatcher
            .post(Box::new(move || on_progress(report)));
    }

    /// Voluntarily give up the rest of this execution slice so other tasks
    /// sharing the process are not starved.
    pub async fn yield_now(&self) {
        tokio::task::yield_now().await;
    }
}
