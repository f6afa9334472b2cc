//! # Task Registry and Report Types
//!
//! **Runtime-agnostic bookkeeping for sidework background tasks.**
//!
//! A task is one invocation of an asynchronous computation, identified by a
//! caller-supplied unique [`TaskId`] for its lifetime. This crate holds the
//! pieces that do not depend on how workers actually run: the live-task
//! table, the status state machine, the immutable report value types, and
//! the [`Dispatcher`] capability used to marshal callbacks back onto the
//! caller's delivery context. The execution half (worker trait, engine,
//! tokio dispatcher) lives in `sidework-engine`.
//!
//! ## Quick Start
//!
//! ```rust
//! use sidework_registry::prelude::*;
//! use std::sync::Arc;
//!
//! // Runs callbacks inline; real callers use a queue-backed dispatcher.
//! struct Inline;
//! impl Dispatcher for Inline {
//!     fn post(&self, callback: DispatchCallback) {
//!         callback()
//!     }
//! }
//!
//! # async fn example() -> Result<(), TaskError> {
//! let registry = TaskRegistry::new();
//! registry
//!     .start("job-1".into(), TaskHandle::new(Arc::new(Inline)))
//!     .await?;
//!
//! assert!(registry.is_live(&"job-1".into()).await);
//!
//! // Cooperative cancellation: the entry disappears, the worker notices.
//! registry.cancel(&"job-1".into()).await;
//! assert!(!registry.is_live(&"job-1".into()).await);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`TaskRegistry`]**: `HashMap` behind an `RwLock`; an id is present
//!   iff the task is running and not cancelled
//! - **[`TaskHandle`]**: per-task record — captured delivery context, opaque
//!   user token, current status
//! - **[`ProgressReport`] / [`CompletionReport`]**: immutable report values
//! - **State machine**: validates `Created -> Running -> terminal`

// Core modules
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod state_machine;

// Re-exports for convenience
pub use dispatch::{DispatchCallback, Dispatcher};
pub use error::{TaskError, WorkerError};
pub use registry::{DeliveryContext, RegistryConfig, TaskHandle, TaskId, TaskRegistry};
pub use report::{CompletionReport, ProgressReport, TaskOutcome};
pub use state_machine::{TaskStatus, is_terminal, validate_transition};
