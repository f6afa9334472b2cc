//! # Sidework Task Engine
//!
//! **Run a long computation on a background worker while the caller keeps
//! going — with progress callbacks, cooperative cancellation, and exactly
//! one completion report per task.**
//!
//! The engine half of sidework: the [`TaskWorker`] contract and its
//! [`WorkerContext`], the [`TaskEngine`] that spawns workers and marshals
//! reports, the queue-backed [`ChannelDispatcher`], and the demonstration
//! [`PrimeWorker`] payload. Bookkeeping (registry, status state machine,
//! report types) lives in `sidework-registry`; this split keeps
//! runtime-specific primitives out of the bookkeeping crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use sidework_engine::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), TaskError> {
//! let engine = TaskEngine::new(PrimeWorker);
//! let (dispatcher, mut queue) = ChannelDispatcher::new();
//!
//! engine
//!     .start(
//!         100,
//!         "is-100-prime",
//!         Arc::new(dispatcher),
//!         |progress| println!("found prime {}", progress.detail),
//!         |completion| println!("outcome: {:?}", completion.outcome),
//!     )
//!     .await?;
//!
//! // Callbacks run here, on the caller's context, never on the worker's.
//! queue.run().await;
//! # Ok(())
//! # }
//! ```
//!
//! Cancellation is cooperative: [`TaskEngine::cancel`] removes the
//! registry entry, and the worker observes the absence at its next
//! checkpoint. The completion report is still delivered, with the
//! cancelled outcome.

// Core modules
pub mod dispatch;
pub mod engine;
pub mod prelude;
pub mod prime;
pub mod worker;

// Re-exports for convenience
pub use dispatch::{ChannelDispatcher, DispatchQueue};
pub use engine::TaskEngine;
pub use prime::{PrimeResult, PrimeWorker};
pub use worker::{TaskWorker, WorkerContext};
