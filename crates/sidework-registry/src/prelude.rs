//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use sidework_registry::prelude::*;
//! ```

pub use crate::dispatch::{DispatchCallback, Dispatcher};
pub use crate::error::{TaskError, WorkerError};
pub use crate::registry::{DeliveryContext, RegistryConfig, TaskHandle, TaskId, TaskRegistry};
pub use crate::report::{CompletionReport, ProgressReport, TaskOutcome};
pub use crate::state_machine::{TaskStatus, is_terminal, validate_transition};
