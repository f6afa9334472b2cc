//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use sidework_engine::prelude::*;
//! ```

pub use crate::dispatch::{ChannelDispatcher, DispatchQueue};
pub use crate::engine::TaskEngine;
pub use crate::prime::{PrimeResult, PrimeWorker};
pub use crate::worker::{TaskWorker, WorkerContext};

pub use sidework_registry::prelude::*;
