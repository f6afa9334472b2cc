//! Delivery context abstraction.
//!
//! Lives here (not in `sidework-engine`) because `TaskHandle` captures the
//! caller's delivery context at start time; the runtime-specific
//! implementation lives with the runtime primitives in the engine crate.

/// A queued callback, handed across execution-context boundaries.
pub type DispatchCallback = Box<dyn FnOnce() + Send + 'static>;

/// The capability to run a callback later on a captured execution context.
///
/// Contract: a submitted callback runs strictly after `post` returns, and in
/// FIFO order relative to other submissions on the same dispatcher. This is
/// what lets single-threaded callers (event loops, UI contexts) receive
/// progress and completion callbacks safely — reports are never delivered
/// inline on the worker's context.
pub trait Dispatcher: Send + Sync {
    /// Queue `callback` for later execution on this dispatcher's context.
    ///
    /// A dispatcher whose consuming context has gone away may silently drop
    /// the callback; delivery is best-effort once the caller stops draining.
    fn post(&self, callback: DispatchCallback);
}
