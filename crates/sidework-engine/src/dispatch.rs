//! Queue-backed dispatcher.
//!
//! The runtime implementation of the `Dispatcher` capability: `post` pushes
//! the callback onto an unbounded mpsc channel, and the caller drains the
//! paired [`DispatchQueue`] on whatever context it wants callbacks to run
//! on. FIFO order and run-after-post fall out of the channel.

use sidework_registry::{DispatchCallback, Dispatcher};
use tokio::sync::mpsc;

/// Sending half — capture this (behind an `Arc`) as a task's delivery
/// context.
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<DispatchCallback>,
}

impl ChannelDispatcher {
    /// Create a dispatcher and the queue that consumes its callbacks.
    pub fn new() -> (ChannelDispatcher, DispatchQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelDispatcher { tx }, DispatchQueue { rx })
    }
}

impl Dispatcher for ChannelDispatcher {
    fn post(&self, callback: DispatchCallback) {
        // Receiver gone means the caller stopped draining; deliveries are
        // best-effort from that point.
        let _ = self.tx.send(callback);
    }
}

/// Receiving half — drained by the caller on its own execution context.
pub struct DispatchQueue {
    rx: mpsc::UnboundedReceiver<DispatchCallback>,
}

impl DispatchQueue {
    /// Wait for the next callback and run it.
    ///
    /// Returns `false` once every dispatcher clone has been dropped and the
    /// queue is empty.
    pub async fn recv_run(&mut self) -> bool {
        match self.rx.recv().await {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Run callbacks until every dispatcher clone has been dropped.
    pub async fn run(&mut self) {
        while self.recv_run().await {}
    }

    /// Run every callback already queued without waiting. Returns how many
    /// ran.
    pub fn drain_ready(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.rx.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_callbacks_run_fifo() {
        let (dispatcher, mut queue) = ChannelDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            dispatcher.post(Box::new(move || order.lock().unwrap().push(i)));
        }

        assert_eq!(queue.drain_ready(), 5);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_post_does_not_run_inline() {
        let (dispatcher, mut queue) = ChannelDispatcher::new();
        let ran = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&ran);
        dispatcher.post(Box::new(move || *flag.lock().unwrap() = true));
        assert!(!*ran.lock().unwrap());

        queue.drain_ready();
        assert!(*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_run_ends_when_dispatchers_dropped() {
        let (dispatcher, mut queue) = ChannelDispatcher::new();
        let count = Arc::new(Mutex::new(0));

        let c = Arc::clone(&count);
        dispatcher.post(Box::new(move || *c.lock().unwrap() += 1));
        drop(dispatcher);

        queue.run().await;
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_post_after_queue_dropped_is_silent() {
        let (dispatcher, queue) = ChannelDispatcher::new();
        drop(queue);
        dispatcher.post(Box::new(|| panic!("never runs")));
    }
}
