//! # Prime Progress Demo
//!
//! Starts a primality test on a background worker and keeps the caller's
//! context (this main task) free while progress streams in. A second,
//! deliberately oversized task shows cooperative cancellation.
//!
//! ```text
//! cargo run -p prime-progress -- 1000003
//! ```

use std::sync::Arc;
use std::time::Duration;

use sidework_engine::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), TaskError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let number_to_test: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1_000_003);

    let engine = TaskEngine::new(PrimeWorker);
    let (dispatcher, mut queue) = ChannelDispatcher::new();
    let dispatcher: Arc<dyn Dispatcher> = Arc::new(dispatcher);

    engine
        .start(
            number_to_test,
            "prime-check",
            Arc::clone(&dispatcher),
            |progress| {
                info!(
                    percent = progress.percent_complete,
                    prime = progress.detail,
                    "progress"
                );
            },
            move |completion| match completion.outcome {
                TaskOutcome::Completed(result) => info!(
                    number = result.number_to_test,
                    is_prime = result.is_prime,
                    first_divisor = result.first_divisor,
                    "prime check finished"
                ),
                TaskOutcome::Failed(error) => info!(%error, "prime check failed"),
                TaskOutcome::Cancelled => info!("prime check cancelled"),
            },
        )
        .await?;

    // An oversized sibling task, cancelled shortly after it starts chewing.
    engine
        .start(
            u64::MAX / 2,
            "doomed-check",
            Arc::clone(&dispatcher),
            |_| {},
            |completion| info!(cancelled = completion.is_cancelled(), "doomed check finished"),
        )
        .await?;

    let canceller = engine.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel(&TaskId::from("doomed-check")).await;
    });

    // Drain callbacks on this context until both tasks have completed.
    drop(dispatcher);
    queue.run().await;

    Ok(())
}
