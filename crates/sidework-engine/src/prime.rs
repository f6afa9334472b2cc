//! Prime-testing payload.
//!
//! The demonstration worker: tests a target number for primality by trial
//! division against a growing list of discovered primes, reporting each
//! prime found as progress. Trivial and swappable — the engine does not
//! know or care what the computation is.

use crate::worker::{TaskWorker, WorkerContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sidework_registry::WorkerError;

/// Outcome of one primality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeResult {
    pub number_to_test: u64,
    /// Smallest prime divisor found, or 1 when none was.
    pub first_divisor: u64,
    pub is_prime: bool,
}

impl PrimeResult {
    /// Placeholder returned when the computation was abandoned; the engine
    /// discards it on the cancelled path.
    fn unresolved(number_to_test: u64) -> Self {
        Self {
            number_to_test,
            first_divisor: 1,
            is_prime: false,
        }
    }
}

/// Trial-division primality worker over a growing sieve.
pub struct PrimeWorker;

#[async_trait]
impl TaskWorker for PrimeWorker {
    type Input = u64;
    type Progress = u64;
    type Output = PrimeResult;

    async fn run(
        &self,
        number_to_test: u64,
        ctx: &mut WorkerContext<u64>,
    ) -> Result<PrimeResult, WorkerError> {
        let primes = build_prime_list(number_to_test, ctx).await;
        if !ctx.is_live().await {
            return Ok(PrimeResult::unresolved(number_to_test));
        }

        let (is_prime, first_divisor) = trial_divide(&primes, number_to_test);
        Ok(PrimeResult {
            number_to_test,
            first_divisor,
            is_prime,
        })
    }
}

/// Discover every prime below `number_to_test`, reporting each one.
///
/// Each discovered prime emits a progress report and yields the rest of the
/// execution slice; the liveness check bounds how far the loop runs past a
/// cancellation.
async fn build_prime_list(number_to_test: u64, ctx: &mut WorkerContext<u64>) -> Vec<u64> {
    let mut primes = vec![2, 3];

    for &seed in &[2u64, 3] {
        if seed < number_to_test {
            ctx.emit_progress(percent_of(seed, number_to_test), seed)
                .await;
        }
    }

    // Skip even candidates.
    let mut n = 5;
    while n < number_to_test && ctx.is_live().await {
        let (is_prime, _) = trial_divide(&primes, n);
        if is_prime {
            ctx.emit_progress(percent_of(n, number_to_test), n).await;
            primes.push(n);
            ctx.yield_now().await;
        }
        n += 2;
    }

    primes
}

fn percent_of(n: u64, number_to_test: u64) -> u8 {
    (n * 100 / number_to_test) as u8
}

/// Test `n` by trial division against the ordered prime list.
///
/// Returns `(is_prime, first_divisor)`, with `first_divisor = 1` when no
/// divisor was found. The square-root cutoff is checked before
/// divisibility, so the seed primes classify as prime; targets below 2
/// never enter the scan and resolve as "no divisor found".
fn trial_divide(primes: &[u64], n: u64) -> (bool, u64) {
    for &divisor in primes {
        if divisor.saturating_mul(divisor) > n {
            break;
        }
        if n % divisor == 0 {
            return (false, divisor);
        }
    }
    (true, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_divide_small_primes() {
        let primes = [2, 3];
        assert_eq!(trial_divide(&primes, 2), (true, 1));
        assert_eq!(trial_divide(&primes, 3), (true, 1));
        assert_eq!(trial_divide(&primes, 5), (true, 1));
        assert_eq!(trial_divide(&primes, 7), (true, 1));
    }

    #[test]
    fn test_trial_divide_composites() {
        let primes = [2, 3, 5, 7];
        assert_eq!(trial_divide(&primes, 4), (false, 2));
        assert_eq!(trial_divide(&primes, 9), (false, 3));
        assert_eq!(trial_divide(&primes, 35), (false, 5));
        assert_eq!(trial_divide(&primes, 100), (false, 2));
    }

    #[test]
    fn test_trial_divide_degrades_below_two() {
        // 0 and 1 never enter the divisor scan; they resolve as "no divisor
        // found", matching the bounded-loop contract (no special casing).
        let primes = [2, 3];
        assert_eq!(trial_divide(&primes, 0), (true, 1));
        assert_eq!(trial_divide(&primes, 1), (true, 1));
    }

    #[test]
    fn test_percent_stays_below_hundred() {
        assert_eq!(percent_of(2, 100), 2);
        assert_eq!(percent_of(97, 100), 97);
        assert_eq!(percent_of(999, 1000), 99);
    }
}
