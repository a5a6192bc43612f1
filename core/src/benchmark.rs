//! Throughput measurement over the real pipeline.

use std::{
    thread,
    time::{Duration, Instant},
};

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use tracing::info;

use crate::{
    error::{BruteError, BruteResult},
    generator::{Generator, RunMode},
};

/// How often the watchdog checks the deadline.
const WATCHDOG_TICK: Duration = Duration::from_millis(10);

/// The outcome of a benchmark run.
#[derive(Clone, Debug)]
pub struct BenchmarkReport {
    /// Wall-clock time actually spent hashing.
    pub elapsed: Duration,
    /// Candidates hashed within the budget.
    pub hashes: u64,
    pub hashes_per_second: f64,
    /// Throughput divided by the worker count.
    pub hashes_per_thread: f64,
    pub threads: usize,
    /// Theoretical size of the configured candidate space.
    pub total_combinations: BigUint,
    /// Projected time to hash the whole space at the measured rate.
    /// `None` when the rate was zero or the projection overflows.
    pub estimated_exhaustion: Option<Duration>,
}

impl Generator {
    /// Measures hashing throughput by running the full pipeline in
    /// counting-only mode for at most `budget`.
    ///
    /// The measurement exercises the same enumeration, batching and worker
    /// code as a real run, so the rate it reports is the rate a table
    /// computation would sustain. Tiny candidate spaces may exhaust before
    /// the budget elapses, which shortens the measurement but keeps the
    /// report valid.
    pub fn benchmark(&self, budget: Duration) -> BruteResult<BenchmarkReport> {
        if budget.is_zero() {
            return Err(BruteError::InvalidBenchmarkBudget);
        }

        let _guard = self.begin()?;

        let deadline = Instant::now() + budget;
        let watchdog = {
            let generator = self.clone();
            thread::spawn(move || {
                while !generator.stop_requested() {
                    if Instant::now() >= deadline {
                        generator.request_stop();
                        break;
                    }
                    thread::sleep(WATCHDOG_TICK);
                }
            })
        };

        let start = Instant::now();
        let run = self.run_pipeline(&RunMode::Count, None);
        let elapsed = start.elapsed();

        // unblocks the watchdog when the space exhausted before the deadline
        self.request_stop();
        let _ = watchdog.join();

        let hashes_per_second = run.processed as f64 / elapsed.as_secs_f64();
        let total_combinations = self.ctx().total_combinations();
        let estimated_exhaustion = estimate_exhaustion(&total_combinations, hashes_per_second);

        info!(
            hashes = run.processed,
            ?elapsed,
            rate = hashes_per_second,
            "benchmark finished"
        );

        Ok(BenchmarkReport {
            elapsed,
            hashes: run.processed,
            hashes_per_second,
            hashes_per_thread: hashes_per_second / self.ctx().threads as f64,
            threads: self.ctx().threads,
            total_combinations,
            estimated_exhaustion,
        })
    }
}

fn estimate_exhaustion(total: &BigUint, hashes_per_second: f64) -> Option<Duration> {
    if hashes_per_second <= 0. {
        return None;
    }

    let seconds = total.to_f64()? / hashes_per_second;
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashAlgorithm, TableCtxBuilder};

    #[test]
    fn test_budget_is_respected() {
        // far too large a space to exhaust within the budget
        let ctx = TableCtxBuilder::new()
            .hash(HashAlgorithm::Sha256)
            .length_range(1, 10)
            .threads(2)
            .build()
            .unwrap();
        let budget = Duration::from_millis(300);

        let report = Generator::new(ctx).benchmark(budget).unwrap();

        assert!(report.hashes > 0);
        assert!(report.hashes_per_second > 0.);
        // scheduling jitter aside, the watchdog halts the run near the budget
        assert!(report.elapsed < budget + Duration::from_secs(2));
        assert!(report.estimated_exhaustion.is_some());
    }

    #[test]
    fn test_tiny_space_exhausts_before_budget() {
        let ctx = TableCtxBuilder::new()
            .hash(HashAlgorithm::Md5)
            .base_charset(b"ab")
            .length_range(1, 2)
            .threads(1)
            .build()
            .unwrap();

        let report = Generator::new(ctx)
            .benchmark(Duration::from_secs(30))
            .unwrap();

        assert_eq!(6, report.hashes);
        assert!(report.elapsed < Duration::from_secs(30));
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let ctx = TableCtxBuilder::new().build().unwrap();

        assert!(matches!(
            Generator::new(ctx).benchmark(Duration::ZERO),
            Err(BruteError::InvalidBenchmarkBudget)
        ));
    }

    #[test]
    fn test_per_thread_rate() {
        let ctx = TableCtxBuilder::new()
            .base_charset(b"abcd")
            .length_range(1, 3)
            .threads(2)
            .build()
            .unwrap();

        let report = Generator::new(ctx)
            .benchmark(Duration::from_secs(10))
            .unwrap();

        assert_eq!(2, report.threads);
        assert!((report.hashes_per_thread - report.hashes_per_second / 2.).abs() < f64::EPSILON);
    }
}
