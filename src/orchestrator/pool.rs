//! Bounded worker pool over variants: suspension only
//! happens at blocking file I/O inside each variant's own closure, never
//! across variants. With the `parallel` feature this runs on a scoped
//! rayon thread pool capped at `max_concurrency`; without it, variants run
//! sequentially on the calling thread — same results, no parallelism.

use crate::error::Result;

/// Runs `work(i)` for `i in 0..count`, at most `max_concurrency` at once,
/// collecting every result (a failing variant doesn't stop the others).
pub fn run_variants<F>(count: usize, max_concurrency: usize, work: F) -> Vec<Result<()>>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_concurrency.max(1))
            .build()
            .expect("failed to build variant worker pool");
        pool.install(|| {
            use rayon::prelude::*;
            (0..count).into_par_iter().map(|i| work(i)).collect()
        })
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = max_concurrency;
        (0..count).map(|i| work(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_index_exactly_once() {
        let seen = AtomicUsize::new(0);
        let results = run_variants(8, 4, |_i| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(seen.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn one_failure_does_not_stop_the_others() {
        let results = run_variants(4, 2, |i| {
            if i == 2 {
                Err(crate::error::ReleaseError::ConfigInvalid("boom".to_string()))
            } else {
                Ok(())
            }
        });
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }
}
