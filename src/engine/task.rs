// Tue Jan 13 2026 - Alex

use crate::fetch::FetchError;
use rayon::prelude::*;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// One producer message: the fetch outcome for a single parent.
#[derive(Debug)]
pub struct Task<T> {
    pub parent_id: i64,
    pub outcome: Result<T, FetchError>,
}

impl<T> Task<T> {
    pub fn run<F>(parent_id: i64, f: F) -> Self
    where
        F: FnOnce() -> Result<T, FetchError>,
    {
        Self {
            parent_id,
            outcome: f(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Calls `f` for every item on a dedicated rayon pool of `max_workers` threads.
pub fn for_each<T, F>(items: &[T], max_workers: usize, f: F) -> Result<(), ThreadPoolBuildError>
where
    T: Sync,
    F: Fn(&T) + Send + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(max_workers.max(1))
        .thread_name(|i| format!("fetch-{}", i))
        .build()?;

    pool.install(|| items.par_iter().for_each(|item| f(item)));
    Ok(())
}
