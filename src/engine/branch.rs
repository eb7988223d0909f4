// Tue Jan 13 2026 - Alex

use crate::config::default_concurrency;
use crate::engine::errors::{EngineError, ErrorAggregator};
use crate::engine::observer::{NoopObserver, PoolObserver};
use crate::engine::task::{self, Task};
use crate::engine::worker::WorkerPool;
use crate::fetch::{FetchError, ResourceKind};
use std::sync::mpsc::{channel, sync_channel};
use std::sync::Arc;

/// One consumer and one producer. The consumer blocks on the channel, so the
/// branch pool must never be smaller than this.
pub const BRANCH_POOL_WORKERS: usize = 2;

/// Resolves one resource kind across a set of parents.
///
/// A producer fetches every parent on its own bounded pool and pushes exactly
/// one `Task` per parent into a channel sized to the parent count, so it never
/// blocks. A consumer drains exactly that many messages, flattening the
/// successful collections and recording each failure in the shared
/// `ErrorAggregator` without stopping. `run` returns once both are done.
pub struct Branch {
    kind: ResourceKind,
    fetch_concurrency: usize,
    errors: Arc<ErrorAggregator>,
    observer: Arc<dyn PoolObserver>,
}

impl Branch {
    pub fn new(kind: ResourceKind, errors: Arc<ErrorAggregator>) -> Self {
        Self {
            kind,
            fetch_concurrency: default_concurrency(),
            errors,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PoolObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn run<T, F>(&self, parents: Vec<i64>, fetch: F) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(i64) -> Result<Vec<T>, FetchError> + Send + Sync + 'static,
    {
        if parents.is_empty() {
            return Vec::new();
        }

        let kind = self.kind;
        let expected = parents.len();
        log::debug!("[{}] fanning out over {} parents", kind, expected);

        let (task_tx, task_rx) = sync_channel::<Task<Vec<T>>>(expected);
        let (done_tx, done_rx) = channel::<Vec<T>>();

        let mut pool = WorkerPool::named(&format!("{}-branch", kind), BRANCH_POOL_WORKERS)
            .with_observer(self.observer.clone());

        let errors = self.errors.clone();
        pool.submit(move || {
            let mut collected = Vec::new();

            for _ in 0..expected {
                let Ok(task) = task_rx.recv() else {
                    errors.append(EngineError::ProducerLost { kind });
                    break;
                };

                match task.outcome {
                    Ok(items) => collected.extend(items),
                    Err(source) => {
                        log::warn!("[{}] fetch for {} failed: {}", kind, task.parent_id, source);
                        errors.append(EngineError::Fetch {
                            kind,
                            parent_id: task.parent_id,
                            source,
                        });
                    }
                }
            }

            let _ = done_tx.send(collected);
        });

        let errors = self.errors.clone();
        let concurrency = self.fetch_concurrency;
        pool.submit(move || {
            let produced = task::for_each(&parents, concurrency, |&parent_id| {
                let _ = task_tx.send(Task::run(parent_id, || fetch(parent_id)));
            });

            if let Err(e) = produced {
                errors.append(EngineError::PoolBuild {
                    kind,
                    message: e.to_string(),
                });
            }
        });

        pool.wait();

        match done_rx.recv() {
            Ok(items) => {
                log::debug!("[{}] collected {} items", kind, items.len());
                items
            }
            Err(_) => {
                self.errors.append(EngineError::ConsumerLost { kind });
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::observer::PoolMetrics;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn branch(errors: &Arc<ErrorAggregator>) -> Branch {
        Branch::new(ResourceKind::Posts, errors.clone()).with_concurrency(4)
    }

    #[test]
    fn test_flattens_every_parent() {
        let errors = Arc::new(ErrorAggregator::new());
        let mut items = branch(&errors).run((1..=5).collect(), |id| Ok(vec![id; id as usize]));

        items.sort();
        assert_eq!(items.len(), 15);
        assert_eq!(items.iter().sum::<i64>(), 1 + 4 + 9 + 16 + 25);
        assert!(errors.collect().is_ok());
    }

    #[test]
    fn test_empty_collection_still_counts_as_message() {
        let errors = Arc::new(ErrorAggregator::new());
        let items: Vec<i64> = branch(&errors).run(vec![1, 2, 3], |id| {
            if id == 2 { Ok(Vec::new()) } else { Ok(vec![id]) }
        });

        assert_eq!(items.len(), 2);
        assert!(errors.collect().is_ok());
    }

    #[test]
    fn test_failures_do_not_stop_siblings() {
        let errors = Arc::new(ErrorAggregator::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();

        let items = branch(&errors).run((1..=6).collect(), move |id| {
            counted.fetch_add(1, Ordering::SeqCst);
            if id % 2 == 0 {
                Err(FetchError::Unavailable(format!("post {}", id)))
            } else {
                Ok(vec![id])
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(items.len(), 3);

        let err = errors.collect().unwrap_err();
        assert_eq!(err.len(), 3);
        assert!(err.errors().iter().all(|e| matches!(e, EngineError::Fetch { kind: ResourceKind::Posts, .. })));
    }

    #[test]
    fn test_no_parents_skips_pool() {
        let errors = Arc::new(ErrorAggregator::new());
        let metrics = Arc::new(PoolMetrics::new());

        let items: Vec<i64> = branch(&errors)
            .with_observer(metrics.clone())
            .run(Vec::new(), |_| panic!("never called"));

        assert!(items.is_empty());
        assert_eq!(metrics.snapshot().submitted, 0);
    }

    #[test]
    fn test_fetches_run_concurrently() {
        let errors = Arc::new(ErrorAggregator::new());
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (r, p) = (running.clone(), peak.clone());

        branch(&errors).run((0..8).collect(), move |id| {
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            r.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![id])
        });

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak > 1, "expected overlapping fetches, peak was {}", peak);
        assert!(peak <= 4);
    }

    #[test]
    fn test_panicking_fetch_is_recorded() {
        let errors = Arc::new(ErrorAggregator::new());
        let items: Vec<i64> = branch(&errors).run(vec![1, 2], |id| {
            if id == 2 {
                panic!("fetcher blew up");
            }
            Ok(vec![id])
        });

        assert!(items.len() <= 1);
        let err = errors.collect().unwrap_err();
        assert!(err.errors().iter().any(|e| matches!(e, EngineError::ProducerLost { .. })));
    }
}
