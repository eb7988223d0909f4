// Tue Jan 13 2026 - Alex

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Panicked,
}

/// Hooks a `WorkerPool` reports its lifecycle through. Every method has a
/// no-op default so observers only implement what they track.
pub trait PoolObserver: Send + Sync {
    fn worker_started(&self, _pool: &str) {}
    fn worker_stopped(&self, _pool: &str) {}
    fn task_submitted(&self, _pool: &str) {}
    fn task_started(&self, _pool: &str) {}
    fn task_finished(&self, _pool: &str, _outcome: TaskOutcome) {}
}

pub struct NoopObserver;

impl PoolObserver for NoopObserver {}

pub struct LogObserver;

impl PoolObserver for LogObserver {
    fn worker_started(&self, pool: &str) {
        log::trace!("[{}] worker started", pool);
    }

    fn worker_stopped(&self, pool: &str) {
        log::trace!("[{}] worker stopped", pool);
    }

    fn task_finished(&self, pool: &str, outcome: TaskOutcome) {
        if outcome == TaskOutcome::Panicked {
            log::error!("[{}] task panicked", pool);
        }
    }
}

/// Counters shared by every pool the observer is handed to.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    running_workers: AtomicI64,
    busy_workers: AtomicI64,
    submitted: AtomicU64,
    started: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub running_workers: i64,
    pub idle_workers: i64,
    pub submitted: u64,
    pub waiting: u64,
    pub successful: u64,
    pub failed: u64,
    pub completed: u64,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let running = self.running_workers.load(Ordering::SeqCst);
        let busy = self.busy_workers.load(Ordering::SeqCst);
        let submitted = self.submitted.load(Ordering::SeqCst);
        let started = self.started.load(Ordering::SeqCst);
        let successful = self.successful.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);

        MetricsSnapshot {
            running_workers: running,
            idle_workers: (running - busy).max(0),
            submitted,
            waiting: submitted.saturating_sub(started),
            successful,
            failed,
            completed: successful + failed,
        }
    }
}

impl PoolObserver for PoolMetrics {
    fn worker_started(&self, _pool: &str) {
        self.running_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn worker_stopped(&self, _pool: &str) {
        self.running_workers.fetch_sub(1, Ordering::SeqCst);
    }

    fn task_submitted(&self, _pool: &str) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
    }

    fn task_started(&self, _pool: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.busy_workers.fetch_add(1, Ordering::SeqCst);
    }

    fn task_finished(&self, _pool: &str, outcome: TaskOutcome) {
        self.busy_workers.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            TaskOutcome::Completed => self.successful.fetch_add(1, Ordering::SeqCst),
            TaskOutcome::Panicked => self.failed.fetch_add(1, Ordering::SeqCst),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_math() {
        let metrics = PoolMetrics::new();

        metrics.worker_started("p");
        metrics.worker_started("p");
        metrics.task_submitted("p");
        metrics.task_submitted("p");
        metrics.task_submitted("p");
        metrics.task_started("p");

        let snap = metrics.snapshot();
        assert_eq!(snap.running_workers, 2);
        assert_eq!(snap.idle_workers, 1);
        assert_eq!(snap.waiting, 2);

        metrics.task_finished("p", TaskOutcome::Panicked);
        let snap = metrics.snapshot();
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.idle_workers, 2);
    }
}
