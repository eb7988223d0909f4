// Tue Jan 13 2026 - Alex

use crate::config::default_concurrency;
use crate::engine::observer::{NoopObserver, PoolObserver, TaskOutcome};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    thread_handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(
        id: usize,
        pool_name: &str,
        queue: Arc<Mutex<Receiver<Job>>>,
        observer: Arc<dyn PoolObserver>,
    ) -> std::io::Result<Self> {
        let name = pool_name.to_string();

        let handle = thread::Builder::new()
            .name(format!("{}-{}", pool_name, id))
            .spawn(move || Worker::worker_loop(&name, queue, observer))?;

        Ok(Self {
            id,
            thread_handle: Some(handle),
        })
    }

    fn worker_loop(pool_name: &str, queue: Arc<Mutex<Receiver<Job>>>, observer: Arc<dyn PoolObserver>) {
        observer.worker_started(pool_name);

        loop {
            // The guard is released before the job runs.
            let job = queue.lock().recv();

            let Ok(job) = job else {
                break;
            };

            observer.task_started(pool_name);

            let outcome = match panic::catch_unwind(AssertUnwindSafe(job)) {
                Ok(()) => TaskOutcome::Completed,
                Err(payload) => {
                    log::error!("[{}] task panicked: {}", pool_name, panic_message(&*payload));
                    TaskOutcome::Panicked
                }
            };

            observer.task_finished(pool_name, outcome);
        }

        observer.worker_stopped(pool_name);
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("worker {} exited abnormally", self.id);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Fixed-capacity set of worker threads draining an unbounded job queue.
///
/// Workers are started lazily, one per submitted job, until `max_workers`
/// are running. `wait` closes the queue and joins every worker, so it only
/// returns once each submitted job has run to completion. A job that owns a
/// child pool and waits on it keeps its worker busy until that child pool
/// drains, which is what makes nested waits transitive.
pub struct WorkerPool {
    name: String,
    max_workers: usize,
    sender: Option<Sender<Job>>,
    queue: Arc<Mutex<Receiver<Job>>>,
    workers: Vec<Worker>,
    submitted: usize,
    observer: Arc<dyn PoolObserver>,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        Self::named("pool", max_workers)
    }

    pub fn named(name: &str, max_workers: usize) -> Self {
        let (sender, receiver) = channel();

        Self {
            name: name.to_string(),
            max_workers: max_workers.max(1),
            sender: Some(sender),
            queue: Arc::new(Mutex::new(receiver)),
            workers: Vec::new(),
            submitted: 0,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PoolObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn submit<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };

        self.observer.task_submitted(&self.name);
        self.submitted += 1;

        if sender.send(Box::new(task)).is_err() {
            log::error!("[{}] queue closed, task dropped", self.name);
            return;
        }

        if self.workers.len() < self.max_workers && self.workers.len() < self.submitted {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let id = self.workers.len();

        match Worker::spawn(id, &self.name, self.queue.clone(), self.observer.clone()) {
            Ok(worker) => self.workers.push(worker),
            Err(e) => log::error!("[{}] failed to spawn worker {}: {}", self.name, id, e),
        }
    }

    /// Blocks until every submitted task has returned.
    pub fn wait(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender lets workers exit once the queue is empty.
        self.sender.take();

        for worker in &mut self.workers {
            worker.join();
        }

        self.workers.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(default_concurrency())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
