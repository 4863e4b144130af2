//! Fixed-width worker pool for blocking text-generation calls
//!
//! Generation latency ranges from seconds to tens of seconds. Running those calls on dedicated
//! OS threads keeps them from occupying async runtime workers that serve synthesis requests;
//! worst-case interference is bounded by the pool width.
//!
//! When all workers are busy, further jobs queue without limit. Callers bound their own wait
//! with a deadline on the returned receiver.
//!
//! Known limitation: a job whose caller has given up keeps running to completion, because the
//! underlying call cannot be aborted. Under a sustained run of timeouts the pool can be fully
//! occupied by abandoned jobs; `GeminiBackend` bounds each call with an HTTP client timeout,
//! which caps how long that lasts.

use crossbeam::channel::{unbounded, Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Snapshot of pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub busy: usize,
    pub queued: usize,
}

pub struct WorkerPool {
    sender: Sender<Job>,
    workers: usize,
    busy: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawn `size` named worker threads (at least one).
    pub fn new(name: &str, size: usize) -> crate::Result<Self> {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let busy = Arc::new(AtomicUsize::new(0));

        for idx in 0..size {
            let rx: Receiver<Job> = receiver.clone();
            let busy = Arc::clone(&busy);
            std::thread::Builder::new()
                .name(format!("{name}-{idx}"))
                .spawn(move || worker_loop(rx, busy))?;
        }
        debug!(target: "narration", pool = name, workers = size, "Worker pool started");

        Ok(Self {
            sender,
            workers: size,
            busy,
        })
    }

    /// Queue `job` and return a receiver for its result.
    ///
    /// The receiver reports an error if the job panicked or could not be queued.
    pub fn submit<F, T>(&self, job: F) -> oneshot::Receiver<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task: Job = Box::new(move || {
            // Caller may have timed out and dropped the receiver.
            let _ = tx.send(job());
        });
        if self.sender.send(task).is_err() {
            warn!(target: "narration", "Worker pool is shut down; job dropped");
        }
        rx
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.workers,
            busy: self.busy.load(Ordering::SeqCst),
            queued: self.sender.len(),
        }
    }
}

fn worker_loop(rx: Receiver<Job>, busy: Arc<AtomicUsize>) {
    // Exits once every sender (the pool) is dropped and the queue is drained.
    while let Ok(job) = rx.recv() {
        busy.fetch_add(1, Ordering::SeqCst);
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(target: "narration", "Worker job panicked");
        }
        busy.fetch_sub(1, Ordering::SeqCst);
    }
}
