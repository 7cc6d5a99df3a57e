// =============================================================================
// Fetch Queue — serialises upstream quote fetches with a minimum spacing
// =============================================================================
//
// Upstream market-data APIs throttle aggressively.  Every fetch goes through
// one `FetchQueue` instance, which runs tasks strictly one at a time and
// waits until `min_interval` has passed since the previous task started.
//
// The queue is an explicit object handed to whoever fetches; there is no
// process-wide instance.  Counters are atomics so any thread may read a
// snapshot lock-free.
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

pub struct FetchQueue {
    min_interval: Duration,
    /// Start time of the most recent task; holding the lock is the turn.
    last_start: Mutex<Option<Instant>>,
    completed: AtomicU64,
    total_wait_ms: AtomicU64,
}

/// Serialisable view of the queue counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQueueSnapshot {
    pub min_interval_ms: u64,
    pub completed: u64,
    pub total_wait_ms: u64,
}

impl FetchQueue {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
            completed: AtomicU64::new(0),
            total_wait_ms: AtomicU64::new(0),
        }
    }

    pub fn from_millis(min_interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_interval_ms))
    }

    /// Run `task` once every earlier task has finished and the spacing since
    /// the previous start has elapsed.
    pub async fn run<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_start = self.last_start.lock().await;

        if let Some(prev) = *last_start {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "fetch queue spacing");
                tokio::time::sleep(wait).await;
                self.total_wait_ms
                    .fetch_add(wait.as_millis() as u64, Ordering::Relaxed);
            }
        }

        *last_start = Some(Instant::now());
        let output = task().await;
        self.completed.fetch_add(1, Ordering::Relaxed);
        output
    }

    pub fn snapshot(&self) -> FetchQueueSnapshot {
        FetchQueueSnapshot {
            min_interval_ms: self.min_interval.as_millis() as u64,
            completed: self.completed.load(Ordering::Relaxed),
            total_wait_ms: self.total_wait_ms.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for FetchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchQueue")
            .field("min_interval", &self.min_interval)
            .field("completed", &self.completed.load(Ordering::Relaxed))
            .field("total_wait_ms", &self.total_wait_ms.load(Ordering::Relaxed))
            .finish()
    }
}
