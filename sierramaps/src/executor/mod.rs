//! Bounded background execution of tile resolutions.
//!
//! The interceptor itself is blocking. This module runs it off the async
//! runtime with:
//! - A semaphore bounding how many resolutions are in flight
//! - `spawn_blocking` for the disk and network work
//! - A [`CancellationToken`] per task, derived from the executor's root token
//!
//! A task cancelled before it acquires a permit never touches disk or
//! network. A task already inside `resolve` runs to completion.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sierramaps::executor::TileExecutor;
//!
//! let executor = TileExecutor::new(Arc::new(interceptor), 8);
//! let task = executor.submit(url);
//! let png = task.join().await?;
//! ```

mod prefetch;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::interceptor::{Stage, TileInterceptor, TileUnavailable};
use crate::provider::HttpClient;

pub use prefetch::{PrefetchProgress, PrefetchResult};

/// Upper bound for the default worker count.
pub const MAX_DEFAULT_WORKERS: usize = 32;

/// Default worker count: `min(num_cpus * 4, 32)`.
///
/// Tile resolution is network-bound, so over-subscribing cores is cheap.
pub fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4);
    (cpus * 4).min(MAX_DEFAULT_WORKERS)
}

/// Runs tile resolutions on a bounded pool.
pub struct TileExecutor<C> {
    interceptor: Arc<TileInterceptor<C>>,
    permits: Arc<Semaphore>,
    workers: usize,
    cancellation: CancellationToken,
}

/// Handle to one submitted resolution.
pub struct TileTask {
    url: String,
    handle: JoinHandle<Result<Vec<u8>, TileUnavailable>>,
    cancellation: CancellationToken,
}

impl<C: HttpClient + 'static> TileExecutor<C> {
    /// Create an executor allowing `workers` concurrent resolutions.
    ///
    /// A worker count of zero is raised to one.
    pub fn new(interceptor: Arc<TileInterceptor<C>>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            interceptor,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            cancellation: CancellationToken::new(),
        }
    }

    /// Maximum concurrent resolutions.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The interceptor tasks run against.
    pub fn interceptor(&self) -> &Arc<TileInterceptor<C>> {
        &self.interceptor
    }

    /// Root token; cancelling it cancels every task not yet started.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancel all pending work. The executor accepts no new work afterwards.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Submit `url` for background resolution.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, url: impl Into<String>) -> TileTask {
        self.submit_with(url.into(), self.cancellation.child_token())
    }

    /// Resolve `url` on the pool and wait for the result.
    pub async fn resolve(&self, url: impl Into<String>) -> Result<Vec<u8>, TileUnavailable> {
        self.submit(url).join().await
    }

    fn submit_with(&self, url: String, cancellation: CancellationToken) -> TileTask {
        let interceptor = Arc::clone(&self.interceptor);
        let permits = Arc::clone(&self.permits);
        let token = cancellation.clone();
        let root = self.cancellation.clone();
        let task_url = url.clone();

        let handle = tokio::spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                _ = root.cancelled() => None,
                permit = permits.acquire_owned() => permit.ok(),
            };
            let permit = match permit {
                Some(permit) if !token.is_cancelled() && !root.is_cancelled() => permit,
                _ => {
                    debug!(url = %task_url, "Tile task cancelled before start");
                    return Err(TileUnavailable::new(
                        &task_url,
                        Stage::Cancelled,
                        "cancelled before start",
                    ));
                }
            };

            let blocking_url = task_url.clone();
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                interceptor.resolve(&blocking_url)
            })
            .await
            .map_err(|e| join_failure(&task_url, e))?
        });

        TileTask {
            url,
            handle,
            cancellation,
        }
    }
}

impl TileTask {
    /// The URL being resolved.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cancel this task if it has not started resolving yet.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Wait for the task's result.
    pub async fn join(self) -> Result<Vec<u8>, TileUnavailable> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(join_failure(&self.url, e)),
        }
    }
}

fn join_failure(url: &str, e: JoinError) -> TileUnavailable {
    let stage = if e.is_panic() {
        Stage::Panicked
    } else {
        Stage::Cancelled
    };
    TileUnavailable::new(url, stage, e)
}
