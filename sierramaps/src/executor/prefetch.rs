//! Cache warming with a sliding window of in-flight tasks.
//!
//! 1. Tiles already on disk are counted and skipped
//! 2. Up to `2 * workers` tasks are submitted up front
//! 3. Each completion submits the next tile until the list is exhausted
//!
//! Cancellation stops further submissions; tasks already queued behind the
//! semaphore come back as cancelled and are counted as skipped.

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::TileExecutor;
use crate::interceptor::Stage;
use crate::provider::HttpClient;

/// Outcome of a prefetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchResult {
    /// Tiles requested.
    pub total: usize,
    /// Tiles found on disk before the run.
    pub already_cached: usize,
    /// Tiles fetched and written during the run.
    pub resolved: usize,
    /// Tiles whose resolution failed.
    pub failed: usize,
    /// Tiles never attempted because of cancellation.
    pub skipped: usize,
    /// Whether the run was cancelled.
    pub was_cancelled: bool,
}

/// Progress snapshot passed to the caller after every completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchProgress {
    /// Tiles finished so far, including those already cached.
    pub done: usize,
    /// Tiles requested.
    pub total: usize,
    /// Failures so far.
    pub failed: usize,
}

impl<C: HttpClient + 'static> TileExecutor<C> {
    /// Warm the cache for `urls`.
    ///
    /// `on_progress` is called once after the cache scan and then after each
    /// completed task. Cancelling `cancellation` (or the executor's root
    /// token) stops the run early.
    pub async fn prefetch<F>(
        &self,
        urls: Vec<String>,
        cancellation: CancellationToken,
        mut on_progress: F,
    ) -> PrefetchResult
    where
        F: FnMut(PrefetchProgress),
    {
        let total = urls.len();
        let (cached, to_fetch): (Vec<String>, Vec<String>) = urls
            .into_iter()
            .partition(|url| self.interceptor.is_cached(url));

        let mut result = PrefetchResult {
            total,
            already_cached: cached.len(),
            ..Default::default()
        };
        on_progress(result.progress());

        if to_fetch.is_empty() {
            return result;
        }

        let window = self.workers * 2;
        let mut pending = FuturesUnordered::new();
        let mut remaining = to_fetch.into_iter();

        for url in remaining.by_ref().take(window) {
            pending.push(self.submit_with(url, cancellation.child_token()).join());
        }
        info!(
            submitted = pending.len(),
            already_cached = result.already_cached,
            total,
            "Prefetch started"
        );

        while let Some(outcome) = pending.next().await {
            match outcome {
                Ok(_) => result.resolved += 1,
                Err(e) if e.stage == Stage::Cancelled => result.skipped += 1,
                Err(e) => {
                    warn!(url = %e.url, stage = %e.stage, reason = %e.reason, "Prefetch failed");
                    result.failed += 1;
                }
            }
            on_progress(result.progress());

            if cancellation.is_cancelled() || self.cancellation.is_cancelled() {
                continue;
            }
            if let Some(url) = remaining.next() {
                pending.push(self.submit_with(url, cancellation.child_token()).join());
            }
        }

        result.skipped += remaining.len();
        result.was_cancelled = cancellation.is_cancelled() || self.cancellation.is_cancelled();

        info!(
            resolved = result.resolved,
            failed = result.failed,
            skipped = result.skipped,
            already_cached = result.already_cached,
            "Prefetch finished"
        );
        result
    }
}

impl PrefetchResult {
    fn progress(&self) -> PrefetchProgress {
        PrefetchProgress {
            done: self.already_cached + self.resolved + self.failed + self.skipped,
            total: self.total,
            failed: self.failed,
        }
    }
}
