//! Cooperative chunked variant of the pipeline.
//!
//! Same stages as [`crate::pipeline`], but the three heavy loops (fold, entry
//! build, subscription reconciliation) run in fixed-size chunks and suspend
//! between chunks so a host UI thread stays responsive over tens of thousands
//! of sightings. The host supplies the suspension primitive; every suspend is
//! wrapped in a timeout so a host whose frame callback never fires cannot
//! deadlock the run.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use byline_common::{BylineError, DeduplicationResult, RawSighting, SubscriptionRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accumulate::{fold_sighting, AuthorAccumulator};
use crate::entry::build_entry;
use crate::merge::merge_name_and_url_entries;
use crate::pipeline::sort_by_recency;
use crate::reconcile::{sorted_subscriptions, StubPass};

/// Host-supplied suspension point. `suspend` resolves when the host is ready
/// for the engine to continue, e.g. after the next paint.
#[async_trait]
pub trait YieldPoint: Send + Sync {
    async fn suspend(&self);
}

/// Plain-timer yielder for hosts without a frame callback. A zero delay is a
/// bare scheduler yield.
pub struct TimerYield {
    delay: Duration,
}

impl TimerYield {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for TimerYield {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl YieldPoint for TimerYield {
    async fn suspend(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Pipeline stage, reported through the progress callback in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Accumulate,
    Finalize,
    Subscriptions,
    Merge,
    Sort,
}

/// Chunk sizes and the yield-timeout bound.
#[derive(Debug, Clone)]
pub struct ChunkedOptions {
    /// Sightings folded between suspends.
    pub accumulate_chunk_size: usize,
    /// Accumulators turned into entries between suspends.
    pub finalize_chunk_size: usize,
    /// Subscription records reconciled between suspends.
    pub subscription_chunk_size: usize,
    /// Upper bound on any single suspend; the run resumes when it elapses
    /// even if the host never completes the yield.
    pub yield_fallback: Duration,
}

impl Default for ChunkedOptions {
    fn default() -> Self {
        Self {
            accumulate_chunk_size: 2000,
            finalize_chunk_size: 500,
            subscription_chunk_size: 500,
            yield_fallback: Duration::from_millis(100),
        }
    }
}

impl ChunkedOptions {
    pub fn validate(&self) -> Result<(), BylineError> {
        if self.accumulate_chunk_size == 0
            || self.finalize_chunk_size == 0
            || self.subscription_chunk_size == 0
        {
            return Err(BylineError::Config(
                "chunk sizes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Synchronous progress callback; invoked from inside the loops and must not
/// block or suspend.
pub type ProgressFn<'a> = dyn FnMut(Stage, usize, usize) + Send + 'a;

/// Chunked, cooperatively yielding deduplication.
///
/// Produces the same result as [`crate::pipeline::deduplicate`] over the same
/// input; only the scheduling differs.
pub async fn deduplicate_chunked(
    sightings: &[RawSighting],
    subscriptions: &HashMap<String, SubscriptionRecord>,
    yielder: &dyn YieldPoint,
    options: &ChunkedOptions,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<DeduplicationResult, BylineError> {
    options.validate()?;
    let started = Instant::now();
    let now = Utc::now();

    // Stage 1: fold sightings, yielding between chunks.
    let mut accumulators: HashMap<String, AuthorAccumulator> = HashMap::new();
    let mut folded = 0;
    let mut done = 0;
    for chunk in sightings.chunks(options.accumulate_chunk_size) {
        for sighting in chunk {
            if fold_sighting(&mut accumulators, sighting) {
                folded += 1;
            }
        }
        done += chunk.len();
        notify(&mut progress, Stage::Accumulate, done, sightings.len());
        if done < sightings.len() {
            pause(yielder, options.yield_fallback).await;
        }
    }

    // Stage 2: build entries over sorted keys.
    let mut keys: Vec<&String> = accumulators.keys().collect();
    keys.sort();
    let total = keys.len();
    let mut entries = Vec::with_capacity(total);
    let mut matched: HashSet<String> = HashSet::new();
    let mut done = 0;
    for chunk in keys.chunks(options.finalize_chunk_size) {
        for key in chunk {
            let entry = build_entry(&accumulators[*key], subscriptions);
            if let Some(id) = &entry.subscription_id {
                matched.insert(id.clone());
            }
            entries.push(entry);
        }
        done += chunk.len();
        notify(&mut progress, Stage::Finalize, done, total);
        if done < total {
            pause(yielder, options.yield_fallback).await;
        }
    }

    // Stage 3: stub out unmatched subscriptions.
    let sorted = sorted_subscriptions(subscriptions);
    let total = sorted.len();
    let mut pass = StubPass::new();
    let mut done = 0;
    for chunk in sorted.chunks(options.subscription_chunk_size) {
        for (key, record) in chunk {
            if let Some(stub) = pass.consider(key, record, &matched, now) {
                entries.push(stub);
            }
        }
        done += chunk.len();
        notify(&mut progress, Stage::Subscriptions, done, total);
        if done < total {
            pause(yielder, options.yield_fallback).await;
        }
    }

    // Stages 4 and 5 are cheap enough to run unchunked.
    notify(&mut progress, Stage::Merge, 0, 1);
    let (mut entries, identity_merged) = merge_name_and_url_entries(entries);
    notify(&mut progress, Stage::Merge, 1, 1);

    notify(&mut progress, Stage::Sort, 0, 1);
    sort_by_recency(&mut entries);
    notify(&mut progress, Stage::Sort, 1, 1);

    let duplicates_merged = folded + identity_merged;
    info!(
        authors = entries.len(),
        total_processed = sightings.len(),
        duplicates_merged,
        "chunked deduplication complete"
    );

    Ok(DeduplicationResult {
        authors: entries,
        total_processed: sightings.len(),
        duplicates_merged,
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

/// Suspend through the host's yield point, bounded by the fallback timeout.
async fn pause(yielder: &dyn YieldPoint, fallback: Duration) {
    if tokio::time::timeout(fallback, yielder.suspend()).await.is_err() {
        debug!("yield point did not resolve before fallback, resuming");
    }
}

fn notify(progress: &mut Option<&mut ProgressFn<'_>>, stage: Stage, done: usize, total: usize) {
    if let Some(cb) = progress {
        cb(stage, done, total);
    }
}
