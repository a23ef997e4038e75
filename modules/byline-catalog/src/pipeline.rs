//! Synchronous deduplication pipeline.
//!
//! `deduplicate` starts from raw sightings alone; `merge` seeds the fold with
//! an existing catalog first, so a rebuild over new sightings preserves what
//! earlier runs already resolved. Both share the same finishing stages.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use byline_common::{AuthorCatalogEntry, DeduplicationResult, RawSighting, SubscriptionRecord};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::accumulate::{accumulate_into, entry_to_accumulator, AuthorAccumulator};
use crate::entry::build_entry;
use crate::merge::merge_name_and_url_entries;
use crate::reconcile::reconcile_subscriptions;

/// Deduplicate raw sightings into one catalog entry per author.
pub fn deduplicate(
    sightings: &[RawSighting],
    subscriptions: &HashMap<String, SubscriptionRecord>,
) -> DeduplicationResult {
    let started = Instant::now();
    let mut accumulators = HashMap::new();
    let folded = accumulate_into(&mut accumulators, sightings);
    finish(accumulators, sightings.len(), folded, subscriptions, started)
}

/// Deduplicate new sightings on top of an existing catalog.
///
/// Existing entries are converted back into accumulators first, so a new
/// sighting for a known author folds into the entry instead of duplicating
/// it. Entries untouched by any sighting pass through unchanged.
pub fn merge(
    existing: &[AuthorCatalogEntry],
    sightings: &[RawSighting],
    subscriptions: &HashMap<String, SubscriptionRecord>,
) -> DeduplicationResult {
    let started = Instant::now();
    let mut accumulators = HashMap::new();
    for entry in existing {
        let (key, acc) = entry_to_accumulator(entry);
        accumulators.insert(key, acc);
    }
    let folded = accumulate_into(&mut accumulators, sightings);
    finish(accumulators, sightings.len(), folded, subscriptions, started)
}

/// Shared back half: build entries in sorted key order, stub unmatched
/// subscriptions, fold split name/url identities, sort by recency.
fn finish(
    accumulators: HashMap<String, AuthorAccumulator>,
    total_processed: usize,
    folded: usize,
    subscriptions: &HashMap<String, SubscriptionRecord>,
    started: Instant,
) -> DeduplicationResult {
    let now = Utc::now();

    let mut keys: Vec<&String> = accumulators.keys().collect();
    keys.sort();

    let mut entries = Vec::with_capacity(keys.len());
    let mut matched: HashSet<String> = HashSet::new();
    for key in keys {
        let entry = build_entry(&accumulators[key], subscriptions);
        if let Some(id) = &entry.subscription_id {
            matched.insert(id.clone());
        }
        entries.push(entry);
    }

    let stubbed = reconcile_subscriptions(&mut entries, subscriptions, &matched, now);
    debug!(stubbed, "subscription reconciliation complete");

    let (mut entries, identity_merged) = merge_name_and_url_entries(entries);
    sort_by_recency(&mut entries);

    let duplicates_merged = folded + identity_merged;
    info!(
        authors = entries.len(),
        total_processed,
        duplicates_merged,
        "deduplication complete"
    );

    DeduplicationResult {
        authors: entries,
        total_processed,
        duplicates_merged,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

/// Most recently seen first. Entries without a timestamp sort as the epoch,
/// i.e. last; the sort is stable so equal timestamps keep key order.
pub(crate) fn sort_by_recency(entries: &mut [AuthorCatalogEntry]) {
    entries.sort_by_key(|e| {
        std::cmp::Reverse(e.last_seen_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    });
}
