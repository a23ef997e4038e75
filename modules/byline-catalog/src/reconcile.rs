//! Subscription reconciliation.
//!
//! After the entry builder has matched subscriptions to real accumulators,
//! every subscription left over still deserves a catalog entry — the user
//! subscribed to an author whose posts have not been archived yet. Those get
//! stub entries synthesized from the subscription record alone.

use std::collections::{HashMap, HashSet};

use byline_common::{AuthorCatalogEntry, SubscriptionRecord};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::entry::is_webtoon;
use crate::key::{key_platform, key_url};
use crate::url::normalize_author_url;

/// One pass of stub emission. Tracks subscription ids already stubbed so a
/// subscription reachable under two keys (a name key and a url key pointing
/// at the same id) produces only one stub.
pub(crate) struct StubPass {
    added: HashSet<String>,
}

impl StubPass {
    pub(crate) fn new() -> Self {
        Self {
            added: HashSet::new(),
        }
    }

    /// Returns a stub entry unless this subscription was matched by the entry
    /// builder or already stubbed in this pass.
    pub(crate) fn consider(
        &mut self,
        key: &str,
        record: &SubscriptionRecord,
        matched: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> Option<AuthorCatalogEntry> {
        if matched.contains(&record.id) {
            return None;
        }
        if !self.added.insert(record.id.clone()) {
            debug!(subscription_id = %record.id, "subscription reachable under multiple keys, stub already emitted");
            return None;
        }
        Some(build_stub(key, record, now))
    }
}

/// Emit stub entries for all unmatched subscriptions, in sorted key order so
/// output is stable across runs.
///
/// Returns the number of stubs appended.
pub fn reconcile_subscriptions(
    entries: &mut Vec<AuthorCatalogEntry>,
    subscriptions: &HashMap<String, SubscriptionRecord>,
    matched: &HashSet<String>,
    now: DateTime<Utc>,
) -> usize {
    let mut pass = StubPass::new();
    let mut added = 0;
    for (key, record) in sorted_subscriptions(subscriptions) {
        if let Some(stub) = pass.consider(key, record, matched, now) {
            entries.push(stub);
            added += 1;
        }
    }
    added
}

pub(crate) fn sorted_subscriptions(
    subscriptions: &HashMap<String, SubscriptionRecord>,
) -> Vec<(&String, &SubscriptionRecord)> {
    let mut pairs: Vec<_> = subscriptions.iter().collect();
    pairs.sort_by_key(|(key, _)| key.as_str());
    pairs
}

/// Synthesize a catalog entry from subscription data alone. Identity fields
/// prefer what the record carries; failing that, the key's URL part is run
/// back through the normalizer to recover a plausible handle.
fn build_stub(key: &str, record: &SubscriptionRecord, now: DateTime<Utc>) -> AuthorCatalogEntry {
    let normalized = key_url(key).map(|url| normalize_author_url(url, None));

    let platform = record
        .platform
        .clone()
        .unwrap_or_else(|| key_platform(key).to_string());
    let author_url = record
        .author_url
        .clone()
        .or_else(|| normalized.as_ref().map(|n| n.canonical_url.clone()))
        .unwrap_or_default();
    let handle = record
        .handle
        .clone()
        .or_else(|| normalized.as_ref().and_then(|n| n.handle.clone()));
    let author_name = record
        .author_name
        .clone()
        .or_else(|| handle.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    AuthorCatalogEntry {
        key: key.to_string(),
        author_name,
        author_url,
        is_webtoon: is_webtoon(&platform, false),
        platform,
        avatar: record.avatar.clone(),
        local_avatar: None,
        handle,
        // No sighting exists to derive a better timestamp from.
        last_seen_at: Some(now),
        last_run_at: record.last_run_at,
        schedule: record.schedule.clone(),
        archive_count: 0,
        unarchived_count: 0,
        subscription_id: Some(record.id.clone()),
        status: record.status,
        file_paths: Vec::new(),
        followers: None,
        posts_count: None,
        bio: record.bio.clone(),
        community: None,
        max_posts_per_run: record.max_posts_per_run,
        platform_options: record.platform_options.clone(),
        webtoon_info: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byline_common::SubscriptionStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn sub(id: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            id: id.to_string(),
            status: SubscriptionStatus::Subscribed,
            schedule: Some("daily".to_string()),
            last_run_at: None,
            max_posts_per_run: None,
            platform_options: None,
            author_name: None,
            author_url: None,
            platform: None,
            handle: None,
            avatar: None,
            bio: None,
        }
    }

    #[test]
    fn unmatched_subscription_becomes_stub() {
        let mut subs = HashMap::new();
        subs.insert("x:https://x.com/karpathy".to_string(), sub("sub-1"));
        let mut entries = Vec::new();
        let added = reconcile_subscriptions(&mut entries, &subs, &HashSet::new(), now());
        assert_eq!(added, 1);
        let stub = &entries[0];
        assert_eq!(stub.subscription_id.as_deref(), Some("sub-1"));
        assert_eq!(stub.archive_count, 0);
        assert!(stub.file_paths.is_empty());
        assert_eq!(stub.last_seen_at, Some(now()));
    }

    #[test]
    fn matched_subscription_is_skipped() {
        let mut subs = HashMap::new();
        subs.insert("x:https://x.com/karpathy".to_string(), sub("sub-1"));
        let matched: HashSet<String> = ["sub-1".to_string()].into();
        let mut entries = Vec::new();
        assert_eq!(reconcile_subscriptions(&mut entries, &subs, &matched, now()), 0);
    }

    #[test]
    fn one_id_under_two_keys_stubs_once() {
        let mut subs = HashMap::new();
        subs.insert("x:https://x.com/karpathy".to_string(), sub("sub-1"));
        subs.insert("x:name:andrej karpathy".to_string(), sub("sub-1"));
        let mut entries = Vec::new();
        assert_eq!(reconcile_subscriptions(&mut entries, &subs, &HashSet::new(), now()), 1);
    }

    #[test]
    fn stub_identity_recovered_from_key_url() {
        let mut subs = HashMap::new();
        subs.insert("x:https://x.com/karpathy".to_string(), sub("sub-1"));
        let mut entries = Vec::new();
        reconcile_subscriptions(&mut entries, &subs, &HashSet::new(), now());
        let stub = &entries[0];
        assert_eq!(stub.platform, "x");
        assert_eq!(stub.author_url, "https://x.com/karpathy");
        assert_eq!(stub.handle.as_deref(), Some("karpathy"));
        assert_eq!(stub.author_name, "karpathy");
    }

    #[test]
    fn stub_prefers_record_identity_fields() {
        let mut record = sub("sub-1");
        record.author_name = Some("Andrej Karpathy".to_string());
        record.avatar = Some("a.png".to_string());
        record.platform = Some("x".to_string());
        let mut subs = HashMap::new();
        subs.insert("x:https://x.com/karpathy".to_string(), record);
        let mut entries = Vec::new();
        reconcile_subscriptions(&mut entries, &subs, &HashSet::new(), now());
        let stub = &entries[0];
        assert_eq!(stub.author_name, "Andrej Karpathy");
        assert_eq!(stub.avatar.as_deref(), Some("a.png"));
    }

    #[test]
    fn name_key_stub_has_no_url() {
        let mut subs = HashMap::new();
        subs.insert("x:name:andrej karpathy".to_string(), sub("sub-2"));
        let mut entries = Vec::new();
        reconcile_subscriptions(&mut entries, &subs, &HashSet::new(), now());
        let stub = &entries[0];
        assert_eq!(stub.author_url, "");
        assert_eq!(stub.author_name, "Unknown");
    }
}
