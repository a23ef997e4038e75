//! Shared data model for the author catalog pipeline.
//!
//! These records cross the boundary between the vault scanner (which produces
//! sightings), the subscription client (which produces subscription records)
//! and the catalog UI (which consumes finished entries), so every field uses
//! the camelCase wire names the host expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of an author, derived from a single archived post.
///
/// Produced by the vault scanner. `author_url` may be empty — some archived
/// posts only carry a display name. `platform` is an opaque tag supplied by
/// the scraper that produced the post; the pipeline never re-derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSighting {
    pub file_path: String,
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    pub platform: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub local_avatar: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    pub archived_at: DateTime<Utc>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub posts_count: Option<u64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub last_metadata_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub webtoon_info: Option<serde_json::Value>,
    /// Whether the post behind this sighting has already been pulled into the
    /// timeline archive. Sightings without the flag count as unarchived.
    #[serde(default)]
    pub timeline_archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    NotSubscribed,
    Subscribed,
    Paused,
}

/// A subscription as reported by the subscription client, keyed externally by
/// the same author key scheme the pipeline uses.
///
/// The identity fields are optional: a subscription created straight from a
/// URL may carry nothing beyond its id and schedule, in which case the
/// reconciler recovers a handle from the key itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: String,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_posts_per_run: Option<u32>,
    /// Platform-specific option bag, passed through untouched.
    #[serde(default)]
    pub platform_options: Option<serde_json::Value>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A resolved author: one entry per deduplication key, plus stubs for
/// subscriptions that have no vault sightings.
///
/// `key` is the identity the entry was built under. URL-keyed entries look
/// like `"{platform}:{canonical_url}"`, name-keyed fallbacks like
/// `"{platform}:name:{normalized_name}"`. `last_seen_at` is `None` when the
/// original timestamp could not be parsed; the pipeline sorts those as epoch
/// zero rather than letting them float.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCatalogEntry {
    pub key: String,
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    pub platform: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub local_avatar: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub schedule: Option<String>,
    pub archive_count: u32,
    pub unarchived_count: u32,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub file_paths: Vec<String>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub posts_count: Option<u64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub max_posts_per_run: Option<u32>,
    #[serde(default)]
    pub platform_options: Option<serde_json::Value>,
    #[serde(default)]
    pub is_webtoon: bool,
    #[serde(default)]
    pub webtoon_info: Option<serde_json::Value>,
}

/// What a deduplication run returns to the catalog UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationResult {
    pub authors: Vec<AuthorCatalogEntry>,
    /// Number of sightings fed into this run.
    pub total_processed: usize,
    /// Sightings folded into an already-seen key, plus name→url identity
    /// merges performed in the second pass.
    pub duplicates_merged: usize,
    pub duration_ms: u64,
}
