//! Per-key accumulation of raw sightings.
//!
//! The fold phase: every sighting lands in exactly one accumulator, looked up
//! by its author key. Name votes, avatar candidates and metadata freshness
//! are gathered here; picking winners is deferred to the entry builder.

use std::collections::HashMap;

use byline_common::{AuthorCatalogEntry, RawSighting};
use chrono::{DateTime, Utc};

use crate::key::{generate_author_key, normalize_author_name};
use crate::url::normalize_author_url;

/// Bios are display data; anything longer than this is truncated to bound
/// memory and render cost.
pub const BIO_MAX_LEN: usize = 2000;

#[derive(Debug, Clone)]
pub struct NameVote {
    pub name: String,
    pub normalized: String,
    pub count: u32,
}

/// A timestamped avatar (or local avatar path) candidate.
#[derive(Debug, Clone)]
pub struct TimestampedCandidate {
    pub value: String,
    pub seen_at: DateTime<Utc>,
}

/// Mutable per-key aggregate, built during the fold.
///
/// Invariants: `archive_count >= unarchived_count`, `file_paths` and
/// `handles` hold no duplicates, and metadata fields are only overwritten by
/// sightings at least as fresh as `last_metadata_update`.
#[derive(Debug, Clone)]
pub struct AuthorAccumulator {
    pub key: String,
    pub platform: String,
    /// First canonical URL seen for this key; empty for name-based keys.
    pub author_url: String,
    pub name_votes: Vec<NameVote>,
    pub avatar_candidates: Vec<TimestampedCandidate>,
    pub local_avatar_candidates: Vec<TimestampedCandidate>,
    pub handles: Vec<String>,
    pub latest_timestamp: Option<DateTime<Utc>>,
    pub file_paths: Vec<String>,
    pub archive_count: u32,
    pub unarchived_count: u32,
    pub followers: Option<u64>,
    pub posts_count: Option<u64>,
    pub bio: Option<String>,
    pub community: Option<String>,
    pub webtoon_info: Option<serde_json::Value>,
    pub last_metadata_update: Option<DateTime<Utc>>,
}

impl AuthorAccumulator {
    fn new(key: String, platform: String, author_url: String) -> Self {
        Self {
            key,
            platform,
            author_url,
            name_votes: Vec::new(),
            avatar_candidates: Vec::new(),
            local_avatar_candidates: Vec::new(),
            handles: Vec::new(),
            latest_timestamp: None,
            file_paths: Vec::new(),
            archive_count: 0,
            unarchived_count: 0,
            followers: None,
            posts_count: None,
            bio: None,
            community: None,
            webtoon_info: None,
            last_metadata_update: None,
        }
    }
}

/// Fold sightings into the accumulator map.
///
/// Returns the number of sightings that landed in an already-existing
/// accumulator, i.e. fold-level duplicates.
pub fn accumulate_into(
    accumulators: &mut HashMap<String, AuthorAccumulator>,
    sightings: &[RawSighting],
) -> usize {
    let mut folded = 0;
    for sighting in sightings {
        if fold_sighting(accumulators, sighting) {
            folded += 1;
        }
    }
    folded
}

/// Fold a single sighting; returns true if it hit an existing accumulator.
pub(crate) fn fold_sighting(
    accumulators: &mut HashMap<String, AuthorAccumulator>,
    sighting: &RawSighting,
) -> bool {
    let normalized = normalize_author_url(&sighting.author_url, None);
    let key = generate_author_key(&sighting.author_url, &sighting.author_name, &sighting.platform);

    let existing = accumulators.contains_key(&key);
    let acc = accumulators.entry(key.clone()).or_insert_with(|| {
        AuthorAccumulator::new(key, sighting.platform.clone(), normalized.canonical_url.clone())
    });

    acc.archive_count += 1;
    if !sighting.timeline_archived {
        acc.unarchived_count += 1;
    }

    if !acc.file_paths.contains(&sighting.file_path) {
        acc.file_paths.push(sighting.file_path.clone());
    }

    vote_name(acc, &sighting.author_name);

    if let Some(avatar) = &sighting.avatar {
        acc.avatar_candidates.push(TimestampedCandidate {
            value: avatar.clone(),
            seen_at: sighting.archived_at,
        });
    }
    if let Some(local) = &sighting.local_avatar {
        acc.local_avatar_candidates.push(TimestampedCandidate {
            value: local.clone(),
            seen_at: sighting.archived_at,
        });
    }

    let handle = sighting.handle.clone().or(normalized.handle);
    if let Some(handle) = handle {
        if !acc.handles.contains(&handle) {
            acc.handles.push(handle);
        }
    }

    acc.latest_timestamp = acc.latest_timestamp.max(Some(sighting.archived_at));

    merge_metadata(acc, sighting);

    existing
}

fn vote_name(acc: &mut AuthorAccumulator, name: &str) {
    if name.trim().is_empty() {
        return;
    }
    let normalized = normalize_author_name(name);
    match acc.name_votes.iter_mut().find(|v| v.normalized == normalized) {
        Some(vote) => vote.count += 1,
        None => acc.name_votes.push(NameVote {
            name: name.trim().to_string(),
            normalized,
            count: 1,
        }),
    }
}

/// Extended metadata merges additively across time: fields present on a
/// sighting overwrite the stored value only when the sighting's metadata
/// timestamp is at least as fresh; fields absent on the sighting never clear
/// stored values.
fn merge_metadata(acc: &mut AuthorAccumulator, sighting: &RawSighting) {
    let has_metadata = sighting.followers.is_some()
        || sighting.posts_count.is_some()
        || sighting.bio.is_some()
        || sighting.community.is_some()
        || sighting.webtoon_info.is_some();
    if !has_metadata {
        return;
    }

    let meta_time = sighting.last_metadata_update.unwrap_or(sighting.archived_at);
    if let Some(stored) = acc.last_metadata_update {
        if meta_time < stored {
            return;
        }
    }

    if sighting.followers.is_some() {
        acc.followers = sighting.followers;
    }
    if sighting.posts_count.is_some() {
        acc.posts_count = sighting.posts_count;
    }
    if let Some(bio) = &sighting.bio {
        acc.bio = Some(cap_bio(bio));
    }
    if let Some(community) = &sighting.community {
        acc.community = Some(community.clone());
    }
    if let Some(info) = &sighting.webtoon_info {
        acc.webtoon_info = Some(info.clone());
    }
    acc.last_metadata_update = Some(meta_time);
}

fn cap_bio(bio: &str) -> String {
    if bio.chars().count() <= BIO_MAX_LEN {
        bio.to_string()
    } else {
        bio.chars().take(BIO_MAX_LEN).collect()
    }
}

/// Convert a finished catalog entry back into an accumulator, keyed by the
/// key recomputed from the entry's own url/name/platform.
///
/// This is the exact inverse of the fields the entry builder reads, which is
/// what lets `merge` round-trip existing entries through the fold phase.
pub fn entry_to_accumulator(entry: &AuthorCatalogEntry) -> (String, AuthorAccumulator) {
    let key = generate_author_key(&entry.author_url, &entry.author_name, &entry.platform);
    let mut acc = AuthorAccumulator::new(key.clone(), entry.platform.clone(), entry.author_url.clone());

    if !entry.author_name.trim().is_empty() {
        acc.name_votes.push(NameVote {
            name: entry.author_name.clone(),
            normalized: normalize_author_name(&entry.author_name),
            count: 1,
        });
    }

    let seen_at = entry.last_seen_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    if let Some(avatar) = &entry.avatar {
        acc.avatar_candidates.push(TimestampedCandidate {
            value: avatar.clone(),
            seen_at,
        });
    }
    if let Some(local) = &entry.local_avatar {
        acc.local_avatar_candidates.push(TimestampedCandidate {
            value: local.clone(),
            seen_at,
        });
    }
    if let Some(handle) = &entry.handle {
        acc.handles.push(handle.clone());
    }

    acc.latest_timestamp = entry.last_seen_at;
    acc.file_paths = entry.file_paths.clone();
    acc.archive_count = entry.archive_count;
    acc.unarchived_count = entry.unarchived_count;
    acc.followers = entry.followers;
    acc.posts_count = entry.posts_count;
    acc.bio = entry.bio.clone();
    acc.community = entry.community.clone();
    acc.webtoon_info = entry.webtoon_info.clone();
    acc.last_metadata_update = entry.last_seen_at;

    (key, acc)
}
