//! Second-pass identity merge.
//!
//! Posts that carried no author URL key by name, so the same real author can
//! end up split across a name-keyed entry and a URL-keyed entry. This pass
//! folds every name-keyed entry into a URL-keyed entry on the same platform
//! with the same normalized name, when one exists.

use std::collections::HashMap;

use byline_common::AuthorCatalogEntry;
use tracing::debug;

use crate::key::{is_name_key, normalize_author_name};

/// How much identity data an entry carries: one point each for avatar, local
/// avatar, followers, bio and handle.
///
/// This is a documented contract, not an implementation detail — it decides
/// which URL-keyed entry absorbs a name-keyed twin when several share a
/// (platform, name) pair. Ties keep the earlier entry.
pub fn richness_score(entry: &AuthorCatalogEntry) -> u32 {
    let mut score = 0;
    if entry.avatar.is_some() {
        score += 1;
    }
    if entry.local_avatar.is_some() {
        score += 1;
    }
    if entry.followers.is_some() {
        score += 1;
    }
    if entry.bio.is_some() {
        score += 1;
    }
    if entry.handle.is_some() {
        score += 1;
    }
    score
}

/// Merge name-keyed entries into URL-keyed entries for the same author.
///
/// Returns the surviving entries (URL-keyed first, then unconsumed name-keyed
/// ones) and the number of merges performed.
pub fn merge_name_and_url_entries(
    entries: Vec<AuthorCatalogEntry>,
) -> (Vec<AuthorCatalogEntry>, usize) {
    let (mut url_based, name_based): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| !is_name_key(&e.key));
    if name_based.is_empty() {
        return (url_based, 0);
    }

    // (platform, normalized name) -> index of the richest url-based entry.
    let mut lookup: HashMap<(String, String), usize> = HashMap::new();
    for (i, entry) in url_based.iter().enumerate() {
        let id = (entry.platform.clone(), normalize_author_name(&entry.author_name));
        match lookup.get(&id) {
            Some(&existing) if richness_score(&url_based[existing]) >= richness_score(entry) => {}
            _ => {
                lookup.insert(id, i);
            }
        }
    }

    let mut merged = 0;
    let mut kept = Vec::new();
    for source in name_based {
        let id = (source.platform.clone(), normalize_author_name(&source.author_name));
        match lookup.get(&id) {
            Some(&target) => {
                debug!(
                    name = %source.author_name,
                    platform = %source.platform,
                    into = %url_based[target].key,
                    "identity merge: folding name-keyed entry into url-keyed entry"
                );
                absorb(&mut url_based[target], source);
                merged += 1;
            }
            None => kept.push(source),
        }
    }

    url_based.extend(kept);
    (url_based, merged)
}

/// Fold `source` into `target`. The target's identity always wins; source
/// values only fill holes.
fn absorb(target: &mut AuthorCatalogEntry, source: AuthorCatalogEntry) {
    target.archive_count += source.archive_count;
    target.unarchived_count += source.unarchived_count;

    for path in source.file_paths {
        if !target.file_paths.contains(&path) {
            target.file_paths.push(path);
        }
    }

    target.last_seen_at = target.last_seen_at.max(source.last_seen_at);

    if target.avatar.is_none() {
        target.avatar = source.avatar;
    }
    if target.local_avatar.is_none() {
        target.local_avatar = source.local_avatar;
    }
    if target.followers.is_none() {
        target.followers = source.followers;
    }
    if target.posts_count.is_none() {
        target.posts_count = source.posts_count;
    }
    if target.bio.is_none() {
        target.bio = source.bio;
    }
    if target.handle.is_none() {
        target.handle = source.handle;
    }
    if target.subscription_id.is_none() {
        if let Some(id) = source.subscription_id {
            target.subscription_id = Some(id);
            target.status = source.status;
        }
    }
    if target.webtoon_info.is_none() {
        target.webtoon_info = source.webtoon_info;
    }
    target.is_webtoon = target.is_webtoon || source.is_webtoon;
}
