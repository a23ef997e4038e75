//! Turning accumulators into catalog entries.

use std::collections::HashMap;

use byline_common::{AuthorCatalogEntry, SubscriptionRecord, SubscriptionStatus};

use crate::accumulate::{AuthorAccumulator, TimestampedCandidate};

/// Platform tags whose entries are webtoons regardless of metadata.
const WEBTOON_PLATFORMS: &[&str] = &["naver-webtoon", "webtoons"];

/// Build one catalog entry from an accumulator, filling subscription fields
/// when the accumulator's key is present in the registry.
pub fn build_entry(
    acc: &AuthorAccumulator,
    subscriptions: &HashMap<String, SubscriptionRecord>,
) -> AuthorCatalogEntry {
    let author_name = best_name(acc);
    let avatar = latest_candidate(&acc.avatar_candidates);
    let local_avatar = latest_candidate(&acc.local_avatar_candidates);

    let mut entry = AuthorCatalogEntry {
        key: acc.key.clone(),
        author_name,
        author_url: acc.author_url.clone(),
        platform: acc.platform.clone(),
        avatar,
        local_avatar,
        handle: acc.handles.first().cloned(),
        last_seen_at: acc.latest_timestamp,
        last_run_at: None,
        schedule: None,
        archive_count: acc.archive_count,
        unarchived_count: acc.unarchived_count,
        subscription_id: None,
        status: SubscriptionStatus::NotSubscribed,
        file_paths: acc.file_paths.clone(),
        followers: acc.followers,
        posts_count: acc.posts_count,
        bio: acc.bio.clone(),
        community: acc.community.clone(),
        max_posts_per_run: None,
        platform_options: None,
        is_webtoon: is_webtoon(&acc.platform, acc.webtoon_info.is_some()),
        webtoon_info: acc.webtoon_info.clone(),
    };

    if let Some(sub) = subscriptions.get(&acc.key) {
        entry.subscription_id = Some(sub.id.clone());
        entry.status = sub.status;
        entry.last_run_at = sub.last_run_at;
        entry.schedule = sub.schedule.clone();
        entry.max_posts_per_run = sub.max_posts_per_run;
        entry.platform_options = sub.platform_options.clone();
        if entry.avatar.is_none() {
            entry.avatar = sub.avatar.clone();
        }
    }

    entry
}

pub(crate) fn is_webtoon(platform: &str, has_webtoon_info: bool) -> bool {
    has_webtoon_info || WEBTOON_PLATFORMS.contains(&platform)
}

/// The name with the most votes. Ties keep whichever name entered the vote
/// table first — order-dependent, but preserved deliberately so output does
/// not drift between runs over the same input order.
fn best_name(acc: &AuthorAccumulator) -> String {
    let mut best: Option<(&str, u32)> = None;
    for vote in &acc.name_votes {
        match best {
            Some((_, count)) if vote.count <= count => {}
            _ => best = Some((&vote.name, vote.count)),
        }
    }
    match best {
        Some((name, _)) => name.to_string(),
        None => "Unknown".to_string(),
    }
}

/// The candidate with the latest timestamp; earlier of equal timestamps wins.
fn latest_candidate(candidates: &[TimestampedCandidate]) -> Option<String> {
    let mut best: Option<&TimestampedCandidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.seen_at <= current.seen_at => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.value.clone())
}
