//! Author URL canonicalization.
//!
//! The same author shows up under many surface forms: `twitter.com/x` vs
//! `x.com/x`, a dated blog-post URL vs the blog root, a mobile host, an RSS
//! mirror. This module collapses all of them to one canonical URL per author
//! so the key generator can treat URL equality as author identity.
//!
//! Detection is a static ordered table of per-platform regex patterns —
//! first match wins — followed by a platform-specific canonical form. URLs
//! that match no pattern keep their cleaned shape; strings that do not parse
//! as URLs at all yield an empty canonical, which pushes the caller onto the
//! name-based key fallback. This function never errors.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::platform::Platform;

/// Result of canonicalizing a raw author URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Canonical form, or empty when the input is empty or unparsable.
    pub canonical_url: String,
    pub platform: Option<Platform>,
    pub handle: Option<String>,
}

// =============================================================================
// Regex patterns
// =============================================================================
//
// All patterns run against the precleaned URL: trimmed, lowercased, https
// forced, fragment and query stripped, no trailing slash.

static RE_X: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.|mobile\.)?(?:twitter|x)\.com/([a-z0-9_]+)").unwrap()
});
static RE_INSTAGRAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?instagram\.com/([a-z0-9_.]+)").unwrap());
static RE_FACEBOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.|m\.)?(?:facebook|fb)\.com/([a-z0-9_.-]+)").unwrap()
});
static RE_REDDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.|old\.)?reddit\.com/(?:user|u)/([a-z0-9_-]+)").unwrap()
});
static RE_PINTEREST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:[a-z]{2}\.|www\.)?pinterest\.com/([a-z0-9_]+)").unwrap()
});
static RE_LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:[a-z]{2}\.|www\.)?linkedin\.com/in/([a-z0-9%._-]+)").unwrap()
});
static RE_YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.|m\.)?youtube\.com/(?:channel/|c/|user/|@)?([a-z0-9_.-]+)")
        .unwrap()
});
static RE_TIKTOK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?tiktok\.com/@([a-z0-9_.]+)").unwrap());
static RE_SUBSTACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://([a-z0-9-]+)\.substack\.com").unwrap());
static RE_TUMBLR_SUBDOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://([a-z0-9-]+)\.tumblr\.com").unwrap());
static RE_TUMBLR_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?tumblr\.com/([a-z0-9_-]+)").unwrap());
static RE_NAVER_WEBTOON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:m\.)?comic\.naver\.com/webtoon/(?:list|detail)").unwrap()
});
static RE_WEBTOONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.|m\.)?webtoons\.com/([a-z]{2}(?:-[a-z]{2})?)/([a-z0-9-]+)/([a-z0-9-]+)")
        .unwrap()
});
static RE_NAVER_BLOG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:m\.)?blog\.naver\.com/([a-z0-9_-]+)").unwrap());
static RE_VELOG_RSS_V2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://v2\.velog\.io/rss/@?([a-z0-9_.-]+)").unwrap());
static RE_VELOG_RSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?velog\.io/rss/@?([a-z0-9_.-]+)").unwrap());
static RE_VELOG_PROFILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?velog\.io/@([a-z0-9_.-]+)").unwrap());
static RE_MEDIUM_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(?:www\.)?medium\.com/@([a-z0-9_.-]+)").unwrap());
static RE_MEDIUM_SUBDOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://([a-z0-9-]+)\.medium\.com").unwrap());
static RE_GITHUB_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://([a-z0-9-]+)\.github\.io(?:/([^/]+))?").unwrap());
static RE_DATED_BLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://([^/]+)(?:/[^/]+)?/(?:\d{4}/\d{2}/\d{2}|\d{4}-\d{2}-\d{2})(?:/|$)")
        .unwrap()
});

// =============================================================================
// Skip segments (non-profile paths that must not become handles)
// =============================================================================

const X_SKIP: &[&str] = &["intent", "share", "hashtag", "search", "i", "home", "explore"];
const INSTAGRAM_SKIP: &[&str] = &[
    "p", "reel", "reels", "stories", "explore", "accounts", "tv", "s", "share",
];
const FACEBOOK_SKIP: &[&str] = &[
    "photo", "photos", "sharer", "share", "events", "groups", "watch", "marketplace", "login",
    "dialog", "plugins",
];
const PINTEREST_SKIP: &[&str] = &["pin", "search", "ideas"];
const YOUTUBE_SKIP: &[&str] = &[
    "watch", "playlist", "results", "feed", "shorts", "embed", "live", "premium",
];
const SUBSTACK_SKIP: &[&str] = &["www", "open"];
const TUMBLR_SKIP: &[&str] = &["www"];
const MEDIUM_SKIP: &[&str] = &["www"];
const NO_SKIP: &[&str] = &[];

/// First path segments on a `user.github.io` site that are Jekyll furniture,
/// not a project-site repo name.
const GITHUB_NON_REPO_SEGMENTS: &[&str] = &[
    "feed.xml", "atom.xml", "sitemap.xml", "about", "tags", "categories", "archive", "archives",
    "posts", "blog", "page", "pages", "search", "assets", "images", "css", "js", "index.html",
    "404.html",
];

// =============================================================================
// Pattern table — tested in order, first match wins
// =============================================================================

struct UrlParts<'a> {
    /// Precleaned URL with the query string kept (titleid etc. live there).
    full: &'a str,
}

struct PlatformPattern {
    platform: Platform,
    regexes: &'static [&'static LazyLock<Regex>],
    skip_segments: &'static [&'static str],
    canonicalize: fn(&Captures<'_>, &UrlParts<'_>) -> Option<NormalizedUrl>,
}

const PLATFORM_PATTERNS: &[PlatformPattern] = &[
    PlatformPattern {
        platform: Platform::X,
        regexes: &[&RE_X],
        skip_segments: X_SKIP,
        canonicalize: canon_x,
    },
    PlatformPattern {
        platform: Platform::Instagram,
        regexes: &[&RE_INSTAGRAM],
        skip_segments: INSTAGRAM_SKIP,
        canonicalize: canon_instagram,
    },
    PlatformPattern {
        platform: Platform::Facebook,
        regexes: &[&RE_FACEBOOK],
        skip_segments: FACEBOOK_SKIP,
        canonicalize: canon_facebook,
    },
    PlatformPattern {
        platform: Platform::Reddit,
        regexes: &[&RE_REDDIT],
        skip_segments: NO_SKIP,
        canonicalize: canon_reddit,
    },
    PlatformPattern {
        platform: Platform::Pinterest,
        regexes: &[&RE_PINTEREST],
        skip_segments: PINTEREST_SKIP,
        canonicalize: canon_pinterest,
    },
    PlatformPattern {
        platform: Platform::Linkedin,
        regexes: &[&RE_LINKEDIN],
        skip_segments: NO_SKIP,
        canonicalize: canon_linkedin,
    },
    PlatformPattern {
        platform: Platform::Youtube,
        regexes: &[&RE_YOUTUBE],
        skip_segments: YOUTUBE_SKIP,
        canonicalize: canon_youtube,
    },
    PlatformPattern {
        platform: Platform::Tiktok,
        regexes: &[&RE_TIKTOK],
        skip_segments: NO_SKIP,
        canonicalize: canon_tiktok,
    },
    PlatformPattern {
        platform: Platform::NaverWebtoon,
        regexes: &[&RE_NAVER_WEBTOON],
        skip_segments: NO_SKIP,
        canonicalize: canon_naver_webtoon,
    },
    PlatformPattern {
        platform: Platform::Webtoons,
        regexes: &[&RE_WEBTOONS],
        skip_segments: NO_SKIP,
        canonicalize: canon_webtoons,
    },
    PlatformPattern {
        platform: Platform::NaverBlog,
        regexes: &[&RE_NAVER_BLOG],
        skip_segments: NO_SKIP,
        canonicalize: canon_naver_blog,
    },
    PlatformPattern {
        platform: Platform::Substack,
        regexes: &[&RE_SUBSTACK],
        skip_segments: SUBSTACK_SKIP,
        canonicalize: canon_substack,
    },
    PlatformPattern {
        platform: Platform::Tumblr,
        regexes: &[&RE_TUMBLR_SUBDOMAIN, &RE_TUMBLR_PATH],
        skip_segments: TUMBLR_SKIP,
        canonicalize: canon_tumblr,
    },
    PlatformPattern {
        platform: Platform::Velog,
        regexes: &[&RE_VELOG_RSS_V2, &RE_VELOG_RSS, &RE_VELOG_PROFILE],
        skip_segments: NO_SKIP,
        canonicalize: canon_velog,
    },
    PlatformPattern {
        platform: Platform::Medium,
        regexes: &[&RE_MEDIUM_PATH, &RE_MEDIUM_SUBDOMAIN],
        skip_segments: MEDIUM_SKIP,
        canonicalize: canon_medium,
    },
    PlatformPattern {
        platform: Platform::GithubPages,
        regexes: &[&RE_GITHUB_PAGES],
        skip_segments: NO_SKIP,
        canonicalize: canon_github_pages,
    },
    PlatformPattern {
        platform: Platform::Blog,
        regexes: &[&RE_DATED_BLOG],
        skip_segments: NO_SKIP,
        canonicalize: canon_dated_blog,
    },
];

// =============================================================================
// Public API
// =============================================================================

/// Canonicalize a raw author URL.
///
/// `platform_hint` tags the result when no pattern matched (the caller knows
/// what scraper produced the URL); it never overrides a detected platform.
pub fn normalize_author_url(raw: &str, platform_hint: Option<Platform>) -> NormalizedUrl {
    let full = preclean(raw);
    if full.is_empty() {
        return NormalizedUrl {
            canonical_url: String::new(),
            platform: platform_hint,
            handle: None,
        };
    }
    let cleaned = strip_query(&full);
    let parts = UrlParts { full: &full };

    for pattern in PLATFORM_PATTERNS {
        if let Some(normalized) = try_pattern(pattern, &cleaned, &parts) {
            return normalized;
        }
    }

    // No platform matched. A URL that at least parses keeps its cleaned shape
    // as a generic identity; anything else falls back to the name key.
    match Url::parse(&cleaned) {
        Ok(_) => NormalizedUrl {
            canonical_url: cleaned,
            platform: platform_hint,
            handle: None,
        },
        Err(_) => NormalizedUrl {
            canonical_url: String::new(),
            platform: platform_hint,
            handle: None,
        },
    }
}

fn try_pattern(
    pattern: &PlatformPattern,
    cleaned: &str,
    parts: &UrlParts<'_>,
) -> Option<NormalizedUrl> {
    for re in pattern.regexes {
        let caps = match re.captures(cleaned) {
            Some(caps) => caps,
            None => continue,
        };
        if let Some(first) = caps.get(1) {
            if pattern.skip_segments.contains(&first.as_str()) {
                // Not a profile path — let the next regex, a later pattern,
                // or the generic fallback have a go.
                continue;
            }
        }
        if let Some(normalized) = (pattern.canonicalize)(&caps, parts) {
            return Some(normalized);
        }
    }
    None
}

// =============================================================================
// Precleaning
// =============================================================================

/// Trim, lowercase, force https, strip fragment; keeps the query string.
fn preclean(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut s = trimmed.to_lowercase();
    if let Some(rest) = s.strip_prefix("http://") {
        s = format!("https://{rest}");
    } else if !s.starts_with("https://") {
        s = format!("https://{s}");
    }
    if let Some(i) = s.find('#') {
        s.truncate(i);
    }
    if !s.contains('?') {
        while s.ends_with('/') {
            s.pop();
        }
    }
    if s == "https://" {
        return String::new();
    }
    s
}

/// Drop the query string and any trailing slash it was hiding.
fn strip_query(full: &str) -> String {
    let mut s = match full.split_once('?') {
        Some((before, _)) => before.to_string(),
        None => full.to_string(),
    };
    while s.ends_with('/') {
        s.pop();
    }
    s
}

/// Extract a single query parameter value from a precleaned URL.
fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    for pair in query.split('&') {
        if let Some((k, v)) = pair.split_once('=') {
            if k == name && !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

// =============================================================================
// Per-platform canonical forms
// =============================================================================

fn profile(platform: Platform, canonical_url: String, handle: &str) -> Option<NormalizedUrl> {
    Some(NormalizedUrl {
        canonical_url,
        platform: Some(platform),
        handle: Some(handle.to_string()),
    })
}

fn canon_x(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::X, format!("https://x.com/{h}"), h)
}

fn canon_instagram(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(
        Platform::Instagram,
        format!("https://www.instagram.com/{h}"),
        h,
    )
}

fn canon_facebook(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::Facebook, format!("https://facebook.com/{h}"), h)
}

fn canon_reddit(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(
        Platform::Reddit,
        format!("https://www.reddit.com/user/{h}"),
        h,
    )
}

fn canon_pinterest(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(
        Platform::Pinterest,
        format!("https://www.pinterest.com/{h}"),
        h,
    )
}

fn canon_linkedin(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(
        Platform::Linkedin,
        format!("https://www.linkedin.com/in/{h}"),
        h,
    )
}

fn canon_youtube(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    if is_youtube_channel_id(h) {
        profile(
            Platform::Youtube,
            format!("https://www.youtube.com/channel/{h}"),
            h,
        )
    } else {
        profile(
            Platform::Youtube,
            format!("https://www.youtube.com/@{h}"),
            h,
        )
    }
}

/// Channel IDs survive the lowercasing pass as 24-char `uc…` strings.
fn is_youtube_channel_id(h: &str) -> bool {
    h.len() == 24
        && h.starts_with("uc")
        && h.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn canon_tiktok(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::Tiktok, format!("https://www.tiktok.com/@{h}"), h)
}

fn canon_naver_webtoon(_caps: &Captures<'_>, parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    // Both list and detail (episode) URLs identify the title by `titleid`;
    // episode params (`no`) are dropped.
    let id = query_param(parts.full, "titleid")?;
    profile(
        Platform::NaverWebtoon,
        format!("https://comic.naver.com/webtoon/list?titleid={id}"),
        &id,
    )
}

fn canon_webtoons(caps: &Captures<'_>, parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let (lang, genre, slug) = (&caps[1], &caps[2], &caps[3]);
    let base = format!("https://www.webtoons.com/{lang}/{genre}/{slug}/list");
    match query_param(parts.full, "title_no") {
        Some(id) => profile(Platform::Webtoons, format!("{base}?title_no={id}"), &id),
        None => profile(Platform::Webtoons, base, slug),
    }
}

fn canon_naver_blog(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::NaverBlog, format!("https://blog.naver.com/{h}"), h)
}

fn canon_substack(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    // Any post path collapses to the bare publication subdomain.
    let h = &caps[1];
    profile(Platform::Substack, format!("https://{h}.substack.com"), h)
}

fn canon_tumblr(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::Tumblr, format!("https://{h}.tumblr.com"), h)
}

fn canon_velog(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    // Collapses the v2 RSS mirror and strips any post slug.
    let h = &caps[1];
    profile(Platform::Velog, format!("https://velog.io/@{h}"), h)
}

fn canon_medium(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let h = &caps[1];
    profile(Platform::Medium, format!("https://medium.com/@{h}"), h)
}

fn canon_github_pages(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    let user = &caps[1];
    let origin = format!("https://{user}.github.io");
    let canonical = match caps.get(2).map(|m| m.as_str()) {
        // User site root, or a dated Jekyll post / site furniture directly
        // under the root: the author is the user site itself.
        None => origin,
        Some(seg) if is_jekyll_date_segment(seg) || GITHUB_NON_REPO_SEGMENTS.contains(&seg) => {
            origin
        }
        // Project site: the repo segment is part of the identity.
        Some(repo) => format!("{origin}/{repo}"),
    };
    profile(Platform::GithubPages, canonical, user)
}

/// `2024` (from `/2024/07/15/…`) or `2024-07-15` style first segments.
fn is_jekyll_date_segment(seg: &str) -> bool {
    let bytes = seg.as_bytes();
    match bytes.len() {
        4 => bytes.iter().all(u8::is_ascii_digit),
        10 => {
            bytes[..4].iter().all(u8::is_ascii_digit)
                && bytes[4] == b'-'
                && bytes[5..7].iter().all(u8::is_ascii_digit)
                && bytes[7] == b'-'
                && bytes[8..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

fn canon_dated_blog(caps: &Captures<'_>, _parts: &UrlParts<'_>) -> Option<NormalizedUrl> {
    // A dated post path on an arbitrary host: the author is the origin.
    let host = &caps[1];
    let handle = host
        .split('.')
        .find(|label| *label != "www")
        .map(str::to_string);
    Some(NormalizedUrl {
        canonical_url: format!("https://{host}"),
        platform: Some(Platform::Blog),
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        normalize_author_url(raw, None).canonical_url
    }

    fn detected(raw: &str) -> Option<Platform> {
        normalize_author_url(raw, None).platform
    }

    fn handle(raw: &str) -> Option<String> {
        normalize_author_url(raw, None).handle
    }

    #[test]
    fn twitter_and_x_collapse() {
        assert_eq!(canon("https://twitter.com/karpathy"), "https://x.com/karpathy");
        assert_eq!(canon("https://x.com/karpathy"), "https://x.com/karpathy");
        assert_eq!(canon("https://mobile.x.com/karpathy"), "https://x.com/karpathy");
        assert_eq!(detected("https://twitter.com/karpathy"), Some(Platform::X));
    }

    #[test]
    fn x_post_url_keeps_profile_segment() {
        assert_eq!(
            canon("https://x.com/karpathy/status/1234567890"),
            "https://x.com/karpathy"
        );
    }

    #[test]
    fn x_intent_path_is_not_a_profile() {
        assert_ne!(canon("https://x.com/intent/follow"), "https://x.com/intent");
    }

    #[test]
    fn scheme_case_and_slash_are_cleaned() {
        assert_eq!(canon("  HTTP://Twitter.com/Karpathy/  "), "https://x.com/karpathy");
    }

    #[test]
    fn schemeless_input_gets_https() {
        assert_eq!(canon("twitter.com/karpathy"), "https://x.com/karpathy");
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        assert_eq!(
            canon("https://x.com/karpathy?ref_src=embed#top"),
            "https://x.com/karpathy"
        );
    }

    #[test]
    fn facebook_hosts_collapse() {
        for url in [
            "https://fb.com/zuck",
            "https://m.facebook.com/zuck",
            "https://www.facebook.com/zuck",
        ] {
            assert_eq!(canon(url), "https://facebook.com/zuck");
        }
    }

    #[test]
    fn facebook_share_path_is_skipped() {
        assert_ne!(canon("https://facebook.com/sharer/sharer.php"), "https://facebook.com/sharer");
    }

    #[test]
    fn pinterest_country_subdomains_collapse() {
        assert_eq!(canon("https://fr.pinterest.com/ideasfr"), "https://www.pinterest.com/ideasfr");
        assert_eq!(canon("https://pinterest.com/ideasfr"), "https://www.pinterest.com/ideasfr");
    }

    #[test]
    fn linkedin_rewrites_to_in_path() {
        assert_eq!(
            canon("https://kr.linkedin.com/in/someone/details"),
            "https://www.linkedin.com/in/someone"
        );
        assert_eq!(canon("https://linkedin.com/in/someone"), "https://www.linkedin.com/in/someone");
    }

    #[test]
    fn youtube_handle_form() {
        assert_eq!(canon("https://youtube.com/@veritasium"), "https://www.youtube.com/@veritasium");
        assert_eq!(canon("https://www.youtube.com/c/veritasium"), "https://www.youtube.com/@veritasium");
    }

    #[test]
    fn youtube_channel_id_form() {
        let id = "ucbjycsmduvyrgc6mvfkpoya";
        assert_eq!(id.len(), 24);
        assert_eq!(
            canon(&format!("https://youtube.com/channel/{id}")),
            format!("https://www.youtube.com/channel/{id}")
        );
    }

    #[test]
    fn youtube_watch_is_not_a_profile() {
        assert_ne!(
            canon("https://www.youtube.com/watch?v=abc123"),
            "https://www.youtube.com/@watch"
        );
    }

    #[test]
    fn substack_post_collapses_to_publication() {
        assert_eq!(
            canon("https://astralcodexten.substack.com/p/some-post-title"),
            "https://astralcodexten.substack.com"
        );
        assert_eq!(handle("https://astralcodexten.substack.com"), Some("astralcodexten".into()));
    }

    #[test]
    fn tumblr_both_forms_collapse_to_subdomain() {
        assert_eq!(canon("https://staff.tumblr.com/post/123/hello"), "https://staff.tumblr.com");
        assert_eq!(canon("https://tumblr.com/staff"), "https://staff.tumblr.com");
    }

    #[test]
    fn naver_webtoon_list_and_detail_agree() {
        let canonical = "https://comic.naver.com/webtoon/list?titleid=769209";
        assert_eq!(canon("https://comic.naver.com/webtoon/list?titleId=769209"), canonical);
        assert_eq!(
            canon("https://comic.naver.com/webtoon/detail?titleId=769209&no=128"),
            canonical
        );
        assert_eq!(detected(canonical), Some(Platform::NaverWebtoon));
    }

    #[test]
    fn webtoons_episode_collapses_to_list() {
        assert_eq!(
            canon("https://www.webtoons.com/en/fantasy/tower-of-god/ep-1/viewer?title_no=95&episode_no=1"),
            "https://www.webtoons.com/en/fantasy/tower-of-god/list?title_no=95"
        );
    }

    #[test]
    fn velog_post_and_rss_mirror_collapse() {
        assert_eq!(canon("https://velog.io/@someone/my-post-slug"), "https://velog.io/@someone");
        assert_eq!(canon("https://v2.velog.io/rss/@someone"), "https://velog.io/@someone");
        assert_eq!(canon("https://v2.velog.io/rss/someone"), "https://velog.io/@someone");
    }

    #[test]
    fn medium_both_host_forms_collapse() {
        assert_eq!(canon("https://medium.com/@user/some-story-1a2b3c"), "https://medium.com/@user");
        assert_eq!(canon("https://user.medium.com/some-story-1a2b3c"), "https://medium.com/@user");
        assert_eq!(detected("https://user.medium.com/x"), Some(Platform::Medium));
    }

    #[test]
    fn github_pages_user_site_dated_post() {
        let n = normalize_author_url("https://hyungyunlim.github.io/2024/07/15/my-post-title", None);
        assert_eq!(n.canonical_url, "https://hyungyunlim.github.io");
        assert_eq!(n.handle, Some("hyungyunlim".into()));
        assert_eq!(n.platform, Some(Platform::GithubPages));
    }

    #[test]
    fn github_pages_project_site_keeps_repo() {
        let n = normalize_author_url("https://username.github.io/my-project/2024/01/01/post-title", None);
        assert_eq!(n.canonical_url, "https://username.github.io/my-project");
        assert_eq!(n.handle, Some("username".into()));
    }

    #[test]
    fn github_pages_furniture_is_not_a_repo() {
        assert_eq!(canon("https://user.github.io/feed.xml"), "https://user.github.io");
        assert_eq!(canon("https://user.github.io/about"), "https://user.github.io");
        assert_eq!(canon("https://user.github.io/tags"), "https://user.github.io");
    }

    #[test]
    fn github_pages_hyphen_date_segment() {
        assert_eq!(canon("https://user.github.io/2024-07-15/post"), "https://user.github.io");
    }

    #[test]
    fn dated_blog_strips_to_origin() {
        assert_eq!(canon("https://blog.example.com/2025/12/15/some-slug"), "https://blog.example.com");
        assert_eq!(canon("https://blog.example.com/2025-07-15/some-slug"), "https://blog.example.com");
        assert_eq!(detected("https://blog.example.com/2025/12/15/x"), Some(Platform::Blog));
    }

    #[test]
    fn dated_blog_with_leading_segment_strips_to_origin() {
        assert_eq!(canon("https://example.com/notes/2025/12/15/some-slug"), "https://example.com");
    }

    #[test]
    fn generic_url_keeps_cleaned_shape() {
        assert_eq!(canon("https://city.gov/About/"), "https://city.gov/about");
        assert_eq!(detected("https://city.gov/about"), None);
    }

    #[test]
    fn platform_hint_tags_generic_urls_only() {
        let n = normalize_author_url("https://city.gov/about", Some(Platform::Blog));
        assert_eq!(n.platform, Some(Platform::Blog));
        let n = normalize_author_url("https://twitter.com/karpathy", Some(Platform::Blog));
        assert_eq!(n.platform, Some(Platform::X));
    }

    #[test]
    fn empty_input_yields_empty_canonical() {
        assert_eq!(canon(""), "");
        assert_eq!(canon("   "), "");
    }

    #[test]
    fn unparsable_input_yields_empty_canonical() {
        assert_eq!(canon("not a url at all"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "https://twitter.com/karpathy",
            "https://fr.pinterest.com/ideasfr",
            "https://astralcodexten.substack.com/p/post",
            "https://comic.naver.com/webtoon/detail?titleId=769209&no=128",
            "https://user.medium.com/story",
            "https://hyungyunlim.github.io/2024/07/15/my-post-title",
            "https://username.github.io/my-project/2024/01/01/post",
            "https://blog.example.com/2025/12/15/slug",
            "https://city.gov/about",
            "https://www.webtoons.com/en/fantasy/tower-of-god/ep-1/viewer?title_no=95&episode_no=1",
        ] {
            let once = normalize_author_url(raw, None);
            let twice = normalize_author_url(&once.canonical_url, None);
            assert_eq!(once.canonical_url, twice.canonical_url, "not a fixed point: {raw}");
        }
    }
}
