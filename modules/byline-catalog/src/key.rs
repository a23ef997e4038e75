//! Author identity keys.
//!
//! A key is either URL-based (`"{platform}:{canonical_url}"`) or, when no
//! usable URL exists, name-based (`"{platform}:name:{normalized_name}"`).
//! Every pipeline stage — accumulation, subscription lookup, the identity
//! merge — derives keys through this one function so they stay comparable.

use crate::url::normalize_author_url;

/// Marker segment that distinguishes name-based keys from URL-based ones.
pub(crate) const NAME_KEY_MARKER: &str = ":name:";

/// Normalize a display name for identity comparison.
///
/// Lowercases, trims, collapses internal whitespace, strips a single leading
/// `@` and a trailing parenthetical (`"John Doe (Official)"` → `"john doe"`).
pub fn normalize_author_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut s = lowered.strip_prefix('@').unwrap_or(&lowered).to_string();
    if s.ends_with(')') {
        if let Some(i) = s.rfind('(') {
            s.truncate(i);
        }
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the deduplication key for an author sighting.
///
/// `platform` is the sighting's own tag, used verbatim — the key never
/// re-derives the platform from the URL, so a mis-tagged sighting keys under
/// its tag rather than silently jumping platforms.
pub fn generate_author_key(url: &str, name: &str, platform: &str) -> String {
    let normalized = normalize_author_url(url, None);
    if !normalized.canonical_url.is_empty() {
        format!("{platform}:{}", normalized.canonical_url)
    } else {
        format!("{platform}{NAME_KEY_MARKER}{}", normalize_author_name(name))
    }
}

/// Whether a key was produced by the name-based fallback.
pub(crate) fn is_name_key(key: &str) -> bool {
    key.contains(NAME_KEY_MARKER)
}

/// The platform tag prefix of a key.
pub(crate) fn key_platform(key: &str) -> &str {
    key.split(':').next().unwrap_or("")
}

/// The URL part of a URL-based key, if it is one.
pub(crate) fn key_url(key: &str) -> Option<&str> {
    if is_name_key(key) {
        return None;
    }
    key.split_once(':').map(|(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_trims_and_lowercases() {
        assert_eq!(normalize_author_name("  Andrej Karpathy  "), "andrej karpathy");
    }

    #[test]
    fn name_strips_leading_at() {
        assert_eq!(normalize_author_name("@karpathy"), "karpathy");
    }

    #[test]
    fn name_strips_only_one_at() {
        assert_eq!(normalize_author_name("@@weird"), "@weird");
    }

    #[test]
    fn name_strips_trailing_parenthetical() {
        assert_eq!(normalize_author_name("John Doe (Official)"), "john doe");
    }

    #[test]
    fn name_collapses_internal_whitespace() {
        assert_eq!(normalize_author_name("John   Q.\tDoe"), "john q. doe");
    }

    #[test]
    fn name_empty_stays_empty() {
        assert_eq!(normalize_author_name(""), "");
        assert_eq!(normalize_author_name("   "), "");
    }

    #[test]
    fn url_equivalence_across_hosts() {
        assert_eq!(
            generate_author_key("https://twitter.com/karpathy", "Andrej Karpathy", "x"),
            generate_author_key("https://x.com/karpathy", "Andrej Karpathy", "x"),
        );
    }

    #[test]
    fn name_fallback_key_shape() {
        assert_eq!(
            generate_author_key("", "Andrej Karpathy", "x"),
            "x:name:andrej karpathy"
        );
    }

    #[test]
    fn url_key_shape() {
        assert_eq!(
            generate_author_key("https://x.com/karpathy", "Andrej Karpathy", "x"),
            "x:https://x.com/karpathy"
        );
    }

    #[test]
    fn platform_tag_is_verbatim() {
        // Even a tag the normalizer would not pick itself is preserved.
        assert_eq!(
            generate_author_key("https://x.com/karpathy", "A", "blog"),
            "blog:https://x.com/karpathy"
        );
    }

    #[test]
    fn key_helpers() {
        assert!(is_name_key("x:name:andrej karpathy"));
        assert!(!is_name_key("x:https://x.com/karpathy"));
        assert_eq!(key_platform("x:https://x.com/karpathy"), "x");
        assert_eq!(key_url("x:https://x.com/karpathy"), Some("https://x.com/karpathy"));
        assert_eq!(key_url("x:name:andrej karpathy"), None);
    }
}
