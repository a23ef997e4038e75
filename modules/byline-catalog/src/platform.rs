use serde::{Deserialize, Serialize};

/// Platforms the URL normalizer can detect.
///
/// Sightings carry their platform as an opaque string tag assigned by the
/// scraper; this enum only describes what the normalizer itself recognized
/// from a URL. Key generation always uses the sighting's own tag, never a
/// re-derived one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    X,
    Instagram,
    Facebook,
    Reddit,
    Pinterest,
    Linkedin,
    Youtube,
    Tiktok,
    Substack,
    Tumblr,
    NaverBlog,
    NaverWebtoon,
    Webtoons,
    Velog,
    Medium,
    GithubPages,
    Blog,
}

impl Platform {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Platform::X => "x",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Reddit => "reddit",
            Platform::Pinterest => "pinterest",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Substack => "substack",
            Platform::Tumblr => "tumblr",
            Platform::NaverBlog => "naver-blog",
            Platform::NaverWebtoon => "naver-webtoon",
            Platform::Webtoons => "webtoons",
            Platform::Velog => "velog",
            Platform::Medium => "medium",
            Platform::GithubPages => "github-pages",
            Platform::Blog => "blog",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "x" | "twitter" => Some(Platform::X),
            "instagram" => Some(Platform::Instagram),
            "facebook" => Some(Platform::Facebook),
            "reddit" => Some(Platform::Reddit),
            "pinterest" => Some(Platform::Pinterest),
            "linkedin" => Some(Platform::Linkedin),
            "youtube" => Some(Platform::Youtube),
            "tiktok" => Some(Platform::Tiktok),
            "substack" => Some(Platform::Substack),
            "tumblr" => Some(Platform::Tumblr),
            "naver-blog" => Some(Platform::NaverBlog),
            "naver-webtoon" => Some(Platform::NaverWebtoon),
            "webtoons" => Some(Platform::Webtoons),
            "velog" => Some(Platform::Velog),
            "medium" => Some(Platform::Medium),
            "github-pages" => Some(Platform::GithubPages),
            "blog" => Some(Platform::Blog),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trip() {
        for p in [
            Platform::X,
            Platform::NaverWebtoon,
            Platform::GithubPages,
            Platform::Blog,
        ] {
            assert_eq!(Platform::from_tag(p.as_tag()), Some(p));
        }
    }

    #[test]
    fn twitter_alias_maps_to_x() {
        assert_eq!(Platform::from_tag("twitter"), Some(Platform::X));
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Platform::from_tag("myspace"), None);
    }
}
