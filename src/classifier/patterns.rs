//! Static URL pattern table used by the classifier
//!
//! Platforms are listed in evaluation order. Within a platform the shorts
//! matchers run before the long-form matchers, which run before the channel
//! matchers, so a URL that fits both a generic and a more specific shape
//! resolves to the specific one.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContentType, Platform, VideoSubtype};

/// Instagram path segments that are never usernames (or content ids).
pub(crate) const INSTAGRAM_RESERVED_SEGMENTS: &[&str] =
    &["p", "reel", "reels", "stories", "explore", "direct"];

/// A single URL pattern.
///
/// When the regex has a capture group and `reserved` is non-empty, a match
/// whose first capture equals one of the reserved words is rejected.
pub(crate) struct Matcher {
    regex: Regex,
    reserved: &'static [&'static str],
}

impl Matcher {
    fn new(pattern: &str) -> Self {
        Self::guarded(pattern, &[])
    }

    fn guarded(pattern: &str, reserved: &'static [&'static str]) -> Self {
        let regex = Regex::new(&format!(r"(?i)(?:^|[/.]){pattern}"))
            .unwrap_or_else(|e| panic!("invalid classifier pattern {pattern:?}: {e}"));
        Self { regex, reserved }
    }

    pub(crate) fn matches(&self, url: &str) -> bool {
        let Some(caps) = self.regex.captures(url) else {
            return false;
        };
        match caps.get(1) {
            Some(segment) => !self
                .reserved
                .iter()
                .any(|word| word.eq_ignore_ascii_case(segment.as_str())),
            None => true,
        }
    }
}

/// The shorts / long / channel matcher lists for one platform.
pub(crate) struct PlatformPatterns {
    pub(crate) platform: Platform,
    shorts: Vec<Matcher>,
    long: Vec<Matcher>,
    channel: Vec<Matcher>,
}

impl PlatformPatterns {
    /// Evaluate shorts, then long, then channel matchers; first hit wins.
    pub(crate) fn match_url(&self, url: &str) -> Option<(ContentType, VideoSubtype)> {
        if any_match(&self.shorts, url) {
            Some((ContentType::Video, VideoSubtype::Shorts))
        } else if any_match(&self.long, url) {
            Some((ContentType::Video, VideoSubtype::Long))
        } else if any_match(&self.channel, url) {
            Some((ContentType::Channel, VideoSubtype::None))
        } else {
            None
        }
    }
}

fn any_match(matchers: &[Matcher], url: &str) -> bool {
    matchers.iter().any(|m| m.matches(url))
}

pub(crate) static PLATFORM_PATTERNS: LazyLock<Vec<PlatformPatterns>> = LazyLock::new(|| {
    vec![
        PlatformPatterns {
            platform: Platform::Youtube,
            shorts: vec![Matcher::new(r"youtube\.com/shorts/[\w-]+")],
            long: vec![
                Matcher::new(r"youtube\.com/watch\?(?:[^#]*&)?v=[\w-]+"),
                Matcher::new(r"youtu\.be/[\w-]+"),
            ],
            channel: vec![
                Matcher::new(r"youtube\.com/@[\w.-]+"),
                Matcher::new(r"youtube\.com/channel/[\w-]+"),
                Matcher::new(r"youtube\.com/c/[\w.-]+"),
            ],
        },
        PlatformPatterns {
            platform: Platform::Tiktok,
            shorts: vec![
                Matcher::new(r"tiktok\.com/@[\w.-]+/video/\d+"),
                Matcher::new(r"vt\.tiktok\.com/[\w-]+"),
            ],
            long: Vec::new(),
            channel: vec![Matcher::new(r"tiktok\.com/@[\w.-]+/?(?:[?#].*)?$")],
        },
        PlatformPatterns {
            platform: Platform::Instagram,
            shorts: vec![Matcher::guarded(
                r"instagram\.com/reel/([\w-]+)",
                INSTAGRAM_RESERVED_SEGMENTS,
            )],
            long: vec![Matcher::guarded(
                r"instagram\.com/p/([\w-]+)",
                INSTAGRAM_RESERVED_SEGMENTS,
            )],
            channel: vec![Matcher::guarded(
                r"instagram\.com/([\w.]+)/?(?:[?#].*)?$",
                INSTAGRAM_RESERVED_SEGMENTS,
            )],
        },
        PlatformPatterns {
            platform: Platform::Xiaohongshu,
            shorts: vec![
                Matcher::new(r"xiaohongshu\.com/explore/\w+"),
                Matcher::new(r"xhslink\.com/\w+"),
            ],
            long: Vec::new(),
            channel: vec![Matcher::new(r"xiaohongshu\.com/user/profile/\w+")],
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_must_start_at_boundary() {
        let matcher = Matcher::new(r"youtube\.com/shorts/[\w-]+");
        assert!(matcher.matches("https://www.youtube.com/shorts/abc"));
        assert!(matcher.matches("youtube.com/shorts/abc"));
        assert!(!matcher.matches("https://notyoutube.com/shorts/abc"));
    }

    #[test]
    fn test_reserved_capture_is_rejected() {
        let matcher = Matcher::guarded(
            r"instagram\.com/([\w.]+)/?(?:[?#].*)?$",
            INSTAGRAM_RESERVED_SEGMENTS,
        );
        assert!(matcher.matches("https://instagram.com/jane.doe/"));
        assert!(!matcher.matches("https://instagram.com/explore"));
        assert!(!matcher.matches("https://instagram.com/Direct/"));
    }

    #[test]
    fn test_platform_order_is_fixed() {
        let order: Vec<Platform> = PLATFORM_PATTERNS.iter().map(|p| p.platform).collect();
        assert_eq!(
            order,
            vec![
                Platform::Youtube,
                Platform::Tiktok,
                Platform::Instagram,
                Platform::Xiaohongshu
            ]
        );
    }
}
