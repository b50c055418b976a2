//! # URL Classifier
//!
//! Maps a raw URL string to the platform it belongs to and the kind of
//! content it points at. Classification is a pure, total function: every
//! input, including strings that are not URLs at all, yields a result.
//!
//! ## Key Components
//!
//! - `classify`: full classification (platform, content type, video subtype)
//! - `classify_target`: coarse variant that only distinguishes channels from
//!   short or long videos
//! - `is_valid_url`: syntax gate callers run before attempting resolution
//!
//! The pattern table lives in `patterns` and is built once, then shared
//! read-only across every caller.

mod patterns;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Platform a URL belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Xiaohongshu,
    #[default]
    Other,
}

impl Platform {
    /// Lowercase identifier used in hints and persisted rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::Other => "other",
        }
    }

    /// Interpret a free-form platform hint. Unknown hints map to `Other`.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "youtube" => Platform::Youtube,
            "tiktok" => Platform::Tiktok,
            "instagram" => Platform::Instagram,
            "xiaohongshu" => Platform::Xiaohongshu,
            _ => Platform::Other,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a URL identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Channel,
    Video,
    Unknown,
}

/// Short-form vs long-form. Only meaningful for `ContentType::Video`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSubtype {
    Shorts,
    Long,
    None,
}

/// Result of classifying a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub platform: Platform,
    pub content_type: ContentType,
    pub video_subtype: VideoSubtype,
    /// The input with surrounding whitespace removed
    pub normalized_url: String,
}

impl ClassificationResult {
    fn unknown(normalized_url: &str) -> Self {
        Self {
            platform: Platform::Other,
            content_type: ContentType::Unknown,
            video_subtype: VideoSubtype::None,
            normalized_url: normalized_url.to_string(),
        }
    }

    pub fn is_channel(&self) -> bool {
        self.content_type == ContentType::Channel
    }

    pub fn is_video(&self) -> bool {
        self.content_type == ContentType::Video
    }
}

/// Classify a URL by platform, content type and video subtype.
///
/// Platforms are tried in a fixed order and the first matching
/// platform/category pair wins. Anything unrecognised, including malformed
/// input, comes back as `other/unknown/none`.
pub fn classify(url: &str) -> ClassificationResult {
    let normalized = url.trim();

    patterns::PLATFORM_PATTERNS
        .iter()
        .find_map(|entry| {
            entry
                .match_url(normalized)
                .map(|(content_type, video_subtype)| ClassificationResult {
                    platform: entry.platform,
                    content_type,
                    video_subtype,
                    normalized_url: normalized.to_string(),
                })
        })
        .unwrap_or_else(|| ClassificationResult::unknown(normalized))
}

/// Coarse link kind: is this a channel, and if it is a video, which kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Channel,
    ShortVideo,
    LongVideo,
    Unknown,
}

/// Output of the coarse classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub platform: Platform,
    pub kind: LinkKind,
}

impl From<&ClassificationResult> for LinkTarget {
    fn from(result: &ClassificationResult) -> Self {
        let kind = match (result.content_type, result.video_subtype) {
            (ContentType::Channel, _) => LinkKind::Channel,
            (ContentType::Video, VideoSubtype::Shorts) => LinkKind::ShortVideo,
            (ContentType::Video, _) => LinkKind::LongVideo,
            (ContentType::Unknown, _) => LinkKind::Unknown,
        };
        Self {
            platform: result.platform,
            kind,
        }
    }
}

/// Coarse classification for callers that only need channel vs. video.
pub fn classify_target(url: &str) -> LinkTarget {
    LinkTarget::from(&classify(url))
}

/// Whether the string parses as an absolute URL (any scheme).
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}
