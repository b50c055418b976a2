//! # Entry Records
//!
//! Merges a classification and resolved metadata into the row a store
//! persists for a saved link: either a channel or a video.
//!
//! A record sits in at most one place. Videos may belong to a channel or
//! live directly in a folder; channels may only live in a folder. The
//! `Placement` enum keeps `channel_id` and `folder_id` mutually exclusive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::classifier::{classify, is_valid_url, ClassificationResult, ContentType, Platform, VideoSubtype};
use crate::error::{Error, Result};
use crate::resolver::{MetadataResolver, MetadataResult};

/// Kind of row a link becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Channel,
    Video,
}

/// Where a new entry is filed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Unfiled,
    Folder(i64),
    Channel(i64),
}

/// A channel or video row ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub kind: EntryKind,
    pub url: String,
    pub platform: Platform,
    pub video_subtype: VideoSubtype,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    /// Written by the user, never by enrichment
    pub memo: Option<String>,
    pub channel_id: Option<i64>,
    pub folder_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryRecord {
    /// Build a record from a classification and its metadata.
    ///
    /// Channel URLs become channel rows; everything else, including
    /// unrecognised links, is saved as a video. A channel cannot be placed
    /// inside another channel.
    pub fn new(
        classification: &ClassificationResult,
        metadata: MetadataResult,
        placement: Placement,
    ) -> Result<Self> {
        let kind = match classification.content_type {
            ContentType::Channel => EntryKind::Channel,
            ContentType::Video | ContentType::Unknown => EntryKind::Video,
        };

        let (channel_id, folder_id) = match (kind, placement) {
            (EntryKind::Channel, Placement::Channel(id)) => {
                return Err(Error::InvalidRequest(format!(
                    "channel {} cannot be filed under channel {}",
                    classification.normalized_url, id
                )));
            }
            (_, Placement::Channel(id)) => (Some(id), None),
            (_, Placement::Folder(id)) => (None, Some(id)),
            (_, Placement::Unfiled) => (None, None),
        };

        let video_subtype = match kind {
            EntryKind::Video => classification.video_subtype,
            EntryKind::Channel => VideoSubtype::None,
        };

        let now = Utc::now();
        Ok(Self {
            kind,
            url: classification.normalized_url.clone(),
            platform: classification.platform,
            video_subtype,
            title: metadata.title,
            description: metadata.description,
            thumbnail: metadata.thumbnail,
            memo: None,
            channel_id,
            folder_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach a user memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        let memo = memo.into();
        self.memo = (!memo.trim().is_empty()).then_some(memo);
        self
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Validate, classify and resolve a link, producing a storable record.
///
/// Only an invalid URL or an impossible placement fails; resolver problems
/// just produce a plainer title.
#[instrument(skip(resolver))]
pub async fn enrich(
    resolver: &MetadataResolver,
    url: &str,
    placement: Placement,
) -> Result<EntryRecord> {
    let url = url.trim();
    if !is_valid_url(url) {
        return Err(Error::InvalidUrl(url.to_string()));
    }

    let classification = classify(url);
    if classification.is_channel() && matches!(placement, Placement::Channel(_)) {
        return Err(Error::InvalidRequest(format!(
            "channel {url} cannot be filed under another channel"
        )));
    }

    let metadata = resolver.resolve(url, classification.platform).await;
    info!(
        "Enriched {} as {} {:?}: {}",
        url, classification.platform, classification.content_type, metadata.title
    );

    EntryRecord::new(&classification, metadata, placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverConfig;

    fn metadata(title: &str) -> MetadataResult {
        MetadataResult {
            title: title.to_string(),
            description: "desc".to_string(),
            thumbnail: "https://cdn.example.com/t.jpg".to_string(),
            site_name: "YouTube".to_string(),
        }
    }

    #[test]
    fn test_video_in_channel() {
        let classification = classify("https://www.youtube.com/shorts/abc");
        let record =
            EntryRecord::new(&classification, metadata("Clip"), Placement::Channel(7)).unwrap();

        assert_eq!(record.kind, EntryKind::Video);
        assert_eq!(record.platform, Platform::Youtube);
        assert_eq!(record.video_subtype, VideoSubtype::Shorts);
        assert_eq!(record.channel_id, Some(7));
        assert_eq!(record.folder_id, None);
        assert_eq!(record.title, "Clip");
        assert_eq!(record.memo, None);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_channel_in_folder() {
        let classification = classify("https://www.tiktok.com/@janedoe");
        let record =
            EntryRecord::new(&classification, metadata("Jane"), Placement::Folder(3)).unwrap();

        assert_eq!(record.kind, EntryKind::Channel);
        assert_eq!(record.video_subtype, VideoSubtype::None);
        assert_eq!(record.folder_id, Some(3));
        assert_eq!(record.channel_id, None);
    }

    #[test]
    fn test_channel_under_channel_is_rejected() {
        let classification = classify("https://www.youtube.com/@someone");
        let err = EntryRecord::new(&classification, metadata("x"), Placement::Channel(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_unknown_links_are_videos() {
        let classification = classify("https://example.com/page");
        let record =
            EntryRecord::new(&classification, metadata("Page"), Placement::Unfiled).unwrap();
        assert_eq!(record.kind, EntryKind::Video);
        assert_eq!(record.platform, Platform::Other);
        assert_eq!(record.video_subtype, VideoSubtype::None);
    }

    #[test]
    fn test_memo_and_touch() {
        let classification = classify("https://youtu.be/abc");
        let mut record = EntryRecord::new(&classification, metadata("Video"), Placement::Unfiled)
            .unwrap()
            .with_memo("watch later");
        assert_eq!(record.memo.as_deref(), Some("watch later"));

        let created = record.created_at;
        record.touch();
        assert!(record.updated_at >= created);
        assert_eq!(record.created_at, created);

        assert_eq!(record.with_memo("  ").memo, None);
    }

    #[test]
    fn test_serialized_columns() {
        let classification = classify("https://www.instagram.com/p/XYZ/");
        let record =
            EntryRecord::new(&classification, metadata("Post"), Placement::Folder(2)).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["kind"], "video");
        assert_eq!(json["platform"], "instagram");
        assert_eq!(json["video_subtype"], "long");
        assert_eq!(json["folder_id"], 2);
        assert!(json["channel_id"].is_null());
    }

    #[tokio::test]
    async fn test_enrich_rejects_invalid_url() {
        let resolver = MetadataResolver::new(ResolverConfig::default()).unwrap();
        let err = enrich(&resolver, "abc", Placement::Unfiled).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_enrich_rejects_channel_placement_before_fetching() {
        let config = ResolverConfig::builder().scrape_timeout_secs(1).build();
        let resolver = MetadataResolver::new(config).unwrap();
        let err = enrich(&resolver, "https://www.tiktok.com/@janedoe", Placement::Channel(4))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
