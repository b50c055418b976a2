//! # BenchBox - link classification and preview metadata
//!
//! This crate is the decision-making core of BenchBox, a personal organizer
//! for short-form video links (YouTube, TikTok, Instagram, Xiaohongshu). It
//! answers two questions about a saved URL: what is it, and what should its
//! preview look like.
//!
//! ## Features
//!
//! - Pure, total URL classification into platform, content type (channel or
//!   video) and video subtype (shorts or long-form)
//! - Best-effort metadata resolution with platform-specific strategies:
//!   - TikTok oEmbed and embedded profile JSON
//!   - Instagram and TikTok scraping with a link-preview bot user agent
//!   - Generic Open Graph / Twitter card / `<title>` scraping
//! - Graceful degradation: resolution never fails, it only gets plainer
//! - Storable channel/video records built from both
//!
//! ## Example
//!
//! ```rust,no_run
//! use benchbox::{classify, MetadataResolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://www.instagram.com/reel/ABC123/";
//!     let classification = classify(url);
//!
//!     let resolver = MetadataResolver::new(ResolverConfig::default())?;
//!     let metadata = resolver.resolve(url, classification.platform).await;
//!
//!     println!("{:?} -> {}", classification.content_type, metadata.title);
//!     Ok(())
//! }
//! ```

mod error;
pub mod classifier;
pub mod record;
pub mod resolver;

pub use classifier::{
    classify, classify_target, is_valid_url, ClassificationResult, ContentType, LinkKind,
    LinkTarget, Platform, VideoSubtype,
};
pub use error::{Error, Result};
pub use record::{enrich, EntryKind, EntryRecord, Placement};
pub use resolver::{MetadataResolver, MetadataResult, ResolverConfig};
