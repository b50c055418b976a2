//! # Metadata Resolver
//!
//! Fetches preview metadata (title, description, thumbnail, site name) for a
//! saved link. Resolution is best-effort: every network, status or parse
//! failure is caught here and turned into a plain result whose title is
//! derived from the URL itself, so callers never see an error.
//!
//! ## Strategies
//!
//! - TikTok: oEmbed for video URLs, then a bot user agent page fetch where
//!   embedded profile JSON overrides the og:* tags
//! - Instagram: bot user agent page fetch, og:* tags
//! - Everything else: generic Open Graph / Twitter card / `<title>` scraping
//!
//! TikTok and Instagram titles go through `clean_title`; when they end up
//! empty the `@username` from the URL (or the platform name) is used.
//!
//! Each resolution is a one-shot fetch with a fixed timeout and no retries.
//! The `reqwest::Client` is shared between calls only for connection reuse.

mod config;
mod error;
mod generic;
mod html;
mod instagram;
mod tiktok;
mod title;

pub use config::{ResolverConfig, ResolverConfigBuilder, BOT_USER_AGENT, TIKTOK_OEMBED_ENDPOINT};
pub use error::ResolveError;
pub use title::{clean_title, fallback_title, instagram_username, tiktok_username};

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::classifier::{classify, Platform};
use crate::error::Result;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Normalized preview metadata for a link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResult {
    /// Never empty
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub site_name: String,
}

impl MetadataResult {
    /// Degraded result used when resolution fails outright
    pub fn fallback(url: &str, platform: Platform) -> Self {
        Self {
            title: fallback_title(url, platform),
            description: String::new(),
            thumbnail: String::new(),
            site_name: platform.as_str().to_string(),
        }
    }
}

/// Resolves preview metadata for links
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    client: reqwest::Client,
    config: ResolverConfig,
}

impl MetadataResolver {
    /// Create a resolver; fails only if the HTTP client cannot be built
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Resolver configured from `BENCHBOX_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ResolverConfig::from_env())
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolve metadata using the strategy for `platform`.
    ///
    /// Never fails: on any error the result carries a URL-derived title,
    /// empty description and thumbnail, and the platform as site name.
    /// That site name is the normalized identifier (`Platform::as_str`), so a
    /// hint such as `"TikTok"` comes back as `"tiktok"`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, url: &str, platform: Platform) -> MetadataResult {
        let url = url.trim();
        match self.run_strategy(url, platform).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Metadata resolution failed for {}: {}", url, e);
                MetadataResult::fallback(url, platform)
            }
        }
    }

    /// Classify `url` and resolve it with the detected platform
    pub async fn resolve_url(&self, url: &str) -> MetadataResult {
        let platform = classify(url).platform;
        self.resolve(url, platform).await
    }

    /// Like `resolve`, but surfaces the failure instead of degrading
    #[instrument(skip(self))]
    pub async fn try_resolve(&self, url: &str, platform: Platform) -> Result<MetadataResult> {
        Ok(self.run_strategy(url.trim(), platform).await?)
    }

    async fn run_strategy(
        &self,
        url: &str,
        platform: Platform,
    ) -> std::result::Result<MetadataResult, ResolveError> {
        debug!("Resolving {} with {} strategy", url, platform);
        match platform {
            Platform::Tiktok => tiktok::resolve(self, url).await,
            Platform::Instagram => instagram::resolve(self, url).await,
            _ => generic::resolve(self, url).await,
        }
    }

    /// GET a page as text with browser-like Accept headers
    pub(crate) async fn fetch_html(
        &self,
        url: &str,
        user_agent: &str,
    ) -> std::result::Result<String, ResolveError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .timeout(self.config.scrape_timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::{Matcher, Server};
    use std::net::TcpListener;

    /// A local address nothing is listening on
    fn refused_url(path: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}{path}")
    }

    fn resolver() -> MetadataResolver {
        MetadataResolver::new(ResolverConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_generic_scrape() {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/article")
            .match_header("user-agent", Matcher::Regex("BenchBoxBot".into()))
            .match_header("accept", Matcher::Regex("text/html".into()))
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(
                r#"<html><head>
                <title>Fallback</title>
                <meta name="twitter:title" content="Card Title">
                <meta name="description" content="A description">
                <meta property="og:image" content="/thumb.png">
                <meta property="og:site_name" content="Example Site">
                </head></html>"#,
            )
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/article", server.url());
        let result = resolver().resolve(&url, Platform::Other).await;

        assert_eq!(result.title, "Card Title");
        assert_eq!(result.description, "A description");
        assert_eq!(result.thumbnail, format!("{}/thumb.png", server.url()));
        assert_eq!(result.site_name, "Example Site");
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_youtube_uses_generic_strategy() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/watch")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"<meta property="og:title" content="Video | TikTok">"#)
            .create_async()
            .await;

        let url = format!("{}/watch?v=abc", server.url());
        let result = resolver().resolve(&url, Platform::Youtube).await;

        // no platform title cleanup outside TikTok/Instagram
        assert_eq!(result.title, "Video | TikTok");
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let mut server = Server::new_async().await;
        let _moved = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _page = server
            .mock("GET", "/new")
            .with_status(200)
            .with_body("<title>Moved here</title>")
            .create_async()
            .await;

        let url = format!("{}/old", server.url());
        assert_eq!(resolver().resolve(&url, Platform::Other).await.title, "Moved here");
    }

    #[tokio::test]
    async fn test_redirect_limit_degrades() {
        let mut server = Server::new_async().await;
        let _loop = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .create_async()
            .await;

        let url = format!("{}/loop", server.url());
        let result = resolver().resolve(&url, Platform::Other).await;

        assert_eq!(result.title, "127.0.0.1");
        assert_eq!(result.site_name, "other");
    }

    #[tokio::test]
    async fn test_error_status_degrades() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/@janedoe")
            .with_status(403)
            .with_body("<title>Blocked</title>")
            .create_async()
            .await;

        let url = format!("{}/@janedoe", server.url());
        let result = resolver().resolve(&url, Platform::Tiktok).await;

        assert_eq!(result.title, "@janedoe");
        assert_eq!(result.description, "");
        assert_eq!(result.thumbnail, "");
        assert_eq!(result.site_name, "tiktok");
    }

    #[tokio::test]
    async fn test_connection_refused_degrades() {
        let url = refused_url("/some/page");
        let result = resolver().resolve(&url, Platform::Other).await;

        assert_eq!(result.title, "127.0.0.1");
        assert_eq!(result.description, "");
        assert_eq!(result.thumbnail, "");
        assert_eq!(result.site_name, "other");
    }

    #[tokio::test]
    async fn test_fallback_site_name_is_normalized_hint() {
        let url = refused_url("/@janedoe");
        let result = resolver().resolve(&url, Platform::from_hint("TikTok")).await;
        assert_eq!(result.site_name, "tiktok");

        let result = resolver().resolve(&url, Platform::from_hint("vimeo")).await;
        assert_eq!(result.site_name, "other");
    }

    #[tokio::test]
    async fn test_resolve_url_detects_platform() {
        let url = refused_url("/@janedoe");
        // a local address is not a TikTok URL, so the generic fallback applies
        let result = resolver().resolve_url(&url).await;
        assert_eq!(result.title, "127.0.0.1");
        assert_eq!(result.site_name, "other");
    }

    #[tokio::test]
    async fn test_unparseable_url_degrades() {
        let result = resolver().resolve("not a url", Platform::Other).await;
        assert_eq!(result.title, "Untitled");
    }

    #[tokio::test]
    async fn test_try_resolve_surfaces_errors() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/gone")
            .with_status(410)
            .create_async()
            .await;

        let url = format!("{}/gone", server.url());
        let err = resolver().try_resolve(&url, Platform::Other).await.unwrap_err();
        assert!(matches!(err, Error::Resolve(_)));

        let err = resolver()
            .try_resolve(&refused_url("/"), Platform::Other)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn test_fallback_result() {
        let result = MetadataResult::fallback("https://www.instagram.com/natgeo/", Platform::Instagram);
        assert_eq!(result.title, "@natgeo");
        assert_eq!(result.site_name, "instagram");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["siteName"], "instagram");
    }
}
