//! # Resolver Configuration Module
//!
//! Timeouts, user agents and endpoints used by the metadata resolver, with a
//! builder for programmatic setup and an environment overlay for the CLI.
//!
//! ## Key Components
//!
//! - `ResolverConfig`: the configuration values
//! - `ResolverConfigBuilder`: builder pattern implementation
//!
//! ## Environment
//!
//! `ResolverConfig::from_env` overlays these variables on the defaults:
//!
//! - `BENCHBOX_USER_AGENT`
//! - `BENCHBOX_BOT_USER_AGENT`
//! - `BENCHBOX_TIKTOK_OEMBED_URL`
//! - `BENCHBOX_SCRAPE_TIMEOUT_SECS`
//! - `BENCHBOX_OEMBED_TIMEOUT_SECS`

use std::time::Duration;
use tracing::warn;

/// Crawler-style user agent announced on generic page fetches
fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; BenchBoxBot/{}; link preview)",
        env!("CARGO_PKG_VERSION")
    )
}

/// User agent of a well-known link-preview crawler. TikTok and Instagram
/// serve server-rendered meta tags to it.
pub const BOT_USER_AGENT: &str =
    "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)";

pub const TIKTOK_OEMBED_ENDPOINT: &str = "https://www.tiktok.com/oembed";

/// Configuration for the metadata resolver
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// User agent for generic page fetches
    pub user_agent: String,

    /// User agent for TikTok and Instagram page fetches
    pub bot_user_agent: String,

    /// Timeout for page fetches in seconds
    pub scrape_timeout_secs: u64,

    /// Timeout for oEmbed calls in seconds
    pub oembed_timeout_secs: u64,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// TikTok oEmbed endpoint; the target URL is passed as `?url=`
    pub tiktok_oembed_endpoint: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            bot_user_agent: BOT_USER_AGENT.to_string(),
            scrape_timeout_secs: 15,
            oembed_timeout_secs: 10,
            max_redirects: 5,
            tiktok_oembed_endpoint: TIKTOK_OEMBED_ENDPOINT.to_string(),
        }
    }
}

/// Builder for ResolverConfig
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Set the user agent for generic page fetches
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the user agent for TikTok and Instagram page fetches
    pub fn bot_user_agent(mut self, bot_user_agent: impl Into<String>) -> Self {
        self.config.bot_user_agent = bot_user_agent.into();
        self
    }

    /// Set the page fetch timeout in seconds
    pub fn scrape_timeout_secs(mut self, secs: u64) -> Self {
        self.config.scrape_timeout_secs = secs;
        self
    }

    /// Set the oEmbed timeout in seconds
    pub fn oembed_timeout_secs(mut self, secs: u64) -> Self {
        self.config.oembed_timeout_secs = secs;
        self
    }

    /// Set the maximum number of redirects to follow
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// Set the TikTok oEmbed endpoint
    pub fn tiktok_oembed_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.tiktok_oembed_endpoint = endpoint.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl ResolverConfig {
    /// Create a new builder
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }

    /// Defaults overlaid with `BENCHBOX_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(user_agent) = lookup("BENCHBOX_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(bot_user_agent) = lookup("BENCHBOX_BOT_USER_AGENT") {
            config.bot_user_agent = bot_user_agent;
        }
        if let Some(endpoint) = lookup("BENCHBOX_TIKTOK_OEMBED_URL") {
            config.tiktok_oembed_endpoint = endpoint;
        }
        if let Some(secs) = parse_secs(&lookup, "BENCHBOX_SCRAPE_TIMEOUT_SECS") {
            config.scrape_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "BENCHBOX_OEMBED_TIMEOUT_SECS") {
            config.oembed_timeout_secs = secs;
        }

        config
    }

    /// Get the page fetch timeout as a Duration
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }

    /// Get the oEmbed timeout as a Duration
    pub fn oembed_timeout(&self) -> Duration {
        Duration::from_secs(self.oembed_timeout_secs)
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(secs) => Some(secs),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
