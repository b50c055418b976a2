//! TikTok: oEmbed for videos, otherwise bot user agent scraping with the
//! embedded profile JSON taking precedence over og:* tags.

use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::html::{absolutize, ParsedPage};
use super::title::{clean_title, tiktok_username};
use super::{MetadataResolver, MetadataResult};
use crate::resolver::error::ResolveError;

const SITE_NAME: &str = "TikTok";

/// Script holding the current rehydration payload
const UNIVERSAL_DATA_SCRIPT: &str = "__UNIVERSAL_DATA_FOR_REHYDRATION__";

/// Script holding the legacy app state payload
const SIGI_STATE_SCRIPT: &str = "SIGI_STATE";

pub(super) async fn resolve(
    resolver: &MetadataResolver,
    url: &str,
) -> Result<MetadataResult, ResolveError> {
    if url.contains("/video/") {
        if let Some(result) = fetch_oembed(resolver, url).await {
            return Ok(result);
        }
    }

    let body = resolver
        .fetch_html(url, &resolver.config().bot_user_agent)
        .await?;
    let page = ParsedPage::parse(&body, &[UNIVERSAL_DATA_SCRIPT, SIGI_STATE_SCRIPT])?;

    let mut result = MetadataResult {
        title: page.meta.og_title.clone().unwrap_or_default(),
        description: page.meta.og_description.clone().unwrap_or_default(),
        thumbnail: page.meta.og_image.clone().unwrap_or_default(),
        site_name: page
            .meta
            .og_site_name
            .clone()
            .unwrap_or_else(|| SITE_NAME.to_string()),
    };

    let profiles = [
        page.script(UNIVERSAL_DATA_SCRIPT).and_then(universal_profile),
        page.script(SIGI_STATE_SCRIPT).and_then(sigi_profile),
    ];
    for profile in profiles.into_iter().flatten() {
        profile.apply(&mut result);
    }

    result.title = clean_title(&result.title);
    if result.title.is_empty() {
        result.title = tiktok_username(url).unwrap_or_else(|| SITE_NAME.to_string());
    }
    if !result.thumbnail.is_empty() {
        result.thumbnail = absolutize(url, &result.thumbnail);
    }

    Ok(result)
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

/// oEmbed lookup. Any failure is logged and reported as `None`.
async fn fetch_oembed(resolver: &MetadataResolver, url: &str) -> Option<MetadataResult> {
    match request_oembed(resolver, url).await {
        Ok(result) => Some(result),
        Err(e) => {
            debug!("TikTok oEmbed failed for {}: {}", url, e);
            None
        }
    }
}

async fn request_oembed(
    resolver: &MetadataResolver,
    url: &str,
) -> Result<MetadataResult, ResolveError> {
    let config = resolver.config();
    let response = resolver
        .client()
        .get(&config.tiktok_oembed_endpoint)
        .query(&[("url", url)])
        .header(USER_AGENT, &config.user_agent)
        .timeout(config.oembed_timeout())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::Status {
            status: status.as_u16(),
            url: config.tiktok_oembed_endpoint.clone(),
        });
    }

    let body = response.text().await?;
    let oembed: OEmbedResponse = serde_json::from_str(&body)?;

    let author = non_empty(oembed.author_name);
    let title = non_empty(oembed.title)
        .or_else(|| author.clone())
        .ok_or_else(|| ResolveError::Incomplete("oEmbed without title or author".to_string()))?;

    Ok(MetadataResult {
        title,
        description: author.map(|a| format!("by {a}")).unwrap_or_default(),
        thumbnail: non_empty(oembed.thumbnail_url).unwrap_or_default(),
        site_name: SITE_NAME.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// User record embedded in a TikTok page
#[derive(Debug, Default, PartialEq, Eq)]
struct Profile {
    nickname: String,
    signature: String,
    avatar_larger: String,
    avatar_medium: String,
    avatar_thumb: String,
}

impl Profile {
    /// Read the known fields; missing, null or non-string values are empty
    fn from_user(user: &Value) -> Self {
        let field = |key: &str| {
            user.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            nickname: field("nickname"),
            signature: field("signature"),
            avatar_larger: field("avatarLarger"),
            avatar_medium: field("avatarMedium"),
            avatar_thumb: field("avatarThumb"),
        }
    }

    /// Overwrite the fields this profile has values for
    fn apply(&self, result: &mut MetadataResult) {
        if !self.nickname.trim().is_empty() {
            result.title = self.nickname.trim().to_string();
        }
        if !self.signature.trim().is_empty() {
            result.description = self.signature.trim().to_string();
        }
        if let Some(avatar) = [&self.avatar_larger, &self.avatar_medium, &self.avatar_thumb]
            .into_iter()
            .find(|a| !a.is_empty())
        {
            result.thumbnail = avatar.clone();
        }
    }
}

fn parse_json(raw: &str, source: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring malformed {} payload: {}", source, e);
            None
        }
    }
}

fn to_profile(user: &Value) -> Option<Profile> {
    user.is_object().then(|| Profile::from_user(user))
}

/// First user in `__DEFAULT_SCOPE__`, preferring the user-detail scope
fn universal_profile(raw: &str) -> Option<Profile> {
    let data = parse_json(raw, UNIVERSAL_DATA_SCRIPT)?;
    let scope = data.get("__DEFAULT_SCOPE__")?;

    scope
        .pointer("/webapp.user-detail/userInfo/user")
        .or_else(|| {
            scope
                .as_object()?
                .values()
                .find_map(|entry| entry.pointer("/userInfo/user"))
        })
        .and_then(to_profile)
}

/// First entry of `UserModule.users`
fn sigi_profile(raw: &str) -> Option<Profile> {
    let data = parse_json(raw, SIGI_STATE_SCRIPT)?;

    data.pointer("/UserModule/users")?
        .as_object()?
        .values()
        .next()
        .and_then(to_profile)
}
