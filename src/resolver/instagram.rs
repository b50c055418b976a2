//! Instagram: bot user agent page fetch plus og:* tags

use super::html::{absolutize, ParsedPage};
use super::title::{clean_title, instagram_username};
use super::{MetadataResolver, MetadataResult};
use crate::resolver::error::ResolveError;

pub(super) async fn resolve(
    resolver: &MetadataResolver,
    url: &str,
) -> Result<MetadataResult, ResolveError> {
    let body = resolver
        .fetch_html(url, &resolver.config().bot_user_agent)
        .await?;
    let meta = ParsedPage::parse(&body, &[])?.meta;

    let mut title = clean_title(meta.og_title.as_deref().unwrap_or_default());
    if title.is_empty() {
        title = instagram_username(url).unwrap_or_else(|| "Instagram".to_string());
    }

    Ok(MetadataResult {
        title,
        description: meta.og_description.unwrap_or_default(),
        thumbnail: meta
            .og_image
            .map(|image| absolutize(url, &image))
            .unwrap_or_default(),
        site_name: meta.og_site_name.unwrap_or_default(),
    })
}
