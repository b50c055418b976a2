//! Generic Open Graph / Twitter card scraping

use tracing::debug;

use super::html::{absolutize, MetaTags, ParsedPage};
use super::title::UNTITLED;
use super::{MetadataResolver, MetadataResult};
use crate::resolver::error::ResolveError;

/// Fetch the page with the crawler user agent and read its preview tags.
pub(super) async fn resolve(
    resolver: &MetadataResolver,
    url: &str,
) -> Result<MetadataResult, ResolveError> {
    let body = resolver
        .fetch_html(url, &resolver.config().user_agent)
        .await?;
    let page = ParsedPage::parse(&body, &[])?;
    debug!("Generic meta for {}: {:?}", url, page.meta);

    Ok(from_meta(url, &page.meta))
}

fn from_meta(url: &str, meta: &MetaTags) -> MetadataResult {
    MetadataResult {
        title: meta.title().unwrap_or(UNTITLED).to_string(),
        description: meta.description().unwrap_or_default().to_string(),
        thumbnail: meta
            .image()
            .map(|image| absolutize(url, image))
            .unwrap_or_default(),
        site_name: meta.site_name().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_meta_is_untitled() {
        let result = from_meta("https://example.com/", &MetaTags::default());
        assert_eq!(result.title, "Untitled");
        assert_eq!(result.description, "");
        assert_eq!(result.thumbnail, "");
        assert_eq!(result.site_name, "");
    }
}
