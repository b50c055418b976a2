//! Meta tag and embedded script extraction
//!
//! Parsing happens synchronously and produces owned strings, so the parsed
//! document never lives across an `.await`.

use std::collections::HashMap;

use scraper::{Html, Selector};
use url::Url;

use crate::resolver::error::ResolveError;

/// Preview-related meta tags found in a page. Values are trimmed and
/// empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MetaTags {
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_site_name: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub document_title: Option<String>,
    pub meta_description: Option<String>,
}

impl MetaTags {
    /// og:title, then twitter:title, then `<title>`
    pub fn title(&self) -> Option<&str> {
        self.og_title
            .as_deref()
            .or(self.twitter_title.as_deref())
            .or(self.document_title.as_deref())
    }

    /// og:description, then twitter:description, then `<meta name="description">`
    pub fn description(&self) -> Option<&str> {
        self.og_description
            .as_deref()
            .or(self.twitter_description.as_deref())
            .or(self.meta_description.as_deref())
    }

    /// og:image, then twitter:image
    pub fn image(&self) -> Option<&str> {
        self.og_image.as_deref().or(self.twitter_image.as_deref())
    }

    pub fn site_name(&self) -> Option<&str> {
        self.og_site_name.as_deref()
    }
}

/// A parsed page: its meta tags plus the raw text of any requested
/// `<script id="...">` elements.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedPage {
    pub meta: MetaTags,
    scripts: HashMap<String, String>,
}

impl ParsedPage {
    /// Parse `html`, capturing the text of the scripts whose ids are listed.
    pub fn parse(html: &str, script_ids: &[&str]) -> Result<Self, ResolveError> {
        let document = Html::parse_document(html);

        let meta = MetaTags {
            og_title: meta_content(&document, "og:title")?,
            og_description: meta_content(&document, "og:description")?,
            og_image: meta_content(&document, "og:image")?,
            og_site_name: meta_content(&document, "og:site_name")?,
            twitter_title: meta_content(&document, "twitter:title")?,
            twitter_description: meta_content(&document, "twitter:description")?,
            twitter_image: meta_content(&document, "twitter:image")?,
            document_title: first_text(&document, "title")?,
            meta_description: meta_content(&document, "description")?,
        };

        let mut scripts = HashMap::new();
        for id in script_ids {
            if let Some(text) = first_text(&document, &format!("script#{id}"))? {
                scripts.insert(id.to_string(), text);
            }
        }

        Ok(Self { meta, scripts })
    }

    /// Raw text of an embedded script captured by `parse`
    pub fn script(&self, id: &str) -> Option<&str> {
        self.scripts.get(id).map(String::as_str)
    }
}

fn selector(css: &str) -> Result<Selector, ResolveError> {
    Selector::parse(css)
        .map_err(|e| ResolveError::HtmlParse(format!("Failed to parse selector '{}': {}", css, e)))
}

/// Content of the first non-empty `<meta>` whose `property` or `name` is `key`
fn meta_content(document: &Html, key: &str) -> Result<Option<String>, ResolveError> {
    let selector = selector(&format!(r#"meta[property="{key}"], meta[name="{key}"]"#))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from))
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>, ResolveError> {
    let selector = selector(css)?;

    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Resolve a possibly relative image reference against the page URL
pub(crate) fn absolutize(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html><head>
  <title> Plain Title </title>
  <meta name="description" content="plain description">
  <meta property="og:title" content="OG &amp; Title">
  <meta property="og:description" content="   ">
  <meta name="twitter:description" content="twitter description">
  <meta name="twitter:image" content="/img/card.png">
  <meta property="og:site_name" content="Example">
</head><body>
  <script id="DATA" type="application/json">{"a": 1}</script>
</body></html>"#;

    #[test]
    fn test_priority_order() {
        let page = ParsedPage::parse(PAGE, &[]).unwrap();

        assert_eq!(page.meta.title(), Some("OG & Title"));
        // blank og:description falls through to twitter
        assert_eq!(page.meta.description(), Some("twitter description"));
        assert_eq!(page.meta.image(), Some("/img/card.png"));
        assert_eq!(page.meta.site_name(), Some("Example"));
        assert_eq!(page.meta.document_title.as_deref(), Some("Plain Title"));
        assert_eq!(page.meta.meta_description.as_deref(), Some("plain description"));
    }

    #[test]
    fn test_title_tag_fallback() {
        let page = ParsedPage::parse("<html><head><title>Only</title></head></html>", &[]).unwrap();
        assert_eq!(page.meta.title(), Some("Only"));
        assert_eq!(page.meta.description(), None);
        assert_eq!(page.meta.image(), None);
    }

    #[test]
    fn test_scripts_by_id() {
        let page = ParsedPage::parse(PAGE, &["DATA", "MISSING"]).unwrap();
        assert_eq!(page.script("DATA"), Some(r#"{"a": 1}"#));
        assert_eq!(page.script("MISSING"), None);
    }

    #[test]
    fn test_not_html_at_all() {
        let page = ParsedPage::parse("{\"json\": true}", &[]).unwrap();
        assert_eq!(page.meta, MetaTags::default());
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://example.com/a/b", "/img/card.png"),
            "https://example.com/img/card.png"
        );
        assert_eq!(
            absolutize("https://example.com/a/b", "https://cdn.example.com/x.jpg"),
            "https://cdn.example.com/x.jpg"
        );
        assert_eq!(absolutize("not a url", "x.jpg"), "x.jpg");
    }
}
