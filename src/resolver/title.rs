//! Title cleanup and URL-derived fallback titles

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::classifier::Platform;

/// Segments skipped when guessing an Instagram username for a fallback title.
///
/// Unlike the classifier's list this one does not contain `direct`.
/// Both lists are kept as they are until the difference is settled.
pub(crate) const INSTAGRAM_FALLBACK_RESERVED: &[&str] = &["p", "reel", "reels", "stories", "explore"];

pub(crate) const UNTITLED: &str = "Untitled";

static PLATFORM_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*\|\s*TikTok\s*$",
        r"(?i)\s+on\s+TikTok\s*$",
        r"(?i)\s*•\s*Instagram.*$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap_or_else(|e| panic!("invalid suffix pattern: {e}")))
    .collect()
});

static AUTHOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(@[^)]*\)").unwrap_or_else(|e| panic!("invalid author tag pattern: {e}"))
});

static TIKTOK_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([\w.-]+)").unwrap_or_else(|e| panic!("invalid handle pattern: {e}"))
});

/// Strip platform branding from a scraped TikTok or Instagram title.
///
/// `"Jane Doe (@janedoe) | TikTok"` becomes `"Jane Doe"`.
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();

    for suffix in PLATFORM_SUFFIXES.iter() {
        title = suffix.replace(&title, "").into_owned();
    }
    title = AUTHOR_TAG.replace_all(&title, "").into_owned();

    let mut title = title.trim();
    // unbalanced parentheses left over from the author tag
    if title.starts_with('(') && !title.contains(')') {
        title = title[1..].trim_start();
    }
    if title.ends_with(')') && !title.contains('(') {
        title = title[..title.len() - 1].trim_end();
    }

    title.trim().to_string()
}

/// `@handle` from a TikTok URL
pub fn tiktok_username(url: &str) -> Option<String> {
    TIKTOK_HANDLE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|handle| format!("@{}", handle.as_str()))
}

/// `@username` from the first path segment of an Instagram URL
pub fn instagram_username(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let segment = parsed.path_segments()?.find(|s| !s.is_empty())?;

    if INSTAGRAM_FALLBACK_RESERVED
        .iter()
        .any(|word| word.eq_ignore_ascii_case(segment))
    {
        return None;
    }

    Some(format!("@{segment}"))
}

/// Platform username if one can be read off the URL
pub(crate) fn username_for(url: &str, platform: Platform) -> Option<String> {
    match platform {
        Platform::Tiktok => tiktok_username(url),
        Platform::Instagram => instagram_username(url),
        _ => None,
    }
}

/// Title synthesized from the URL alone: username, else hostname, else
/// `"Untitled"`. Never empty.
pub fn fallback_title(url: &str, platform: Platform) -> String {
    username_for(url, platform)
        .or_else(|| {
            Url::parse(url.trim())
                .ok()
                .and_then(|parsed| parsed.host_str().map(str::to_string))
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Jane Doe (@janedoe) | TikTok"), "Jane Doe");
        assert_eq!(clean_title("Jane Doe (@janedoe) on TikTok"), "Jane Doe");
        assert_eq!(
            clean_title("Jane Doe (@janedoe) • Instagram photos and videos"),
            "Jane Doe"
        );
        assert_eq!(clean_title("cooking hacks | tiktok"), "cooking hacks");
        assert_eq!(clean_title("  Just a title  "), "Just a title");
        assert_eq!(clean_title("(@janedoe)"), "");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn test_clean_title_keeps_balanced_parentheses() {
        assert_eq!(clean_title("Song (Remix) | TikTok"), "Song (Remix)");
        assert_eq!(clean_title("(Leftover | TikTok"), "Leftover");
        assert_eq!(clean_title("Leftover) | TikTok"), "Leftover");
    }

    #[test]
    fn test_tiktok_username() {
        assert_eq!(
            tiktok_username("https://www.tiktok.com/@jane.doe/video/123"),
            Some("@jane.doe".to_string())
        );
        assert_eq!(tiktok_username("https://vt.tiktok.com/ZSabc/"), None);
    }

    #[test]
    fn test_instagram_username() {
        assert_eq!(
            instagram_username("https://www.instagram.com/natgeo/"),
            Some("@natgeo".to_string())
        );
        assert_eq!(instagram_username("https://www.instagram.com/reel/ABC123/"), None);
        assert_eq!(instagram_username("https://www.instagram.com/p/ABC123/"), None);
        assert_eq!(instagram_username("https://www.instagram.com/"), None);
        // `direct` is not in the fallback list
        assert_eq!(
            instagram_username("https://www.instagram.com/direct/inbox/"),
            Some("@direct".to_string())
        );
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(
            fallback_title("https://www.tiktok.com/@janedoe", Platform::Tiktok),
            "@janedoe"
        );
        assert_eq!(
            fallback_title("https://www.instagram.com/reel/ABC123/", Platform::Instagram),
            "www.instagram.com"
        );
        assert_eq!(
            fallback_title("https://www.tiktok.com/@janedoe", Platform::Youtube),
            "www.tiktok.com"
        );
        assert_eq!(fallback_title("not a url", Platform::Other), "Untitled");
        assert_eq!(fallback_title("mailto:someone", Platform::Other), "Untitled");
    }
}
