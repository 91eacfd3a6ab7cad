//! Utility functions and helpers.

pub mod http;
pub mod text;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract a stable listing identifier from a detail-page URL.
///
/// Detail slugs end with the numeric listing id ("/p/nike-air-max-123456"),
/// so a trailing digit run wins; otherwise the whole last segment is the id.
pub fn extract_listing_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())?;

    let digits: String = last
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() {
        Some(last.to_string())
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://market.example/search").unwrap();
        assert_eq!(
            resolve_url(&base, "/p/item-123"),
            "https://market.example/p/item-123"
        );
        assert_eq!(
            resolve_url(&base, "https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_extract_listing_id_trailing_digits() {
        assert_eq!(
            extract_listing_id("https://market.example/p/nike-air-max-123456"),
            Some("123456".to_string())
        );
    }

    #[test]
    fn test_extract_listing_id_plain_segment() {
        assert_eq!(
            extract_listing_id("https://market.example/p/abcdef"),
            Some("abcdef".to_string())
        );
    }

    #[test]
    fn test_extract_listing_id_ignores_trailing_slash() {
        assert_eq!(
            extract_listing_id("https://market.example/p/987/"),
            Some("987".to_string())
        );
    }
}
