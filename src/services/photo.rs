// src/services/photo.rs

//! Lazy photo resolution for listings the search result gave no image.
//!
//! Fetches the listing detail page and looks for an `img` whose `title`
//! attribute matches the listing title. The outcome, including "no photo",
//! is cached on the listing so resolution runs at most once.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Listing, PhotoConfig};
use crate::services::search::Marketplace;

/// Resolve the photo for `listing`, fetching its detail page if needed.
///
/// Up to `max_attempts` fetches; a transient fetch failure consumes an
/// attempt. All attempts exhausted or no matching image yields `None`.
pub async fn resolve_photo(
    market: &dyn Marketplace,
    listing: &Listing,
    config: &PhotoConfig,
) -> Result<Option<String>> {
    listing.validate()?;

    if listing.photo_resolved() {
        return Ok(listing.photo_url().map(str::to_string));
    }

    let mut found = None;
    for attempt in 1..=config.max_attempts {
        match market.detail_page(&listing.url).await {
            Ok(html) => {
                found = find_titled_image(&html, &listing.title)?;
                break;
            }
            Err(error) => {
                log::warn!(
                    "photo fetch attempt {attempt}/{} failed for {}: {error}",
                    config.max_attempts,
                    listing.url
                );
                if config.retry_delay_ms > 0 && attempt < config.max_attempts {
                    tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
                }
            }
        }
    }

    listing.set_photo_url(found);
    Ok(listing.photo_url().map(str::to_string))
}

/// The `src` of the last `img` whose `title` attribute equals `title`.
///
/// Detail pages repeat the main image in a carousel; the last occurrence
/// is the full-size variant.
fn find_titled_image(html: &str, title: &str) -> Result<Option<String>> {
    let selector = Selector::parse("img[title]")
        .map_err(|e| AppError::selector("img[title]", format!("{e:?}")))?;

    let document = Html::parse_document(html);
    let src = document
        .select(&selector)
        .filter(|img| img.value().attr("title") == Some(title))
        .filter_map(|img| img.value().attr("src"))
        .last()
        .map(str::to_string);

    Ok(src)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::search::{ListingCard, SearchRequest};

    struct FakeMarket {
        pages: Mutex<Vec<Result<String>>>,
        fetches: Mutex<usize>,
    }

    impl FakeMarket {
        fn new(pages: Vec<Result<String>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                fetches: Mutex::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl Marketplace for FakeMarket {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<ListingCard>> {
            Ok(Vec::new())
        }

        async fn search_page(&self, _term: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn detail_page(&self, _url: &str) -> Result<String> {
            *self.fetches.lock().unwrap() += 1;
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(String::new())
            } else {
                pages.remove(0)
            }
        }
    }

    fn listing() -> Listing {
        let mut listing = Listing::new("123", "https://market.example/p/123");
        listing.title = "Denim jacket".to_string();
        listing
    }

    fn config() -> PhotoConfig {
        PhotoConfig {
            max_attempts: 2,
            retry_delay_ms: 0,
        }
    }

    fn network_error() -> AppError {
        AppError::store("fake network failure")
    }

    #[tokio::test]
    async fn takes_last_matching_image() {
        let html = r#"
            <img title="Denim jacket" src="https://cdn.example/thumb.jpg">
            <img title="Other item" src="https://cdn.example/other.jpg">
            <img title="Denim jacket" src="https://cdn.example/full.jpg">
        "#;
        let market = FakeMarket::new(vec![Ok(html.to_string())]);

        let listing = listing();
        let photo = resolve_photo(&market, &listing, &config()).await.unwrap();

        assert_eq!(photo.as_deref(), Some("https://cdn.example/full.jpg"));
        assert_eq!(listing.photo_url(), Some("https://cdn.example/full.jpg"));
        assert_eq!(market.fetch_count(), 1);
    }

    #[tokio::test]
    async fn no_match_caches_absence() {
        let market = FakeMarket::new(vec![Ok("<img title='x' src='y'>".to_string())]);

        let listing = listing();
        let photo = resolve_photo(&market, &listing, &config()).await.unwrap();

        assert_eq!(photo, None);
        assert!(listing.photo_resolved());
    }

    #[tokio::test]
    async fn retries_after_fetch_failure() {
        let html = r#"<img title="Denim jacket" src="https://cdn.example/a.jpg">"#;
        let market = FakeMarket::new(vec![Err(network_error()), Ok(html.to_string())]);

        let listing = listing();
        let photo = resolve_photo(&market, &listing, &config()).await.unwrap();

        assert_eq!(photo.as_deref(), Some("https://cdn.example/a.jpg"));
        assert_eq!(market.fetch_count(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let market = FakeMarket::new(vec![Err(network_error()), Err(network_error())]);

        let listing = listing();
        let photo = resolve_photo(&market, &listing, &config()).await.unwrap();

        assert_eq!(photo, None);
        assert!(listing.photo_resolved());
        assert_eq!(market.fetch_count(), 2);
    }

    #[tokio::test]
    async fn cached_result_skips_fetching() {
        let market = FakeMarket::new(vec![]);
        let listing = listing();
        listing.set_photo_url(Some("https://cdn.example/cached.jpg".to_string()));

        let photo = resolve_photo(&market, &listing, &config()).await.unwrap();

        assert_eq!(photo.as_deref(), Some("https://cdn.example/cached.jpg"));
        assert_eq!(market.fetch_count(), 0);
    }

    #[tokio::test]
    async fn invalid_listing_is_rejected() {
        let market = FakeMarket::new(vec![]);
        let listing = Listing::new("1", "https://market.example/p/1");

        let err = resolve_photo(&market, &listing, &config())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TitleRequired));
    }
}
