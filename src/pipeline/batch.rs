// src/pipeline/batch.rs

//! Sequential batch driver: search, filter, dedup, deliver.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Config, Listing};
use crate::pipeline::recency::filter_recent;
use crate::render;
use crate::services::{
    DeliveryClient, Marketplace, SearchRequest, extract, parse_search_markup, photo,
};
use crate::store::SeenStore;

/// Counters for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Terms actually searched this run
    pub terms_run: usize,
    /// Terms whose search request failed outright
    pub search_failures: usize,
    /// Raw result cards across all searched terms
    pub fetched: usize,
    /// Listings that survived the recency filter
    pub recent: usize,
    /// Listings skipped because the seen store already had them
    pub skipped_seen: usize,
    /// Listings dropped for failing validation
    pub dropped_invalid: usize,
    /// Notifications confirmed delivered and marked seen
    pub delivered: usize,
    /// Delivery attempts that failed; the listing stays unseen
    pub delivery_failures: usize,
}

/// Run one batch over the configured terms, in config order.
///
/// Per term: search, extract, recency-filter, then walk the survivors in
/// result order. A listing is marked seen only after its notification is
/// confirmed delivered; a failed delivery is logged and the listing is
/// left for the next run. A failed search skips that term only.
///
/// With `dry_run` set, nothing is sent and nothing is marked seen.
pub async fn run_batch(
    config: &Config,
    market: &dyn Marketplace,
    store: &dyn SeenStore,
    delivery: &dyn DeliveryClient,
    dry_run: bool,
) -> Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();
    let ttl = Duration::from_secs(config.listing.seen_ttl_days * 86_400);
    let max_age = chrono::Duration::days(config.listing.recency_days as i64);
    let delay = Duration::from_millis(config.http.request_delay_ms);

    for term in config.search.terms.iter().take(config.search.terms_per_run) {
        // Courtesy delay between term searches
        if outcome.terms_run > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.terms_run += 1;

        let mut request = SearchRequest::new(term, config.search.count);
        for collection in &config.search.collections {
            request = request.filter("collections", collection);
        }

        let listings: Vec<Listing> = match market.search(&request).await {
            Ok(cards) => cards
                .iter()
                .map(|card| extract::extract_from_card(card, &config.search))
                .collect(),
            Err(error) => {
                log::warn!("Search API failed for {term}: {error}; trying markup fallback");
                let scraped = market.search_page(term).await.and_then(|html| {
                    parse_search_markup(&html, &config.markup, &config.listing, &config.search.host)
                });
                match scraped {
                    Ok(listings) => listings,
                    Err(error) => {
                        log::error!("Search failed for {term}: {error}");
                        outcome.search_failures += 1;
                        continue;
                    }
                }
            }
        };
        let fetched = listings.len();
        outcome.fetched += fetched;

        let recent = filter_recent(listings, max_age);
        log::info!(
            "Got {fetched} listings under {term}; {} are recent",
            recent.len()
        );
        outcome.recent += recent.len();

        for listing in &recent {
            if store.exists(&listing.id).await? {
                log::info!("Already sent: {} - {}", listing.id, listing.title);
                outcome.skipped_seen += 1;
                continue;
            }

            if dry_run {
                match listing.validate() {
                    Ok(()) => log::info!("Would send: {} - {}", listing.id, listing.title),
                    Err(error) => {
                        log::warn!("Dropping listing {}: {error}", listing.id);
                        outcome.dropped_invalid += 1;
                    }
                }
                continue;
            }

            match deliver_listing(listing, config, market, delivery).await {
                Ok(()) => {
                    store.set_with_expiry(&listing.id, ttl, "").await?;
                    outcome.delivered += 1;
                    log::info!("Successfully sent: {} - {}", listing.id, listing.title);
                }
                Err(error) if error.is_listing_validation() => {
                    log::warn!("Dropping listing {}: {error}", listing.id);
                    outcome.dropped_invalid += 1;
                }
                Err(error @ AppError::Delivery { .. }) => {
                    log::warn!("Delivery failed for {}: {error}", listing.id);
                    outcome.delivery_failures += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    Ok(outcome)
}

/// Render and send one listing, preferring a photo with caption.
///
/// Photo resolution runs here, lazily, so listings that are skipped or
/// dropped never cost a detail-page fetch.
async fn deliver_listing(
    listing: &Listing,
    config: &Config,
    market: &dyn Marketplace,
    delivery: &dyn DeliveryClient,
) -> Result<()> {
    let payload = render::render(listing, &config.message)?;

    let photo = match payload.photo_url {
        Some(url) => Some(url),
        None if !listing.photo_resolved() => {
            photo::resolve_photo(market, listing, &config.photo).await?
        }
        None => None,
    };

    match photo {
        Some(url) => {
            delivery
                .send_photo(&config.telegram.channel, &url, &payload.text)
                .await
        }
        None => {
            delivery
                .send_message(&config.telegram.channel, &payload.text)
                .await
        }
    }
}
