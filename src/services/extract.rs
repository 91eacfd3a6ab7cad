// src/services/extract.rs

//! Field extraction from raw search results.
//!
//! Two input shapes feed the same Listing record: ordered text sub-nodes
//! from scraped markup, and tagged components from the search API.
//! Extraction never fails a batch; malformed input degrades to unset
//! fields.

use chrono::{TimeZone, Utc};

use crate::models::{Listing, ListingConfig, SearchConfig};
use crate::services::search::ListingCard;

/// Classify ordered text sub-nodes into listing fields.
///
/// Position 0 is the title regardless of content. After that, the first
/// currency-prefixed text is the price and the first size-prefixed text is
/// the size; everything else lands in the description tail in encounter
/// order. Blank texts are skipped and do not consume a slot, so a leading
/// whitespace node does not steal the title.
pub fn extract_from_nodes(
    id: impl Into<String>,
    url: impl Into<String>,
    texts: &[String],
    rules: &ListingConfig,
) -> Listing {
    let mut listing = Listing::new(id, url);
    let mut position = 0usize;

    for raw in texts {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        if position == 0 {
            listing.title = text.to_string();
        } else if listing.price.is_none() && text.starts_with(rules.currency_prefix.as_str()) {
            listing.price = Some(text.to_string());
        } else if listing.size.is_none() && text.starts_with(rules.size_prefix.as_str()) {
            listing.size = Some(text.to_string());
        } else {
            listing.description.push(text.to_string());
        }
        position += 1;
    }

    listing
}

/// Build a listing from a raw API result card.
///
/// Component tags map onto fields: `header_1` is the title, `header_2` the
/// price, `time_created` the creation time. Paragraphs, duplicate headers,
/// and tags this was not written for all land in the description tail.
pub fn extract_from_card(card: &ListingCard, search: &SearchConfig) -> Listing {
    let url = Listing::detail_url(&search.host, &card.id);
    let mut listing = Listing::new(card.id.clone(), url);

    let seconds = card
        .above_fold
        .iter()
        .find(|c| c.component == "time_created")
        .and_then(|c| c.timestamp_content.as_ref())
        .map(|t| t.seconds.low);
    listing.created_at = Some(match seconds {
        Some(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .unwrap_or_else(Utc::now),
        None => Utc::now(),
    });

    for component in &card.below_fold {
        let Some(text) = component.string_content.as_deref().map(str::trim) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }

        match component.component.as_str() {
            "header_1" if listing.title.is_empty() => listing.title = text.to_string(),
            "header_2" if listing.price.is_none() => listing.price = Some(text.to_string()),
            _ => listing.description.push(text.to_string()),
        }
    }

    if let Some(photo) = card
        .media
        .first()
        .and_then(|m| m.photo_item.as_ref())
        .and_then(|p| p.url.clone())
    {
        listing.set_photo_url(Some(photo));
    }

    listing
}
