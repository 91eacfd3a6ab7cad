// src/pipeline/recency.rs

//! Recency filtering for extracted listings.

use chrono::{Duration, Utc};

use crate::models::Listing;

/// Keep listings no older than `max_age`, preserving order.
///
/// Listings without a time signal are kept; the seen store still
/// deduplicates them, and dropping them would silently hide results the
/// source returned without a timestamp.
pub fn filter_recent(listings: Vec<Listing>, max_age: Duration) -> Vec<Listing> {
    let now = Utc::now();
    listings
        .into_iter()
        .filter(|listing| match listing.created_at {
            None => true,
            Some(created) => now.signed_duration_since(created) <= max_age,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_aged(id: &str, age: Option<Duration>) -> Listing {
        let mut listing = Listing::new(id, format!("https://market.example/p/{id}"));
        listing.title = format!("Item {id}");
        listing.created_at = age.map(|a| Utc::now() - a);
        listing
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn drops_listings_older_than_max_age() {
        let listings = vec![
            listing_aged("fresh", Some(Duration::hours(2))),
            listing_aged("stale", Some(Duration::days(3))),
        ];

        let recent = filter_recent(listings, Duration::days(1));
        assert_eq!(ids(&recent), ["fresh"]);
    }

    #[test]
    fn keeps_listings_without_a_time_signal() {
        let listings = vec![
            listing_aged("unknown", None),
            listing_aged("stale", Some(Duration::days(10))),
        ];

        let recent = filter_recent(listings, Duration::days(1));
        assert_eq!(ids(&recent), ["unknown"]);
    }

    #[test]
    fn preserves_source_order() {
        let listings = vec![
            listing_aged("a", Some(Duration::minutes(5))),
            listing_aged("b", Some(Duration::minutes(10))),
            listing_aged("c", Some(Duration::minutes(15))),
        ];

        let recent = filter_recent(listings, Duration::days(1));
        assert_eq!(ids(&recent), ["a", "b", "c"]);
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let listings = vec![
            listing_aged("a", Some(Duration::hours(1))),
            listing_aged("b", Some(Duration::days(5))),
            listing_aged("c", None),
        ];

        let once = filter_recent(listings, Duration::days(1));
        let expected = ids(&once).into_iter().map(String::from).collect::<Vec<_>>();
        let twice = filter_recent(once, Duration::days(1));
        assert_eq!(ids(&twice), expected);
    }
}
