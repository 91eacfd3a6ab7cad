//! Service layer for the listing watcher.
//!
//! This module contains the outward-facing clients and extraction logic:
//! - Marketplace search (`HttpMarketplace`, `SearchRequest`)
//! - Field extraction (`extract`)
//! - Lazy photo resolution (`photo`)
//! - Telegram delivery (`TelegramClient`)

pub mod extract;
pub mod photo;
mod search;
mod telegram;

pub use search::{
    CardComponent, CardMedia, HttpMarketplace, ListingCard, Marketplace, PhotoItem, SearchRequest,
    TimestampContent, TimestampSeconds, parse_search_markup,
};
pub use telegram::{DeliveryClient, TelegramClient};
