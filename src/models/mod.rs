// src/models/mod.rs

//! Domain models for the listing watcher.

mod config;
mod listing;

// Re-export all public types
pub use config::{
    Config, HttpConfig, ListingConfig, MarkupSelectors, MessageConfig, PhotoConfig, SearchConfig,
    StoreConfig, TelegramConfig, collections,
};
pub use listing::Listing;
