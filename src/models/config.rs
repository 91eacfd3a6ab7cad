//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search terms and marketplace API settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Listing recency and field-classification settings
    #[serde(default)]
    pub listing: ListingConfig,

    /// Notification rendering limits
    #[serde(default)]
    pub message: MessageConfig,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Photo resolution retry policy
    #[serde(default)]
    pub photo: PhotoConfig,

    /// Seen-store backend settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Selectors for the markup-scraping fallback
    #[serde(default)]
    pub markup: MarkupSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.terms.is_empty() {
            return Err(AppError::validation("search.terms is empty"));
        }
        if self.search.host.trim().is_empty() {
            return Err(AppError::validation("search.host is empty"));
        }
        if self.search.count == 0 {
            return Err(AppError::validation("search.count must be > 0"));
        }
        if self.search.terms_per_run == 0 {
            return Err(AppError::validation("search.terms_per_run must be > 0"));
        }
        if self.listing.recency_days == 0 {
            return Err(AppError::validation("listing.recency_days must be > 0"));
        }
        if self.listing.seen_ttl_days == 0 {
            return Err(AppError::validation("listing.seen_ttl_days must be > 0"));
        }
        if self.message.title_limit == 0 {
            return Err(AppError::validation("message.title_limit must be > 0"));
        }
        if self.message.description_limit == 0 {
            return Err(AppError::validation("message.description_limit must be > 0"));
        }
        if self.telegram.channel.trim().is_empty() {
            return Err(AppError::validation("telegram.channel is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.photo.max_attempts == 0 {
            return Err(AppError::validation("photo.max_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Search terms and marketplace API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Marketplace host, also used to build canonical listing URLs
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Search API path under the host
    #[serde(default = "defaults::api_path")]
    pub api_path: String,

    /// Brand/search-term list
    #[serde(default)]
    pub terms: Vec<String>,

    /// Maximum results requested per term
    #[serde(default = "defaults::count")]
    pub count: usize,

    /// Terms processed per run, taken in config order
    #[serde(default = "defaults::terms_per_run")]
    pub terms_per_run: usize,

    /// Marketplace country identifier
    #[serde(default = "defaults::country_id")]
    pub country_id: String,

    /// Result locale
    #[serde(default = "defaults::locale")]
    pub locale: String,

    /// Collection filter ids applied to every search
    #[serde(default = "defaults::collections")]
    pub collections: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            api_path: defaults::api_path(),
            terms: Vec::new(),
            count: defaults::count(),
            terms_per_run: defaults::terms_per_run(),
            country_id: defaults::country_id(),
            locale: defaults::locale(),
            collections: defaults::collections(),
        }
    }
}

/// Listing recency and field-classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Maximum listing age in days
    #[serde(default = "defaults::recency_days")]
    pub recency_days: u64,

    /// Days before a "notification sent" mark expires
    #[serde(default = "defaults::seen_ttl_days")]
    pub seen_ttl_days: u64,

    /// Text prefix marking a price sub-node
    #[serde(default = "defaults::currency_prefix")]
    pub currency_prefix: String,

    /// Text prefix marking a size sub-node
    #[serde(default = "defaults::size_prefix")]
    pub size_prefix: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            recency_days: defaults::recency_days(),
            seen_ttl_days: defaults::seen_ttl_days(),
            currency_prefix: defaults::currency_prefix(),
            size_prefix: defaults::size_prefix(),
        }
    }
}

/// Notification rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Maximum title length before truncation
    #[serde(default = "defaults::title_limit")]
    pub title_limit: usize,

    /// Maximum description length before truncation
    #[serde(default = "defaults::description_limit")]
    pub description_limit: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            title_limit: defaults::title_limit(),
            description_limit: defaults::description_limit(),
        }
    }
}

/// Telegram delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base address
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Bot token; read from `THRIFTWATCH_BOT_TOKEN` when empty
    #[serde(default)]
    pub token: String,

    /// Channel target identifier (e.g. "@my_channel" or a chat id)
    #[serde(default)]
    pub channel: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
            token: String::new(),
            channel: String::new(),
        }
    }
}

impl TelegramConfig {
    /// Bot token from config, falling back to `THRIFTWATCH_BOT_TOKEN`.
    pub fn resolve_token(&self) -> Result<String> {
        if !self.token.trim().is_empty() {
            return Ok(self.token.clone());
        }
        std::env::var("THRIFTWATCH_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::config("telegram.token is empty and THRIFTWATCH_BOT_TOKEN is not set")
            })
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Photo resolution retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoConfig {
    /// Maximum detail-page fetch attempts
    #[serde(default = "defaults::photo_attempts")]
    pub max_attempts: usize,

    /// Delay between attempts in milliseconds
    #[serde(default)]
    pub retry_delay_ms: u64,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::photo_attempts(),
            retry_delay_ms: 0,
        }
    }
}

/// Seen-store backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL
    #[serde(default = "defaults::redis_url")]
    pub redis_url: String,

    /// Prefix applied to every seen-store key
    #[serde(default = "defaults::key_prefix")]
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: defaults::redis_url(),
            key_prefix: defaults::key_prefix(),
        }
    }
}

/// CSS selectors for the markup-scraping fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupSelectors {
    /// Selector for one result card
    #[serde(default = "defaults::card_selector")]
    pub card_selector: String,

    /// Selector for the text-bearing sub-nodes inside a card
    #[serde(default = "defaults::text_selector")]
    pub text_selector: String,

    /// Selector for the detail-page link inside a card
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// Attribute carrying the link address
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for MarkupSelectors {
    fn default() -> Self {
        Self {
            card_selector: defaults::card_selector(),
            text_selector: defaults::text_selector(),
            link_selector: defaults::link_selector(),
            link_attr: defaults::link_attr(),
        }
    }
}

/// Marketplace collection ids usable as search filters.
pub mod collections {
    pub const ALL_MENS_FASHION: &str = "3";
    pub const WOMENS_BAGS_AND_WALLETS: &str = "844";
}

mod defaults {
    // Search defaults
    pub fn host() -> String {
        "https://www.carousell.ph".into()
    }
    pub fn api_path() -> String {
        "api-service/filter/search/3.3/products/".into()
    }
    pub fn count() -> usize {
        20
    }
    pub fn terms_per_run() -> usize {
        3
    }
    pub fn country_id() -> String {
        "1694008".into()
    }
    pub fn locale() -> String {
        "en".into()
    }
    pub fn collections() -> Vec<String> {
        vec![super::collections::ALL_MENS_FASHION.into()]
    }

    // Listing defaults
    pub fn recency_days() -> u64 {
        1
    }
    pub fn seen_ttl_days() -> u64 {
        7
    }
    pub fn currency_prefix() -> String {
        "PHP ".into()
    }
    pub fn size_prefix() -> String {
        "Size: ".into()
    }

    // Message defaults
    pub fn title_limit() -> usize {
        30
    }
    pub fn description_limit() -> usize {
        60
    }

    // Telegram defaults
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; thriftwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }

    // Photo defaults
    pub fn photo_attempts() -> usize {
        2
    }

    // Store defaults
    pub fn redis_url() -> String {
        "redis://redis:6379".into()
    }
    pub fn key_prefix() -> String {
        "thriftwatch:seen:".into()
    }

    // Markup defaults
    pub fn card_selector() -> String {
        "div[data-testid^=listing-card]".into()
    }
    pub fn text_selector() -> String {
        "p".into()
    }
    pub fn link_selector() -> String {
        "a[href^='/p/']".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
}
