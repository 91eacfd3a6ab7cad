// src/services/search.rs

//! Marketplace search client.
//!
//! Builds search API request bodies, decodes raw result cards, and falls
//! back to scraping result-page markup when the API path is unavailable.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{Config, ListingConfig, MarkupSelectors};
use crate::services::extract;
use crate::utils::{self, http};

/// One search to run: a term plus structured filters.
///
/// `filter` clones the request, so a base search can be refined into
/// several variants without mutating the original.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub term: String,
    pub count: usize,
    filters: BTreeMap<String, Vec<String>>,
}

impl SearchRequest {
    /// Create a search for `term` returning at most `count` results.
    pub fn new(term: impl Into<String>, count: usize) -> Self {
        Self {
            term: term.into(),
            count,
            ..Self::default()
        }
    }

    /// Return a copy with `value` appended to the `field` filter.
    pub fn filter(&self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let mut refined = self.clone();
        refined
            .filters
            .entry(field.into())
            .or_default()
            .push(value.into());
        refined
    }

    /// Build the JSON request body the search API expects.
    ///
    /// Results are pinned to newest-first so the recency filter sees the
    /// freshest window the API will give us.
    pub fn body(&self, country_id: &str, locale: &str) -> serde_json::Value {
        let filters: Vec<serde_json::Value> = self
            .filters
            .iter()
            .map(|(field, values)| {
                json!({
                    "fieldName": field,
                    "idsOrKeywords": { "value": values },
                })
            })
            .collect();

        json!({
            "query": self.term,
            "count": self.count,
            "filters": filters,
            "countryId": country_id,
            "isFreeItems": false,
            "locale": locale,
            "prefill": { "prefill_sort_by": "time_created,descending" },
            "sortParam": {
                "fieldName": "time_created",
                "ascending": { "value": false },
            },
        })
    }
}

/// Raw search API response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: SearchData,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "listingCard")]
    pub listing_card: ListingCard,
}

/// One raw result card as the API returns it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingCard {
    pub id: String,
    pub above_fold: Vec<CardComponent>,
    pub below_fold: Vec<CardComponent>,
    pub media: Vec<CardMedia>,
}

/// One tagged component within a result card.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardComponent {
    pub component: String,
    pub string_content: Option<String>,
    pub timestamp_content: Option<TimestampContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimestampContent {
    #[serde(default)]
    pub seconds: TimestampSeconds,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimestampSeconds {
    #[serde(default)]
    pub low: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardMedia {
    pub photo_item: Option<PhotoItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoItem {
    #[serde(default)]
    pub url: Option<String>,
}

/// Marketplace access seam.
///
/// The batch driver and photo resolver only see this trait, so tests can
/// substitute canned responses for the live site.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Run a search and return the raw result cards.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ListingCard>>;

    /// Fetch the search results page for `term` as markup.
    async fn search_page(&self, term: &str) -> Result<String>;

    /// Fetch a listing detail page as markup.
    async fn detail_page(&self, url: &str) -> Result<String>;
}

/// Live marketplace client over the search API.
pub struct HttpMarketplace {
    config: Arc<Config>,
    client: Client,
}

impl HttpMarketplace {
    /// Create a new marketplace client with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.search.host.trim_end_matches('/'),
            self.config.search.api_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Marketplace for HttpMarketplace {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ListingCard>> {
        let search = &self.config.search;
        let body = request.body(&search.country_id, &search.locale);

        let response = self
            .client
            .post(self.search_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::search(
                &request.term,
                format!("unexpected status {status}"),
            ));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .data
            .results
            .into_iter()
            .map(|r| r.listing_card)
            .collect())
    }

    async fn search_page(&self, term: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.config.search.host)?;
        url.set_path(&format!("search/{term}"));
        Ok(self.client.get(url).send().await?.text().await?)
    }

    async fn detail_page(&self, url: &str) -> Result<String> {
        Ok(self.client.get(url).send().await?.text().await?)
    }
}

/// Parse listings out of scraped search-result markup.
///
/// Cards without a detail link carry nothing we can notify about and are
/// skipped. Sub-node texts are classified positionally by
/// [`extract::extract_from_nodes`].
pub fn parse_search_markup(
    html: &str,
    selectors: &MarkupSelectors,
    rules: &ListingConfig,
    host: &str,
) -> Result<Vec<crate::models::Listing>> {
    let card_sel = parse_selector(&selectors.card_selector)?;
    let text_sel = parse_selector(&selectors.text_selector)?;
    let link_sel = parse_selector(&selectors.link_selector)?;
    let base = url::Url::parse(host)?;

    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for card in document.select(&card_sel) {
        let Some(href) = card
            .select(&link_sel)
            .next()
            .and_then(|el| el.value().attr(selectors.link_attr.as_str()))
        else {
            log::debug!("skipping result card without a detail link");
            continue;
        };

        let url = utils::resolve_url(&base, href);
        let Some(id) = utils::extract_listing_id(&url) else {
            log::debug!("skipping result card with unparseable link {url}");
            continue;
        };

        let texts: Vec<String> = card
            .select(&text_sel)
            .map(|el| el.text().collect::<String>())
            .collect();

        listings.push(extract::extract_from_nodes(id, url, &texts, rules));
    }

    Ok(listings)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
