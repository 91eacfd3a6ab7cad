//! Listing data structure.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::{AppError, Result};

/// One normalized marketplace listing.
///
/// Immutable after extraction except for the photo slot, which is filled
/// directly on the API path or resolved lazily (at most once) on the
/// markup path.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Stable source identifier; dedup key within a run
    pub id: String,

    /// Short text label
    pub title: String,

    /// Canonical detail-page address
    pub url: String,

    /// Listing creation time; `None` when the source provides no time signal
    pub created_at: Option<DateTime<Utc>>,

    /// Display price as formatted by the source
    pub price: Option<String>,

    /// Display size as formatted by the source
    pub size: Option<String>,

    /// Ordered description fragments. The first is the primary description,
    /// later unclassified fragments form the "others" tail; encounter order
    /// is significant.
    pub description: Vec<String>,

    /// One-shot photo slot
    photo: OnceLock<Option<String>>,
}

impl Listing {
    /// Create a listing with a freshly allocated description sequence.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Canonical detail-page URL for a listing id under the given host.
    pub fn detail_url(host: &str, id: &str) -> String {
        format!("{}/p/{}", host.trim_end_matches('/'), id)
    }

    /// Check the invariants required before rendering or photo resolution.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::TitleRequired);
        }
        if self.url.trim().is_empty() {
            return Err(AppError::UrlRequired);
        }
        Ok(())
    }

    /// The primary description fragment, if any.
    pub fn primary_description(&self) -> Option<&str> {
        self.description.first().map(String::as_str)
    }

    /// Unclassified fragments beyond the primary description.
    pub fn others(&self) -> &[String] {
        if self.description.is_empty() {
            &[]
        } else {
            &self.description[1..]
        }
    }

    /// Photo address, if the slot has been filled with one.
    pub fn photo_url(&self) -> Option<&str> {
        self.photo.get().and_then(|p| p.as_deref())
    }

    /// Whether the photo slot has been filled (even with "no photo").
    pub fn photo_resolved(&self) -> bool {
        self.photo.get().is_some()
    }

    /// Fill the photo slot. Later calls are ignored; the first resolution
    /// wins and is cached on the record.
    pub fn set_photo_url(&self, photo: Option<String>) {
        let _ = self.photo.set(photo);
    }

    /// Debug representation of the listing as JSON.
    pub fn debug_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "url": self.url,
            "created_at": self.created_at.map(|t| t.to_rfc3339()),
            "price": self.price,
            "size": self.size,
            "description": self.description,
            "photo_url": self.photo_url(),
        })
    }
}
