// src/error.rs

//! Unified error handling for the listing watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// How a delivery attempt failed.
///
/// The channel distinguishes transport problems from channel-level
/// rejections (malformed markup, rate limits) so callers can log them
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// Request timed out
    TimedOut,
    /// Network unreachable / connection failure
    Network,
    /// The channel accepted the request but rejected the message
    Rejected,
}

impl fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryErrorKind::TimedOut => "timed out",
            DeliveryErrorKind::Network => "network unreachable",
            DeliveryErrorKind::Rejected => "rejected by channel",
        };
        f.write_str(s)
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Listing has no title; drops the listing, never the batch
    #[error("listing title is required")]
    TitleRequired,

    /// Listing has no URL; drops the listing, never the batch
    #[error("listing url is required")]
    UrlRequired,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Seen-store operation failed
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Search request failed
    #[error("search error for {context}: {message}")]
    Search { context: String, message: String },

    /// Message delivery failed
    #[error("delivery {kind}: {message}")]
    Delivery {
        kind: DeliveryErrorKind,
        message: String,
    },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create a search error with context.
    pub fn search(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Search {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a delivery error.
    pub fn delivery(kind: DeliveryErrorKind, message: impl fmt::Display) -> Self {
        Self::Delivery {
            kind,
            message: message.to_string(),
        }
    }

    /// True for the per-listing validation failures that abort a single
    /// listing but keep the batch running.
    pub fn is_listing_validation(&self) -> bool {
        matches!(self, AppError::TitleRequired | AppError::UrlRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_validation_errors_are_flagged() {
        assert!(AppError::TitleRequired.is_listing_validation());
        assert!(AppError::UrlRequired.is_listing_validation());
        assert!(!AppError::config("x").is_listing_validation());
    }

    #[test]
    fn delivery_error_display_names_kind() {
        let err = AppError::delivery(DeliveryErrorKind::TimedOut, "no response");
        assert_eq!(err.to_string(), "delivery timed out: no response");
    }
}
