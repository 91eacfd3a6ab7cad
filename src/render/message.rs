// src/render/message.rs

//! Bounded-length HTML message rendering.

use crate::error::Result;
use crate::models::{Listing, MessageConfig};
use crate::utils::text;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    /// HTML message body
    pub text: String,
    /// Photo to attach, if the listing has one resolved
    pub photo_url: Option<String>,
}

/// Render `listing` into an HTML notification.
///
/// Layout: linked title, price line, size line, any unclassified "others"
/// fragments, then the emphasized description. Title and description are
/// cut at their configured grapheme limits with a `...` marker.
pub fn render(listing: &Listing, limits: &MessageConfig) -> Result<MessagePayload> {
    listing.validate()?;

    let title = render_title(&listing.title, limits.title_limit);
    let description = render_description(
        listing.primary_description().unwrap_or(""),
        limits.description_limit,
    );

    let mut text = format!("<a href=\"{}\">{}</a>", listing.url, title);
    text.push('\n');
    text.push_str(listing.price.as_deref().unwrap_or("No price indicated"));
    text.push('\n');
    text.push_str(listing.size.as_deref().unwrap_or("No size indicated"));

    let others = listing.others();
    if !others.is_empty() {
        text.push('\n');
        text.push_str(&others.join("\n"));
    }

    text.push('\n');
    text.push_str("<i>");
    text.push_str(&description);
    text.push_str("</i>");

    Ok(MessagePayload {
        text,
        photo_url: listing.photo_url().map(str::to_string),
    })
}

fn render_title(title: &str, limit: usize) -> String {
    let shaped = if text::grapheme_len(title) >= limit {
        format!("{}...", text::truncate_graphemes(title, limit))
    } else {
        title.to_string()
    };
    text::title_case(&shaped)
}

fn render_description(description: &str, limit: usize) -> String {
    if text::grapheme_len(description) > limit {
        format!("{}...", text::truncate_graphemes(description, limit))
    } else {
        description.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn limits() -> MessageConfig {
        MessageConfig {
            title_limit: 30,
            description_limit: 60,
        }
    }

    fn listing() -> Listing {
        let mut listing = Listing::new("123", "https://market.example/p/123");
        listing.title = "vintage denim jacket".to_string();
        listing.price = Some("PHP 1,500".to_string());
        listing.size = Some("Size: M".to_string());
        listing.description = vec!["Barely used".to_string()];
        listing
    }

    #[test]
    fn renders_full_listing() {
        let payload = render(&listing(), &limits()).unwrap();
        assert_eq!(
            payload.text,
            "<a href=\"https://market.example/p/123\">Vintage Denim Jacket</a>\n\
             PHP 1,500\n\
             Size: M\n\
             <i>Barely used</i>"
        );
        assert_eq!(payload.photo_url, None);
    }

    #[test]
    fn missing_price_renders_placeholder() {
        let mut listing = listing();
        listing.price = None;
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.contains("\nNo price indicated\n"));
    }

    #[test]
    fn missing_size_renders_placeholder() {
        let mut listing = listing();
        listing.size = None;
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.contains("\nNo size indicated\n"));
    }

    #[test]
    fn over_limit_title_is_cut_and_marked() {
        let mut listing = listing();
        listing.title = "this is a very long title that keeps going on".to_string();
        let payload = render(&listing, &limits()).unwrap();

        // 30 graphemes, trailing whitespace trimmed, then the marker
        assert!(payload.text.contains(">This Is A Very Long Title That...<"));
    }

    #[test]
    fn exactly_limit_title_is_truncated() {
        let mut listing = listing();
        listing.title = "a".repeat(30);
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.contains(&format!("A{}...", "a".repeat(29))));
    }

    #[test]
    fn truncated_title_is_title_cased() {
        let mut listing = listing();
        listing.title = "A very long designer jacket from the 1990s collection".to_string();
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.contains(">A Very Long Designer Jacket Fr...<"));
    }

    #[test]
    fn under_limit_title_is_kept_whole() {
        let payload = render(&listing(), &limits()).unwrap();
        assert!(payload.text.contains(">Vintage Denim Jacket<"));
    }

    #[test]
    fn over_limit_description_is_cut_and_marked() {
        let mut listing = listing();
        listing.description = vec!["d".repeat(70)];
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.ends_with(&format!("<i>{}...</i>", "d".repeat(60))));
    }

    #[test]
    fn empty_description_renders_empty_emphasis() {
        let mut listing = listing();
        listing.description = Vec::new();
        let payload = render(&listing, &limits()).unwrap();
        assert!(payload.text.ends_with("<i></i>"));
    }

    #[test]
    fn others_render_between_size_and_description() {
        let mut listing = listing();
        listing.description = vec![
            "Barely used".to_string(),
            "Meetup at Makati".to_string(),
            "Or shipped".to_string(),
        ];
        let payload = render(&listing, &limits()).unwrap();
        assert!(
            payload
                .text
                .ends_with("Size: M\nMeetup at Makati\nOr shipped\n<i>Barely used</i>")
        );
    }

    #[test]
    fn invalid_listing_propagates_validation_error() {
        let mut listing = listing();
        listing.title = String::new();
        assert!(matches!(
            render(&listing, &limits()),
            Err(AppError::TitleRequired)
        ));

        let mut listing = self::listing();
        listing.url = String::new();
        assert!(matches!(
            render(&listing, &limits()),
            Err(AppError::UrlRequired)
        ));
    }

    #[test]
    fn resolved_photo_is_carried_into_payload() {
        let listing = listing();
        listing.set_photo_url(Some("https://cdn.example/a.jpg".to_string()));
        let payload = render(&listing, &limits()).unwrap();
        assert_eq!(payload.photo_url.as_deref(), Some("https://cdn.example/a.jpg"));
    }
}
