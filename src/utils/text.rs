// src/utils/text.rs

//! Text shaping helpers for rendered messages.

use unicode_segmentation::UnicodeSegmentation;

/// Number of extended grapheme clusters in `s`.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// The first `limit` grapheme clusters of `s`, trailing whitespace trimmed.
///
/// Counting graphemes rather than bytes keeps a cut from landing inside a
/// multi-byte cluster.
pub fn truncate_graphemes(s: &str, limit: usize) -> String {
    let cut: String = s.graphemes(true).take(limit).collect();
    cut.trim_end().to_string()
}

/// Uppercase the first letter of each whitespace-separated word, lowercase
/// the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_len_counts_clusters() {
        assert_eq!(grapheme_len("abc"), 3);
        assert_eq!(grapheme_len("héllo"), 5);
    }

    #[test]
    fn truncate_trims_trailing_whitespace() {
        assert_eq!(truncate_graphemes("vintage denim ", 8), "vintage");
    }

    #[test]
    fn truncate_longer_limit_is_noop() {
        assert_eq!(truncate_graphemes("short", 30), "short");
    }

    #[test]
    fn title_case_per_word() {
        assert_eq!(title_case("NIKE air max"), "Nike Air Max");
        assert_eq!(title_case("uniqlo U tee"), "Uniqlo U Tee");
    }
}
