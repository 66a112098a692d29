//! Small parsing helpers shared by delegates and remote backends
//!
//! ```
//! use manga_link_resolver::helpers::{chapter_number_from_name, last_numeric_segment};
//!
//! assert_eq!(chapter_number_from_name("#012"), 12.0);
//! assert_eq!(last_numeric_segment(&["viewer", "7"]), Some(7));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());

/// Extract the first number from a chapter string
pub fn extract_number(s: &str) -> Option<String> {
    NUMBER_RE
        .captures(s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Chapter number from a label such as `#012` or `Chapter 4.5`, `-1.0` when absent
pub fn chapter_number_from_name(name: &str) -> f32 {
    extract_number(name)
        .and_then(|n| n.parse::<f32>().ok())
        .unwrap_or(-1.0)
}

/// Last path segment parsed as a page number
pub fn last_numeric_segment(segments: &[&str]) -> Option<u32> {
    segments.last().and_then(|s| s.parse::<u32>().ok())
}

/// The segment directly after `marker`, if it is a plain number
pub fn numeric_segment_after<'a>(segments: &[&'a str], marker: &str) -> Option<&'a str> {
    segments
        .windows(2)
        .find(|w| w[0] == marker)
        .map(|w| w[1])
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
}

/// Collapse whitespace runs and trim, scraped titles often carry stray breaks
pub fn clean_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_number_from_name() {
        assert_eq!(chapter_number_from_name("#001"), 1.0);
        assert_eq!(chapter_number_from_name("Chapter 10.5"), 10.5);
        assert_eq!(chapter_number_from_name("ex"), -1.0);
    }

    #[test]
    fn test_numeric_segment_after() {
        assert_eq!(numeric_segment_after(&["viewer", "123"], "viewer"), Some("123"));
        assert_eq!(numeric_segment_after(&["viewer", "abc"], "viewer"), None);
        assert_eq!(numeric_segment_after(&["viewer"], "viewer"), None);
        assert_eq!(numeric_segment_after(&["titles", "5"], "viewer"), None);
    }

    #[test]
    fn test_last_numeric_segment() {
        assert_eq!(last_numeric_segment(&["read", "3"]), Some(3));
        assert_eq!(last_numeric_segment(&["read", "x"]), None);
        assert_eq!(last_numeric_segment(&[]), None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Example \n Series "), "Example Series");
    }
}
