//! ISBN normalization and eligibility check.
//!
//! The upstream form accepts free text in the ISBN field. A request is only
//! eligible for remote submission when, after removing hyphens, the value is
//! a plain ISBN-10 or ISBN-13: an optional 978/979 prefix, nine digits, and
//! a final digit or `X` check character.

use std::sync::OnceLock;

use regex::Regex;

static ISBN_RE: OnceLock<Regex> = OnceLock::new();

fn isbn_regex() -> &'static Regex {
    ISBN_RE.get_or_init(|| {
        Regex::new(r"^(97[89])?\d{9}(\d|X)$").expect("ISBN pattern must compile")
    })
}

/// Normalize a raw ISBN field value.
///
/// Strips every hyphen, then matches against the ISBN-10/13 pattern.
/// Returns the compact form when it matches, `None` when the request
/// carries no usable ISBN.
pub fn normalize(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| *c != '-').collect();

    if isbn_regex().is_match(&compact) {
        Some(compact)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn13_with_hyphens() {
        assert_eq!(
            normalize("978-3-16-148410-0"),
            Some("9783161484100".to_string())
        );
    }

    #[test]
    fn test_isbn13_compact() {
        assert_eq!(normalize("9783161484100"), Some("9783161484100".to_string()));
        assert_eq!(normalize("9791234567896"), Some("9791234567896".to_string()));
    }

    #[test]
    fn test_isbn10_with_check_x() {
        assert_eq!(normalize("3-598-21508-X"), Some("359821508X".to_string()));
        assert_eq!(normalize("0306406152"), Some("0306406152".to_string()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("0-14-X"), None);
        assert_eq!(normalize("no isbn at all"), None);
        // letters other than a trailing X are never valid
        assert_eq!(normalize("97831614841AB"), None);
        assert_eq!(normalize("3X9821508X"), None);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(normalize("978316148410"), None);
        assert_eq!(normalize("97831614841000"), None);
    }
}
