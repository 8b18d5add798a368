//! String utility functions.
//!
//! Label derivation for enum members and the dotted-path check used by the
//! enum registry.

use regex::Regex;
use std::sync::OnceLock;

/// Returns `s` with its first character upper-cased.
///
/// # Examples
///
/// ```
/// use enumfields_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("hello world"), "Hello world");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result = c.to_uppercase().to_string();
        result.extend(chars);
        result
    })
}

/// Derives a display label from a member name.
///
/// Underscores become spaces and every word is title-cased, so
/// `DARK_RED` renders as `Dark Red`.
///
/// # Examples
///
/// ```
/// use enumfields_core::utils::text::prettify_name;
///
/// assert_eq!(prettify_name("GREEN"), "Green");
/// assert_eq!(prettify_name("DARK_RED"), "Dark Red");
/// assert_eq!(prettify_name("already_fine"), "Already Fine");
/// ```
pub fn prettify_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| capfirst(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` if `s` is a dot-separated sequence of identifiers.
///
/// Identifiers follow Unicode `XID` rules, so non-ASCII names are accepted.
///
/// # Examples
///
/// ```
/// use enumfields_core::utils::text::is_dotted_path;
///
/// assert!(is_dotted_path("tests.test_enums"));
/// assert!(is_dotted_path("Color"));
/// assert!(!is_dotted_path("tests..Color"));
/// assert!(!is_dotted_path("1tests"));
/// ```
pub fn is_dotted_path(s: &str) -> bool {
    static DOTTED: OnceLock<Regex> = OnceLock::new();
    let dotted = DOTTED.get_or_init(|| {
        Regex::new(r"^[\p{XID_Start}_]\p{XID_Continue}*(\.[\p{XID_Start}_]\p{XID_Continue}*)*$")
            .unwrap()
    });
    dotted.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capfirst_unicode() {
        assert_eq!(capfirst("ëlan"), "Ëlan");
    }

    #[test]
    fn test_prettify_single_word() {
        assert_eq!(prettify_name("RED"), "Red");
        assert_eq!(prettify_name("blue"), "Blue");
    }

    #[test]
    fn test_prettify_collapses_repeated_underscores() {
        assert_eq!(prettify_name("NOT__SET_"), "Not Set");
    }

    #[test]
    fn test_is_dotted_path() {
        assert!(is_dotted_path("app.models.Color"));
        assert!(!is_dotted_path(""));
        assert!(!is_dotted_path(".Color"));
        assert!(!is_dotted_path("app.Color."));
        assert!(is_dotted_path("shop.größen.Größe"));
        assert!(!is_dotted_path("my-app.models"));
    }
}
