//! Line and inline patterns recognized by the parser.
//!
//! Every pattern is compiled once on first use. Capture names are part of the
//! contract with the parser and tokenizer: `level`/`title` for headings,
//! `cite`, `language`, `depth`/`item`/`description` for list items, `cells`
//! for table rows, and `text`, `url`/`label`, `src`/`alt`, `scheme`/`reference`
//! and `name` for inline constructs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker introducing a document-level identity declaration.
pub const ID_MARKER: &str = "#+ID:";

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid built-in pattern {pattern:?}: {err}"),
    }
}

pub(crate) static HEADING: Lazy<Regex> = Lazy::new(|| compile(r"^(?P<level>\*+)\s+(?P<title>.+)$"));

pub(crate) static QUOTE_BEGIN: Lazy<Regex> =
    Lazy::new(|| compile(r"^#\+BEGIN_QUOTE(?::\s+(?P<cite>.+))?$"));

pub(crate) static QUOTE_END: Lazy<Regex> = Lazy::new(|| compile(r"^#\+END_QUOTE$"));

pub(crate) static SRC_BEGIN: Lazy<Regex> =
    Lazy::new(|| compile(r"^#\+BEGIN_SRC(?:\s+(?P<language>\S.*?))?\s*$"));

// Anything after the marker is ignored.
pub(crate) static SRC_END: Lazy<Regex> = Lazy::new(|| compile(r"^#\+END_SRC"));

pub(crate) static KEYWORD: Lazy<Regex> =
    Lazy::new(|| compile(r"^#\+(?P<key>[A-Za-z_]+):\s*(?P<value>.*?)\s*$"));

pub(crate) static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?P<depth>\s*)\d+[.)]\s+(?P<item>.+)$"));

pub(crate) static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?P<depth>\s*)[-+]\s+(?P<item>.+)$"));

pub(crate) static DEFINITION_ITEM: Lazy<Regex> = Lazy::new(|| {
    compile(r"^(?P<depth>\s*)[-+]\s+(?P<item>.+?)\s*::\s*(?P<description>.+)$")
});

pub(crate) static TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*\|(?P<cells>(?:.+\|)+)\s*$"));

pub(crate) static BLANK: Lazy<Regex> = Lazy::new(|| compile(r"^\s*$"));

pub(crate) static INLINE_CODE: Lazy<Regex> = Lazy::new(|| compile(r"=(?P<text>.+?)="));

pub(crate) static TARGET: Lazy<Regex> = Lazy::new(|| compile(r"<<(?P<name>[^<>]+)>>"));

pub(crate) static LINK: Lazy<Regex> = Lazy::new(|| {
    compile(r"\[\[(?P<url>https?://.+?)\](?:\[(?P<label>.+?)\])?\]")
});

pub(crate) static INTERNAL_LINK: Lazy<Regex> = Lazy::new(|| {
    compile(r"\[\[(?P<scheme>#|id:)(?P<reference>[^\[\]]+?)\](?:\[(?P<label>.+?)\])?\]")
});

pub(crate) static IMAGE: Lazy<Regex> =
    Lazy::new(|| compile(r"\[\[(?P<src>.+?)\](?:\[(?P<alt>.+?)\])?\]"));

pub(crate) static BOLD: Lazy<Regex> = Lazy::new(|| compile(r"\*(?P<text>.+?)\*"));

pub(crate) static ITALIC: Lazy<Regex> = Lazy::new(|| compile(r"/(?P<text>.+?)/"));

pub(crate) static UNDERLINE: Lazy<Regex> = Lazy::new(|| compile(r"_(?P<text>.+?)_"));

pub(crate) static STRIKETHROUGH: Lazy<Regex> = Lazy::new(|| compile(r"\+(?P<text>.+?)\+"));

pub(crate) static MONOSPACE: Lazy<Regex> = Lazy::new(|| compile(r"~(?P<text>.+?)~"));

/// Returns the identity declared with `#+ID:` anywhere in `text`.
///
/// The value runs from the marker to the end of its line. A marker with an
/// empty value declares nothing.
pub fn declared_identity(text: &str) -> Option<&str> {
    let start = text.find(ID_MARKER)? + ID_MARKER.len();
    let rest = &text[start..];
    let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    let value = rest[..end].trim();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_captures_level_and_title() {
        let caps = HEADING.captures("** Sub heading").expect("heading");
        assert_eq!(&caps["level"], "**");
        assert_eq!(&caps["title"], "Sub heading");
        assert!(HEADING.captures("*bold* text").is_none());
    }

    #[test]
    fn quote_begin_cite_is_optional() {
        let caps = QUOTE_BEGIN
            .captures("#+BEGIN_QUOTE: http://example.com/source")
            .expect("quote");
        assert_eq!(&caps["cite"], "http://example.com/source");
        let caps = QUOTE_BEGIN.captures("#+BEGIN_QUOTE").expect("quote");
        assert!(caps.name("cite").is_none());
    }

    #[test]
    fn src_begin_language_ignores_trailing_space() {
        let caps = SRC_BEGIN.captures("#+BEGIN_SRC python  ").expect("src");
        assert_eq!(&caps["language"], "python");
        let caps = SRC_BEGIN.captures("#+BEGIN_SRC ").expect("src");
        assert!(caps.name("language").is_none());
    }

    #[test]
    fn definition_item_splits_on_double_colon() {
        let caps = DEFINITION_ITEM
            .captures("  + term :: meaning")
            .expect("definition");
        assert_eq!(&caps["depth"], "  ");
        assert_eq!(&caps["item"], "term");
        assert_eq!(&caps["description"], "meaning");
    }

    #[test]
    fn internal_link_accepts_both_schemes() {
        let caps = INTERNAL_LINK
            .captures("see [[id:abc-456][Trade Networks]].")
            .expect("id link");
        assert_eq!(&caps["scheme"], "id:");
        assert_eq!(&caps["reference"], "abc-456");
        assert_eq!(&caps["label"], "Trade Networks");
        let caps = INTERNAL_LINK.captures("[[#target]]").expect("local link");
        assert_eq!(&caps["scheme"], "#");
        assert!(caps.name("label").is_none());
    }

    #[test]
    fn identity_is_read_to_end_of_line() {
        assert_eq!(
            declared_identity("#+ID: abc-123\n* Agriculture"),
            Some("abc-123")
        );
        assert_eq!(declared_identity("* No identity"), None);
        assert_eq!(declared_identity("#+ID:   \ntext"), None);
    }

    #[test]
    fn keyword_value_needs_no_space() {
        let caps = KEYWORD.captures("#+ID:abc").expect("keyword");
        assert_eq!(&caps["key"], "ID");
        assert_eq!(&caps["value"], "abc");
        let caps = KEYWORD.captures("#+TITLE:   ").expect("keyword");
        assert_eq!(&caps["value"], "");
    }
}
