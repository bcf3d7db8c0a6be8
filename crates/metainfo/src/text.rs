//! Field normalization helpers: whitespace joining, description markup
//! canonicalization and date handling.

use std::fmt::Write;

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::xml::{self, Element};

/// Collapses indented or line-wrapped source text into one logical line:
/// every line is trimmed, empty lines are dropped, and the remainder is
/// joined with single spaces.
pub(crate) fn join_lines(text: &str) -> String {
    let mut joined = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(line);
    }
    joined
}

/// Renders a description-bearing element (`<description>`, `<caption>`) into
/// its canonical flat markup string.
///
/// Paragraphs and ordered/unordered lists are serialized back to minimal
/// markup with no whitespace between tags; any other child element is
/// ignored. Bare text with no element children at all is wrapped in a
/// single implied `<p>`. Text is escaped here, so the result is always a
/// well-formed XML fragment that serializes verbatim.
pub(crate) fn flatten_description(node: &Element) -> String {
    if node.children.is_empty() {
        let text = join_lines(node.text.as_deref().unwrap_or(""));
        if text.is_empty() {
            return String::new();
        }
        return format!("<p>{}</p>", xml::escape(&text));
    }
    let mut markup = String::new();
    for child in &node.children {
        match child.tag.as_str() {
            "p" => {
                let text = join_lines(child.text.as_deref().unwrap_or(""));
                let _ = write!(markup, "<p>{}</p>", xml::escape(&text));
            },
            "ul" | "ol" => {
                let _ = write!(markup, "<{}>", child.tag);
                for item in &child.children {
                    if item.tag == "li" {
                        let text = join_lines(item.text.as_deref().unwrap_or(""));
                        let _ = write!(markup, "<li>{}</li>", xml::escape(&text));
                    }
                }
                let _ = write!(markup, "</{}>", child.tag);
            },
            _ => {},
        }
    }
    markup
}

/// Parses a `date` attribute into Unix seconds.
///
/// Accepts ISO-8601 datetimes with an offset, naive datetimes (taken as
/// UTC) and bare calendar dates (taken as midnight UTC). Returns `None`
/// for anything unparseable; a bad date is tolerated, not an error.
pub(crate) fn parse_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(datetime) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(datetime.unix_timestamp());
    }
    if let Ok(datetime) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(datetime.assume_utc().unix_timestamp());
    }
    if let Ok(date) = Date::parse(raw, &Iso8601::DEFAULT) {
        return Some(date.midnight().assume_utc().unix_timestamp());
    }
    None
}

/// Formats Unix seconds as an RFC 3339 timestamp for serialized review
/// dates. Out-of-range timestamps yield `None` and the attribute is
/// omitted.
pub(crate) fn format_date(timestamp: i64) -> Option<String> {
    let datetime = OffsetDateTime::from_unix_timestamp(timestamp).ok()?;
    datetime.format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::xml::parse_document;

    #[rstest]
    #[case("plain", "plain")]
    #[case("  padded  ", "padded")]
    #[case("\n    wrapped over\n    two lines\n  ", "wrapped over two lines")]
    #[case("first\n\n\nsecond", "first second")]
    #[case("\n   \n", "")]
    fn join_lines_collapses_whitespace(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(join_lines(input), expected);
    }

    #[test]
    fn description_paragraphs_are_flattened() {
        let node = parse_document("<description>\n  <p>\n    Updating\n    adds features.\n  </p>\n  <p>Second.</p>\n</description>").unwrap();
        assert_eq!(flatten_description(&node), "<p>Updating adds features.</p><p>Second.</p>");
    }

    #[test]
    fn description_lists_are_flattened() {
        let node = parse_document("<description><p>Fixes:</p><ul><li>One fix</li><li>Another\n  fix</li></ul></description>").unwrap();
        assert_eq!(flatten_description(&node), "<p>Fixes:</p><ul><li>One fix</li><li>Another fix</li></ul>");
    }

    #[test]
    fn ordered_lists_keep_their_tag() {
        let node = parse_document("<description><ol><li>First</li><li>Second</li></ol></description>").unwrap();
        assert_eq!(flatten_description(&node), "<ol><li>First</li><li>Second</li></ol>");
    }

    #[test]
    fn bare_text_becomes_an_implied_paragraph() {
        let node = parse_document("<caption>No markup</caption>").unwrap();
        assert_eq!(flatten_description(&node), "<p>No markup</p>");
    }

    #[test]
    fn unknown_block_children_are_ignored() {
        let node = parse_document("<description><p>Kept</p><table><tr/></table></description>").unwrap();
        assert_eq!(flatten_description(&node), "<p>Kept</p>");
    }

    #[test]
    fn text_is_escaped_into_the_markup_string() {
        let node = parse_document("<description><p>a &amp; b</p></description>").unwrap();
        assert_eq!(flatten_description(&node), "<p>a &amp; b</p>");
    }

    #[rstest]
    #[case("2016-02-25", Some(1456358400))]
    #[case("2016-02-25T14:30:00Z", Some(1456410600))]
    #[case("2016-02-25T14:30:00+01:00", Some(1456407000))]
    #[case("2016-02-25T14:30:00", Some(1456410600))]
    #[case("not a date", None)]
    #[case("", None)]
    fn date_attributes_become_unix_seconds(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_date(input), expected);
    }

    #[test]
    fn dates_format_as_rfc3339() {
        assert_eq!(format_date(1456358400).as_deref(), Some("2016-02-25T00:00:00Z"));
    }
}
