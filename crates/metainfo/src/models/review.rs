use std::collections::BTreeMap;
use std::fmt::Write;

use crate::text;
use crate::xml::{self, Element};

/// One user review with rating/score/karma and free-form metadata.
///
/// Within a component, `id` is the natural key for deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    pub id: Option<String>,
    pub summary: Option<String>,
    /// Canonical flat markup string.
    pub description: Option<String>,
    pub locale: Option<String>,
    pub karma: i32,
    pub score: i32,
    pub rating: i32,
    pub version: Option<String>,
    pub reviewer_id: Option<String>,
    pub reviewer_name: Option<String>,
    /// Unix seconds; 0 = unset.
    pub date: i64,
    pub metadata: BTreeMap<String, String>,
}

impl Review {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut review = Self::default();
        if let Some(date) = node.attr("date")
            && let Some(seconds) = text::parse_date(date)
        {
            review.date = seconds;
        }
        // Same precedence as releases: an explicit timestamp attribute
        // wins over a derived date.
        if let Some(timestamp) = node.attr("timestamp").and_then(|raw| raw.parse().ok()) {
            review.date = timestamp;
        }
        if let Some(id) = node.attr("id") {
            review.id = Some(id.to_string());
        }
        if let Some(karma) = node.attr("karma").and_then(|raw| raw.parse().ok()) {
            review.karma = karma;
        }
        if let Some(score) = node.attr("score").and_then(|raw| raw.parse().ok()) {
            review.score = score;
        }
        if let Some(rating) = node.attr("rating").and_then(|raw| raw.parse().ok()) {
            review.rating = rating;
        }
        for child in &node.children {
            match child.tag.as_str() {
                "lang" => review.locale = child.text.clone(),
                "version" => review.version = child.text.clone(),
                "reviewer_id" => review.reviewer_id = child.text.clone(),
                "reviewer_name" => review.reviewer_name = child.text.clone(),
                "summary" => review.summary = child.text.clone(),
                "description" => review.description = Some(text::flatten_description(child)),
                "metadata" => {
                    for value in &child.children {
                        if value.tag == "value"
                            && let Some(key) = value.attr("key")
                        {
                            review.metadata.insert(key.to_string(), value.text.clone().unwrap_or_default());
                        }
                    }
                },
                _ => {},
            }
        }
        review
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        out.push_str("      <review");
        if self.date != 0
            && let Some(date) = text::format_date(self.date)
        {
            let _ = write!(out, " date=\"{date}\"");
        }
        if self.rating != 0 {
            let _ = write!(out, " rating=\"{}\"", self.rating);
        }
        if self.score != 0 {
            let _ = write!(out, " score=\"{}\"", self.score);
        }
        if self.karma != 0 {
            let _ = write!(out, " karma=\"{}\"", self.karma);
        }
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", xml::escape(id));
        }
        out.push_str(">\n");
        if let Some(summary) = &self.summary {
            let _ = write!(out, "        <summary>{}</summary>\n", xml::escape(summary));
        }
        if let Some(description) = &self.description {
            let _ = write!(out, "        <description>{description}</description>\n");
        }
        if let Some(version) = &self.version {
            let _ = write!(out, "        <version>{}</version>\n", xml::escape(version));
        }
        if let Some(reviewer_id) = &self.reviewer_id {
            let _ = write!(out, "        <reviewer_id>{}</reviewer_id>\n", xml::escape(reviewer_id));
        }
        if let Some(reviewer_name) = &self.reviewer_name {
            let _ = write!(out, "        <reviewer_name>{}</reviewer_name>\n", xml::escape(reviewer_name));
        }
        if let Some(locale) = &self.locale {
            let _ = write!(out, "        <lang>{}</lang>\n", xml::escape(locale));
        }
        if !self.metadata.is_empty() {
            out.push_str("        <metadata>\n");
            for (key, value) in &self.metadata {
                let _ = write!(out, "          <value key=\"{}\">{}</value>\n", xml::escape(key), xml::escape(value));
            }
            out.push_str("        </metadata>\n");
        }
        out.push_str("      </review>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn parses_attributes_and_children() {
        let node = parse_document(concat!(
            "<review date=\"2016-09-15\" rating=\"80\" score=\"5\" karma=\"-1\" id=\"17\">",
            "<summary>Works great</summary>",
            "<description><p>Flashed without issue</p></description>",
            "<version>1.2.3</version>",
            "<reviewer_id>a1b2c3</reviewer_id>",
            "<reviewer_name>Sam Vale</reviewer_name>",
            "<lang>en_GB</lang>",
            "<metadata><value key=\"origin\">web</value></metadata>",
            "</review>",
        ))
        .unwrap();
        let review = Review::from_element(&node);
        assert_eq!(review.id.as_deref(), Some("17"));
        assert_eq!(review.rating, 80);
        assert_eq!(review.score, 5);
        assert_eq!(review.karma, -1);
        assert_eq!(review.date, 1473897600);
        assert_eq!(review.summary.as_deref(), Some("Works great"));
        assert_eq!(review.description.as_deref(), Some("<p>Flashed without issue</p>"));
        assert_eq!(review.version.as_deref(), Some("1.2.3"));
        assert_eq!(review.reviewer_id.as_deref(), Some("a1b2c3"));
        assert_eq!(review.reviewer_name.as_deref(), Some("Sam Vale"));
        assert_eq!(review.locale.as_deref(), Some("en_GB"));
        assert_eq!(review.metadata.get("origin").map(String::as_str), Some("web"));
    }

    #[test]
    fn timestamp_attribute_wins_over_date() {
        let node = parse_document(r#"<review timestamp="1500000000" date="2016-09-15"/>"#).unwrap();
        assert_eq!(Review::from_element(&node).date, 1500000000);
    }

    #[test]
    fn serializes_date_as_rfc3339() {
        let mut review = Review::new();
        review.id = Some("17".to_string());
        review.date = 1473897600;
        review.summary = Some("Works great".to_string());
        let mut out = String::new();
        review.to_xml(&mut out);
        assert_eq!(
            out,
            concat!(
                "      <review date=\"2016-09-15T00:00:00Z\" id=\"17\">\n",
                "        <summary>Works great</summary>\n",
                "      </review>\n",
            )
        );
    }

    #[test]
    fn review_date_round_trips() {
        let mut review = Review::new();
        review.date = 1473897600;
        let mut out = String::new();
        review.to_xml(&mut out);
        let reparsed = Review::from_element(&parse_document(&out).unwrap());
        assert_eq!(reparsed.date, 1473897600);
    }
}
