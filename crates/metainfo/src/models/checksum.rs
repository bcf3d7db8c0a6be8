use std::fmt::Write;

use crate::xml::{self, Element};

/// A named digest of one release artifact.
///
/// Within a release, `target` is the natural key: at most one checksum per
/// target, enforced by [`Release::add_checksum`](super::Release::add_checksum).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    /// Digest algorithm, e.g. "sha1" or "sha256".
    pub kind: String,
    /// What the digest covers, e.g. "content" or "container".
    pub target: Option<String>,
    /// Hex digest value.
    pub value: Option<String>,
    /// Name of the file the digest was computed over.
    pub filename: Option<String>,
}

impl Default for Checksum {
    fn default() -> Self {
        Self {
            kind: "sha1".to_string(),
            target: None,
            value: None,
            filename: None,
        }
    }
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut checksum = Self::default();
        if let Some(filename) = node.attr("filename") {
            checksum.filename = Some(filename.to_string());
        }
        if let Some(kind) = node.attr("type") {
            checksum.kind = kind.to_string();
        }
        if let Some(target) = node.attr("target") {
            checksum.target = Some(target.to_string());
        }
        checksum.value = node.text.clone();
        checksum
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        out.push_str("        <checksum");
        if let Some(filename) = &self.filename {
            let _ = write!(out, " filename=\"{}\"", xml::escape(filename));
        }
        if let Some(target) = &self.target {
            let _ = write!(out, " target=\"{}\"", xml::escape(target));
        }
        let _ = write!(out, " type=\"{}\">", xml::escape(&self.kind));
        if let Some(value) = &self.value {
            out.push_str(&xml::escape(value));
        }
        out.push_str("</checksum>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn parses_all_attributes() {
        let node =
            parse_document(r#"<checksum target="content" filename="firmware.bin" type="sha256">cafef00d</checksum>"#)
                .unwrap();
        let checksum = Checksum::from_element(&node);
        assert_eq!(checksum.kind, "sha256");
        assert_eq!(checksum.target.as_deref(), Some("content"));
        assert_eq!(checksum.filename.as_deref(), Some("firmware.bin"));
        assert_eq!(checksum.value.as_deref(), Some("cafef00d"));
    }

    #[test]
    fn kind_defaults_to_sha1() {
        let node = parse_document("<checksum>abc</checksum>").unwrap();
        let checksum = Checksum::from_element(&node);
        assert_eq!(checksum.kind, "sha1");
        assert_eq!(checksum.target, None);
    }

    #[test]
    fn serializes_only_set_attributes() {
        let mut checksum = Checksum::new();
        checksum.target = Some("container".to_string());
        checksum.value = Some("deadbeef".to_string());
        let mut out = String::new();
        checksum.to_xml(&mut out);
        assert_eq!(out, "        <checksum target=\"container\" type=\"sha1\">deadbeef</checksum>\n");
    }
}
