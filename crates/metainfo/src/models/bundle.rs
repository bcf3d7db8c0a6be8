use std::fmt::Write;

use crate::xml::{self, Element};

/// Container/runtime packaging information for a component.
///
/// A component holds at most one bundle; a later `<bundle>` element
/// silently replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Bundle type, e.g. "flatpak"; "unknown" when the attribute is absent.
    pub kind: String,
    pub runtime: String,
    pub sdk: String,
    pub value: Option<String>,
}

impl Default for Bundle {
    fn default() -> Self {
        Self {
            kind: "unknown".to_string(),
            runtime: "unknown".to_string(),
            sdk: "unknown".to_string(),
            value: None,
        }
    }
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        Self {
            kind: node.attr("type").unwrap_or("unknown").to_string(),
            runtime: node.attr("runtime").unwrap_or("unknown").to_string(),
            sdk: node.attr("sdk").unwrap_or("unknown").to_string(),
            value: node.text.clone(),
        }
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        let _ = write!(out, "    <bundle type=\"{}\"", xml::escape(&self.kind));
        if self.runtime != "unknown" {
            let _ = write!(out, " runtime=\"{}\"", xml::escape(&self.runtime));
        }
        if self.sdk != "unknown" {
            let _ = write!(out, " sdk=\"{}\"", xml::escape(&self.sdk));
        }
        out.push('>');
        if let Some(value) = &self.value {
            out.push_str(&xml::escape(value));
        }
        out.push_str("</bundle>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn absent_attributes_default_to_unknown() {
        let node = parse_document("<bundle>app/org.example.App/x86_64/stable</bundle>").unwrap();
        let bundle = Bundle::from_element(&node);
        assert_eq!(bundle.kind, "unknown");
        assert_eq!(bundle.runtime, "unknown");
        assert_eq!(bundle.sdk, "unknown");
        assert_eq!(bundle.value.as_deref(), Some("app/org.example.App/x86_64/stable"));
    }

    #[test]
    fn unknown_runtime_and_sdk_are_omitted_from_output() {
        let node = parse_document(
            r#"<bundle type="flatpak" runtime="org.gnome.Platform/x86_64/3.24">app/org.example.App/x86_64/stable</bundle>"#,
        )
        .unwrap();
        let bundle = Bundle::from_element(&node);
        let mut out = String::new();
        bundle.to_xml(&mut out);
        assert_eq!(
            out,
            "    <bundle type=\"flatpak\" runtime=\"org.gnome.Platform/x86_64/3.24\">app/org.example.App/x86_64/stable</bundle>\n",
        );
    }
}
