use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::xml::Element;

/// One capability offered by a component.
///
/// Within a component, `value` is the natural key for deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provide {
    pub kind: Option<ProvideKind>,
    /// Capability value, lower-cased during parsing.
    pub value: Option<String>,
}

/// Provided capability type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvideKind {
    /// A firmware blob flashed onto a device, identified by GUID.
    FirmwareFlashed,
}

impl ProvideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirmwareFlashed => "firmware-flashed",
        }
    }
}

impl Display for ProvideKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Provide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `<firmware>` tags are recognized; anything else yields an
    /// empty provide.
    pub(crate) fn from_element(node: &Element) -> Self {
        let mut provide = Self::default();
        if node.tag == "firmware" {
            if node.attr("type") == Some("flashed") {
                provide.kind = Some(ProvideKind::FirmwareFlashed);
            }
            provide.value = node.text.as_ref().map(|value| value.to_lowercase());
        }
        provide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn flashed_firmware_is_recognized() {
        let node = parse_document(r#"<firmware type="flashed">84F40464-9272-4EF7-9399-CD95F12DA696</firmware>"#)
            .unwrap();
        let provide = Provide::from_element(&node);
        assert_eq!(provide.kind, Some(ProvideKind::FirmwareFlashed));
        // Values are lower-cased.
        assert_eq!(provide.value.as_deref(), Some("84f40464-9272-4ef7-9399-cd95f12da696"));
    }

    #[test]
    fn unflashed_firmware_has_no_kind() {
        let node = parse_document("<firmware>bootloader</firmware>").unwrap();
        let provide = Provide::from_element(&node);
        assert_eq!(provide.kind, None);
        assert_eq!(provide.value.as_deref(), Some("bootloader"));
    }

    #[test]
    fn other_tags_yield_an_empty_provide() {
        let node = parse_document("<modalias>usb:v0123*</modalias>").unwrap();
        let provide = Provide::from_element(&node);
        assert_eq!(provide.kind, None);
        assert_eq!(provide.value, None);
    }
}
