use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::str::FromStr;

use crate::xml::{self, Element};

/// One rendition of a screenshot, with optional pixel dimensions
/// (0 = unset).
///
/// Within a screenshot, `kind` is the natural key: at most one image per
/// kind, enforced by [`Screenshot::add_image`](super::Screenshot::add_image).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub kind: Option<ImageKind>,
    pub width: u32,
    pub height: u32,
    pub url: Option<String>,
}

/// Image rendition type enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// The full-size upstream image.
    Source,
    /// A downscaled rendition.
    Thumbnail,
    /// Any other rendition type, kept verbatim for round-tripping.
    Other(String),
}

impl ImageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Source => "source",
            Self::Thumbnail => "thumbnail",
            Self::Other(kind) => kind,
        }
    }
}

impl FromStr for ImageKind {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "source" => Self::Source,
            "thumbnail" => Self::Thumbnail,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut image = Self::default();
        if let Some(kind) = node.attr("type") {
            image.kind = kind.parse().ok();
        }
        if let Some(width) = node.attr("width").and_then(|raw| raw.parse().ok()) {
            image.width = width;
        }
        if let Some(height) = node.attr("height").and_then(|raw| raw.parse().ok()) {
            image.height = height;
        }
        image.url = node.text.clone();
        image
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        out.push_str("        <image");
        if let Some(kind) = &self.kind {
            let _ = write!(out, " type=\"{}\"", xml::escape(kind.as_str()));
        }
        if self.width > 0 {
            let _ = write!(out, " width=\"{}\"", self.width);
        }
        if self.height > 0 {
            let _ = write!(out, " height=\"{}\"", self.height);
        }
        out.push('>');
        if let Some(url) = &self.url {
            out.push_str(&xml::escape(url));
        }
        out.push_str("</image>\n");
    }
}
