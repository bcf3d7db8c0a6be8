use std::fmt::Write;

use super::{Image, ImageKind};
use crate::text;
use crate::xml::{self, Element};

/// A captioned group of screenshot images.
///
/// Screenshots have no field-based natural key; deduplication at the
/// component level is full structural equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screenshot {
    /// Screenshot type, e.g. "default".
    pub kind: Option<String>,
    /// Caption as a canonical flat markup string.
    pub caption: Option<String>,
    pub images: Vec<Image>,
}

impl Screenshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the image of a specific kind, if any.
    pub fn image_by_kind(&self, kind: &ImageKind) -> Option<&Image> {
        self.images.iter().find(|image| image.kind.as_ref() == Some(kind))
    }

    /// Adds an image, replacing any existing image of the same kind.
    /// The new image is appended, so a replacement moves to the end.
    pub fn add_image(&mut self, image: Image) {
        if let Some(index) = self.images.iter().position(|existing| existing.kind == image.kind) {
            self.images.remove(index);
        }
        self.images.push(image);
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut screenshot = Self::default();
        if let Some(kind) = node.attr("type") {
            screenshot.kind = Some(kind.to_string());
        }
        for child in &node.children {
            match child.tag.as_str() {
                "caption" => screenshot.caption = Some(text::flatten_description(child)),
                "image" => screenshot.add_image(Image::from_element(child)),
                _ => {},
            }
        }
        screenshot
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        out.push_str("      <screenshot");
        if let Some(kind) = &self.kind {
            let _ = write!(out, " type=\"{}\"", xml::escape(kind));
        }
        out.push_str(">\n");
        for image in &self.images {
            image.to_xml(out);
        }
        if let Some(caption) = &self.caption {
            // Caption markup is already canonical; emit verbatim.
            let _ = write!(out, "        <caption>{caption}</caption>\n");
        }
        out.push_str("      </screenshot>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn image(kind: Option<ImageKind>, url: &str) -> Image {
        let mut image = Image::new();
        image.kind = kind;
        image.url = Some(url.to_string());
        image
    }

    #[test]
    fn parses_images_and_caption() {
        let node = parse_document(concat!(
            "<screenshot type=\"default\">",
            "<image type=\"source\">http://a.png</image>",
            "<image type=\"thumbnail\">http://b.png</image>",
            "<caption><p>The main window</p></caption>",
            "</screenshot>",
        ))
        .unwrap();
        let screenshot = Screenshot::from_element(&node);
        assert_eq!(screenshot.kind.as_deref(), Some("default"));
        assert_eq!(screenshot.caption.as_deref(), Some("<p>The main window</p>"));
        assert_eq!(screenshot.images.len(), 2);
        let thumbnail = screenshot.image_by_kind(&ImageKind::Thumbnail).unwrap();
        assert_eq!(thumbnail.url.as_deref(), Some("http://b.png"));
    }

    #[test]
    fn bare_caption_text_gains_markup() {
        let node = parse_document("<screenshot><image>http://c.png</image><caption>No markup</caption></screenshot>")
            .unwrap();
        let screenshot = Screenshot::from_element(&node);
        assert_eq!(screenshot.caption.as_deref(), Some("<p>No markup</p>"));
    }

    #[test]
    fn add_image_replaces_by_kind() {
        let mut screenshot = Screenshot::new();
        screenshot.add_image(image(Some(ImageKind::Source), "http://old.png"));
        screenshot.add_image(image(Some(ImageKind::Thumbnail), "http://thumb.png"));
        screenshot.add_image(image(Some(ImageKind::Source), "http://new.png"));
        assert_eq!(screenshot.images.len(), 2);
        // The replacement is appended after the surviving thumbnail.
        assert_eq!(screenshot.images[0].kind, Some(ImageKind::Thumbnail));
        assert_eq!(screenshot.images[1].url.as_deref(), Some("http://new.png"));
    }

    #[test]
    fn duplicate_image_kinds_in_source_keep_the_last() {
        let node = parse_document(concat!(
            "<screenshot>",
            "<image type=\"source\">http://first.png</image>",
            "<image type=\"source\">http://second.png</image>",
            "</screenshot>",
        ))
        .unwrap();
        let screenshot = Screenshot::from_element(&node);
        assert_eq!(screenshot.images.len(), 1);
        assert_eq!(screenshot.images[0].url.as_deref(), Some("http://second.png"));
    }
}
