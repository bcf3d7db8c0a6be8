use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::str::FromStr;

use tracing::instrument;

use super::{Bundle, Provide, ProvideKind, Release, Require, Review, Screenshot};
use crate::error::ParseError;
use crate::text;
use crate::xml::{self, Element};

/// The aggregate metadata record for one distributable software/firmware
/// item: identity, descriptive fields and the child collections.
///
/// A component exclusively owns its children; they are created during
/// parsing (one per corresponding element) or programmatically, and only
/// mutated through the add-* operations or direct field assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    pub id: Option<String>,
    pub kind: Option<ComponentKind>,
    pub update_contact: Option<String>,
    pub name: Option<String>,
    pub pkgname: Option<String>,
    pub summary: Option<String>,
    /// Canonical flat markup string.
    pub description: Option<String>,
    /// URL type ("homepage", "help", …) to URL.
    pub urls: BTreeMap<String, String>,
    /// Icon type to the accumulated icon records of that type.
    pub icons: BTreeMap<String, Vec<Icon>>,
    pub metadata_license: Option<String>,
    pub project_license: Option<String>,
    pub developer_name: Option<String>,
    pub releases: Vec<Release>,
    pub reviews: Vec<Review>,
    pub screenshots: Vec<Screenshot>,
    pub kudos: Vec<String>,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub provides: Vec<Provide>,
    pub requires: Vec<Require>,
    pub custom: BTreeMap<String, String>,
    pub bundle: Option<Bundle>,
}

/// Component type enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Firmware,
    Desktop,
    Generic,
    /// Any other component type, kept verbatim for round-tripping.
    Other(String),
}

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Firmware => "firmware",
            Self::Desktop => "desktop",
            Self::Generic => "generic",
            Self::Other(kind) => kind,
        }
    }
}

impl FromStr for ComponentKind {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "firmware" => Self::Firmware,
            "desktop" => Self::Desktop,
            "generic" => Self::Generic,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One icon record: the source element's attributes (minus `type`, which
/// becomes the map key) plus its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Icon {
    pub attrs: Vec<(String, String)>,
    pub value: Option<String>,
}

impl Component {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one `<component>` document.
    ///
    /// # Errors
    ///
    /// Fails with a [`ParseError`] if the input is not well-formed XML; no
    /// partial component is returned. Unrecognized child tags are silently
    /// ignored for forward compatibility.
    #[instrument(skip(xml), fields(xml_size = xml.len()))]
    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        let root = xml::parse_document(xml)?;
        Ok(Self::from_element(&root))
    }

    /// Builds a component from an already-parsed element tree. Tree
    /// traversal itself cannot fail; anything unrecognized is skipped.
    pub fn from_element(root: &Element) -> Self {
        let mut component = Self::default();
        if let Some(kind) = root.attr("type") {
            component.kind = kind.parse().ok();
        }
        for child in &root.children {
            match child.tag.as_str() {
                "id" => component.id = child.text.clone(),
                "updatecontact" | "update_contact" => component.update_contact = child.text.clone(),
                "metadata_license" => component.metadata_license = child.text.clone(),
                "project_license" | "licence" => component.project_license = child.text.clone(),
                "developer_name" => {
                    component.developer_name = Some(text::join_lines(child.text.as_deref().unwrap_or("")));
                },
                // Singular scalars are first-wins: duplicates are ignored.
                "name" if component.name.is_none() => {
                    component.name = Some(text::join_lines(child.text.as_deref().unwrap_or("")));
                },
                "pkgname" if component.pkgname.is_none() => {
                    component.pkgname = Some(text::join_lines(child.text.as_deref().unwrap_or("")));
                },
                "summary" if component.summary.is_none() => {
                    component.summary = Some(text::join_lines(child.text.as_deref().unwrap_or("")));
                },
                "description" if component.description.is_none() => {
                    component.description = Some(text::flatten_description(child));
                },
                "releases" => {
                    for node in &child.children {
                        if node.tag == "release" {
                            component.add_release(Release::from_element(node));
                        }
                    }
                },
                "reviews" => {
                    for node in &child.children {
                        if node.tag == "review" {
                            component.add_review(Review::from_element(node));
                        }
                    }
                },
                "screenshots" => {
                    for node in &child.children {
                        if node.tag == "screenshot" {
                            component.add_screenshot(Screenshot::from_element(node));
                        }
                    }
                },
                "provides" => {
                    for node in &child.children {
                        component.add_provide(Provide::from_element(node));
                    }
                },
                "requires" => {
                    for node in &child.children {
                        component.add_require(Require::from_element(node));
                    }
                },
                "kudos" => append_list_items(&mut component.kudos, child, "kudo"),
                "keywords" => append_list_items(&mut component.keywords, child, "keyword"),
                "categories" => append_list_items(&mut component.categories, child, "category"),
                "custom" => {
                    for node in &child.children {
                        if node.tag == "value"
                            && let Some(key) = node.attr("key")
                        {
                            component.custom.insert(key.to_string(), node.text.clone().unwrap_or_default());
                        }
                    }
                },
                "url" => {
                    let key = child.attr("type").unwrap_or("homepage");
                    component.urls.insert(key.to_string(), child.text.clone().unwrap_or_default());
                },
                "icon" => {
                    let key = child.attr("type").unwrap_or("unknown").to_string();
                    let icon = Icon {
                        attrs: child.attrs.iter().filter(|(name, _)| name != "type").cloned().collect(),
                        value: child.text.clone(),
                    };
                    // Later icons of the same type accumulate, they do
                    // not replace earlier ones.
                    component.icons.entry(key).or_default().push(icon);
                },
                // Last bundle wins.
                "bundle" => component.bundle = Some(Bundle::from_element(child)),
                _ => {},
            }
        }
        component
    }

    /// Adds a release unless one with the same version already exists
    /// (first wins).
    pub fn add_release(&mut self, release: Release) {
        if self.releases.iter().any(|existing| existing.version == release.version) {
            return;
        }
        self.releases.push(release);
    }

    /// Adds a review unless one with the same id already exists
    /// (first wins).
    pub fn add_review(&mut self, review: Review) {
        if self.reviews.iter().any(|existing| existing.id == review.id) {
            return;
        }
        self.reviews.push(review);
    }

    /// Adds a screenshot unless a structurally equal one already exists.
    pub fn add_screenshot(&mut self, screenshot: Screenshot) {
        if self.screenshots.contains(&screenshot) {
            return;
        }
        self.screenshots.push(screenshot);
    }

    /// Adds a provided capability unless one with the same value already
    /// exists (first wins).
    pub fn add_provide(&mut self, provide: Provide) {
        if self.provides.iter().any(|existing| existing.value == provide.value) {
            return;
        }
        self.provides.push(provide);
    }

    /// Adds a required capability unless one with the same value already
    /// exists (first wins).
    pub fn add_require(&mut self, require: Require) {
        if self.requires.iter().any(|existing| existing.value == require.value) {
            return;
        }
        self.requires.push(require);
    }

    /// Returns all provided capabilities of a certain kind.
    pub fn provides_by_kind(&self, kind: ProvideKind) -> Vec<&Provide> {
        self.provides.iter().filter(|provide| provide.kind == Some(kind)).collect()
    }

    /// Returns the required capability with a specific kind and value,
    /// if any.
    pub fn require_by(&self, kind: &str, value: &str) -> Option<&Require> {
        self.requires.iter().find(|require| require.kind == kind && require.value.as_deref() == Some(value))
    }

    /// Renders the component into its canonical XML fragment.
    ///
    /// The fragment always targets the firmware-metadata profile: the root
    /// is emitted as `<component type="firmware">` regardless of the
    /// component's actual kind. Optional fields that are unset produce no
    /// element at all, and collection wrappers appear only when non-empty.
    /// `metadata_license` and `update_contact` are never serialized.
    #[instrument(skip(self), fields(id = self.id.as_deref().unwrap_or("")))]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("  <component type=\"firmware\">\n");
        if let Some(id) = &self.id {
            let _ = write!(out, "    <id>{}</id>\n", xml::escape(id));
        }
        if let Some(pkgname) = &self.pkgname {
            let _ = write!(out, "    <pkgname>{}</pkgname>\n", xml::escape(pkgname));
        }
        if let Some(name) = &self.name {
            let _ = write!(out, "    <name>{}</name>\n", xml::escape(name));
        }
        if let Some(summary) = &self.summary {
            let _ = write!(out, "    <summary>{}</summary>\n", xml::escape(summary));
        }
        if let Some(developer_name) = &self.developer_name {
            let _ = write!(out, "    <developer_name>{}</developer_name>\n", xml::escape(developer_name));
        }
        if let Some(project_license) = &self.project_license {
            let _ = write!(out, "    <project_license>{}</project_license>\n", xml::escape(project_license));
        }
        if let Some(description) = &self.description {
            let _ = write!(out, "    <description>{description}</description>\n");
        }
        if let Some(bundle) = &self.bundle {
            bundle.to_xml(&mut out);
        }
        for (key, url) in &self.urls {
            let _ = write!(out, "    <url type=\"{}\">{}</url>\n", xml::escape(key), xml::escape(url));
        }
        for (key, icons) in &self.icons {
            for icon in icons {
                let _ = write!(out, "    <icon type=\"{}\">", xml::escape(key));
                if let Some(value) = &icon.value {
                    out.push_str(&xml::escape(value));
                }
                out.push_str("</icon>\n");
            }
        }
        if !self.releases.is_empty() {
            out.push_str("    <releases>\n");
            for release in &self.releases {
                release.to_xml(&mut out);
            }
            out.push_str("    </releases>\n");
        }
        if !self.reviews.is_empty() {
            out.push_str("    <reviews>\n");
            for review in &self.reviews {
                review.to_xml(&mut out);
            }
            out.push_str("    </reviews>\n");
        }
        if !self.screenshots.is_empty() {
            out.push_str("    <screenshots>\n");
            for screenshot in &self.screenshots {
                screenshot.to_xml(&mut out);
            }
            out.push_str("    </screenshots>\n");
        }
        write_string_list(&mut out, "kudos", "kudo", &self.kudos);
        write_string_list(&mut out, "keywords", "keyword", &self.keywords);
        write_string_list(&mut out, "categories", "category", &self.categories);
        if !self.provides.is_empty() {
            out.push_str("    <provides>\n");
            for provide in &self.provides {
                let _ = write!(
                    out,
                    "      <firmware type=\"flashed\">{}</firmware>\n",
                    xml::escape(provide.value.as_deref().unwrap_or("")),
                );
            }
            out.push_str("    </provides>\n");
        }
        if !self.requires.is_empty() {
            out.push_str("    <requires>\n");
            for require in &self.requires {
                require.to_xml(&mut out);
            }
            out.push_str("    </requires>\n");
        }
        if !self.custom.is_empty() {
            out.push_str("    <custom>\n");
            for (key, value) in &self.custom {
                let _ = write!(out, "      <value key=\"{}\">{}</value>\n", xml::escape(key), xml::escape(value));
            }
            out.push_str("    </custom>\n");
        }
        out.push_str("  </component>\n");
        out
    }
}

fn append_list_items(list: &mut Vec<String>, parent: &Element, tag: &str) {
    for child in &parent.children {
        if child.tag != tag {
            continue;
        }
        if let Some(value) = &child.text {
            list.push(value.clone());
        }
    }
}

fn write_string_list(out: &mut String, wrapper: &str, tag: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let _ = write!(out, "    <{wrapper}>\n");
    for value in values {
        let _ = write!(out, "      <{tag}>{}</{tag}>\n", xml::escape(value));
    }
    let _ = write!(out, "    </{wrapper}>\n");
}
