use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::str::FromStr;

use super::Checksum;
use crate::text;
use crate::xml::{self, Element};

/// One version's release metadata: sizes, urgency, checksums, description
/// and optional download location.
///
/// Within a component, `version` is the natural key: exactly one release
/// per version, enforced by [`Component::add_release`](super::Component::add_release).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    pub version: Option<String>,
    /// Canonical flat markup string.
    pub description: Option<String>,
    /// Unix seconds; 0 = unset.
    pub timestamp: i64,
    pub checksums: Vec<Checksum>,
    /// Download URL.
    pub location: Option<String>,
    /// Installed size in bytes; 0 = unset.
    pub size_installed: u64,
    /// Download size in bytes; 0 = unset.
    pub size_download: u64,
    pub urgency: Option<Urgency>,
}

/// Release urgency enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
    /// Any other urgency value, kept verbatim for round-tripping.
    Other(String),
}

impl Urgency {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Other(urgency) => urgency,
        }
    }
}

impl FromStr for Urgency {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Release {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the checksum covering a specific target, if any.
    pub fn checksum_by_target(&self, target: &str) -> Option<&Checksum> {
        self.checksums.iter().find(|checksum| checksum.target.as_deref() == Some(target))
    }

    /// Adds a checksum, replacing any existing checksum with the same
    /// target. The new checksum is appended, so a replacement moves to
    /// the end.
    pub fn add_checksum(&mut self, checksum: Checksum) {
        if let Some(index) = self.checksums.iter().position(|existing| existing.target == checksum.target) {
            self.checksums.remove(index);
        }
        self.checksums.push(checksum);
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut release = Self::default();
        // A derived date is evaluated first so that an explicit timestamp
        // attribute wins when both are present.
        if let Some(date) = node.attr("date")
            && let Some(seconds) = text::parse_date(date)
        {
            release.timestamp = seconds;
        }
        if let Some(timestamp) = node.attr("timestamp").and_then(|raw| raw.parse().ok()) {
            release.timestamp = timestamp;
        }
        if let Some(urgency) = node.attr("urgency") {
            release.urgency = urgency.parse().ok();
        }
        if let Some(version) = node.attr("version") {
            release.version = Some(fix_hex_version(version));
        }
        for child in &node.children {
            match child.tag.as_str() {
                "description" => release.description = Some(text::flatten_description(child)),
                "location" => release.location = child.text.clone(),
                "size" => {
                    // Size elements without a type attribute are skipped.
                    let Some(kind) = child.attr("type") else {
                        continue;
                    };
                    let Some(size) = child.text.as_deref().and_then(|raw| raw.trim().parse().ok()) else {
                        continue;
                    };
                    match kind {
                        "installed" => release.size_installed = size,
                        "download" => release.size_download = size,
                        _ => {},
                    }
                },
                "checksum" => release.add_checksum(Checksum::from_element(child)),
                _ => {},
            }
        }
        release
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        out.push_str("      <release");
        if let Some(version) = &self.version {
            let _ = write!(out, " version=\"{}\"", xml::escape(version));
        }
        if self.timestamp != 0 {
            let _ = write!(out, " timestamp=\"{}\"", self.timestamp);
        }
        if let Some(urgency) = &self.urgency {
            let _ = write!(out, " urgency=\"{}\"", xml::escape(urgency.as_str()));
        }
        out.push_str(">\n");
        if self.size_installed > 0 {
            let _ = write!(out, "        <size type=\"installed\">{}</size>\n", self.size_installed);
        }
        if self.size_download > 0 {
            let _ = write!(out, "        <size type=\"download\">{}</size>\n", self.size_download);
        }
        if let Some(location) = &self.location {
            let _ = write!(out, "        <location>{}</location>\n", xml::escape(location));
        }
        for checksum in &self.checksums {
            checksum.to_xml(out);
        }
        if let Some(description) = &self.description {
            let _ = write!(out, "        <description>{description}</description>\n");
        }
        out.push_str("      </release>\n");
    }
}

/// Rewrites a hexadecimal version string ("0x0A") as its decimal form
/// ("10"). Anything that does not parse as hex is kept verbatim.
fn fix_hex_version(version: &str) -> String {
    if let Some(hex) = version.strip_prefix("0x")
        && let Ok(number) = u64::from_str_radix(hex, 16)
    {
        return number.to_string();
    }
    version.to_string()
}
