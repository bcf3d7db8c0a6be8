use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::str::FromStr;

use crate::xml::{self, Element};

/// One capability a component depends on.
///
/// `kind` is the source element's own tag name (`id`, `firmware`, …).
/// Within a component, `value` is the natural key for deduplication. A
/// manually constructed requirement with an empty kind is skipped during
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Require {
    pub kind: String,
    pub compare: Option<Compare>,
    pub version: Option<String>,
    pub value: Option<String>,
}

/// Version comparison operator enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Compare {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Regex,
    Glob,
    /// Any other operator, kept verbatim for round-tripping.
    Other(String),
}

impl Compare {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
            Self::Regex => "regex",
            Self::Glob => "glob",
            Self::Other(compare) => compare,
        }
    }
}

impl FromStr for Compare {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "gt" => Self::Gt,
            "le" => Self::Le,
            "ge" => Self::Ge,
            "regex" => Self::Regex,
            "glob" => Self::Glob,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for Compare {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Require {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_element(node: &Element) -> Self {
        let mut require = Self { kind: node.tag.clone(), ..Self::default() };
        if let Some(compare) = node.attr("compare") {
            require.compare = compare.parse().ok();
        }
        if let Some(version) = node.attr("version") {
            require.version = Some(version.to_string());
        }
        require.value = node.text.clone();
        require
    }

    pub(crate) fn to_xml(&self, out: &mut String) {
        if self.kind.is_empty() {
            return;
        }
        let _ = write!(out, "      <{}", self.kind);
        if let Some(compare) = &self.compare {
            let _ = write!(out, " compare=\"{}\"", xml::escape(compare.as_str()));
        }
        if let Some(version) = &self.version {
            let _ = write!(out, " version=\"{}\"", xml::escape(version));
        }
        out.push('>');
        if let Some(value) = &self.value {
            out.push_str(&xml::escape(value));
        }
        let _ = write!(out, "</{}>\n", self.kind);
    }
}
