pub mod error;
pub mod models;
mod text;
mod validate;
pub mod xml;

use tracing::instrument;

use crate::error::ParseError;
pub use crate::models::Component;
pub use crate::xml::Element;

/// Easy, top-level entrypoint for parsing a single MetaInfo document into a
/// [`Component`].
///
/// Equivalent to [`Component::from_xml`]: the whole document is parsed
/// up-front, so malformed XML fails here rather than surfacing later as a
/// half-populated component.
///
/// ```
/// let component = metainfo::parse(
///     r#"<component type="firmware">
///          <id>com.hughski.ColorHug2.firmware</id>
///        </component>"#,
/// )?;
/// assert_eq!(component.id.as_deref(), Some("com.hughski.ColorHug2.firmware"));
/// # Ok::<(), metainfo::error::ParseError>(())
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse(xml: &str) -> Result<Component, ParseError> {
    Component::from_xml(xml)
}
