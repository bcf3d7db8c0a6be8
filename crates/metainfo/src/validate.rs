use exn::bail;
use tracing::instrument;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::models::{Component, ComponentKind};

/// Metadata licenses acceptable for redistribution in a public catalog.
const VALID_METADATA_LICENSES: &[&str] = &[
    "CC0-1.0",
    "CC-BY-3.0",
    "CC-BY-4.0",
    "CC-BY-SA-3.0",
    "CC-BY-SA-4.0",
    "GFDL-1.1",
    "GFDL-1.2",
    "GFDL-1.3",
    "FSFAP",
];

impl Component {
    /// Checks that the component carries everything a catalog entry needs.
    ///
    /// Checks run in a fixed order and the first failure is returned, so a
    /// caller sees one actionable problem at a time.
    #[instrument(skip(self), fields(id = self.id.as_deref().unwrap_or("")))]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("id"));
        }
        if self.name.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("name"));
        }
        if self.summary.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("summary"));
        }
        if self.description.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("description"));
        }
        match self.kind {
            Some(ComponentKind::Firmware) => {
                if self.provides.is_empty() {
                    bail!(ValidationErrorKind::MissingTag("provides"));
                }
                if self.releases.is_empty() {
                    bail!(ValidationErrorKind::MissingTag("release"));
                }
            },
            Some(ComponentKind::Desktop) => {
                if self.screenshots.is_empty() {
                    bail!(ValidationErrorKind::MissingTag("screenshot"));
                }
            },
            _ => {},
        }
        match self.metadata_license.as_deref() {
            None | Some("") => bail!(ValidationErrorKind::MissingTag("metadata_license")),
            Some(license) if !VALID_METADATA_LICENSES.contains(&license) => {
                bail!(ValidationErrorKind::InvalidMetadataLicense(license.to_string()));
            },
            Some(_) => {},
        }
        if self.project_license.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("project_license"));
        }
        if self.developer_name.as_deref().is_none_or(str::is_empty) {
            bail!(ValidationErrorKind::MissingTag("developer_name"));
        }
        for release in &self.releases {
            if release.version.as_deref().is_none_or(str::is_empty) {
                bail!(ValidationErrorKind::ReleaseWithoutVersion);
            }
            if release.timestamp == 0 {
                bail!(ValidationErrorKind::ReleaseWithoutTimestamp);
            }
        }
        Ok(())
    }
}
