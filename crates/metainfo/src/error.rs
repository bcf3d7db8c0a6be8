//! MetaInfo Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! The two error families are deliberately disjoint: parsing can only fail
//! with a [`ParseError`] (the input is not well-formed XML) and validation
//! can only fail with a [`ValidationError`] (the document is well-formed but
//! not publishable). Schema oddities that are still structurally parseable
//! (unknown tags, missing optional attributes, unparseable numbers) are
//! tolerated silently and never surface as errors.

use derive_more::{Display, Error};

/// A parse error with automatic location tracking.
pub type ParseError = exn::Exn<ParseErrorKind>;
/// A validation error with automatic location tracking.
pub type ValidationError = exn::Exn<ValidationErrorKind>;

/// Ways the input text can fail to become an element tree.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input is not well-formed XML. Carries the underlying syntax
    /// error message.
    #[display("malformed XML: {_0}")]
    MalformedXml(#[error(not(source))] String),
}

/// Publishing rules a component can violate.
///
/// Validation is fail-fast: the first violated rule in the fixed check
/// order is reported, never an aggregate.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required tag is missing or empty.
    #[display("no <{_0}> tag")]
    MissingTag(#[error(not(source))] &'static str),
    /// The metadata license is not in the permitted set.
    #[display("invalid <metadata_license> tag: {_0}")]
    InvalidMetadataLicense(#[error(not(source))] String),
    /// A release has no version.
    #[display("no version in <release> tag")]
    ReleaseWithoutVersion,
    /// A release has no timestamp.
    #[display("no timestamp in <release> tag")]
    ReleaseWithoutTimestamp,
}
