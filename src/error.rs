//! Error types for archival indexing operations.
//!
//! This module provides the [`IndexError`] type for all indexing operations
//! and the [`Result`] convenience type.
//!
//! Fatality is a matter of propagation, not of type: fatal conditions bubble
//! up and abort document generation for the current record only, while
//! non-fatal conditions ([`IndexError::TransientFetch`],
//! [`IndexError::DateParse`], [`IndexError::AgentResolution`]) are produced
//! by inner helpers and absorbed at the call site, skipping the single item
//! they concern.

use thiserror::Error;

/// Error type for all archival indexing operations.
///
/// Represents the error conditions that can occur while resolving archival
/// references, classifying record visibility, or generating index documents
/// and circulation records.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A reference id does not match the pattern of its record kind.
    ///
    /// Rejects construction of the record.
    #[error("Invalid reference: {0}")]
    Validation(String),

    /// No record kind could be inferred from a reference id.
    #[error("Unable to infer record kind from reference: {0}")]
    Dispatch(String),

    /// A required reference failed to resolve, or a resolved payload is
    /// missing a required member. Fatal to the current document.
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// A rights statement was not found in the rights lookup. Fatal.
    #[error("Rights statement not found: {0}")]
    RightsNotFound(String),

    /// A repository name outside the fixed library table. Fatal.
    #[error("Unknown library: {0}")]
    UnknownLibrary(String),

    /// A manifest thumbnail URL that does not match the resizable shape.
    /// Fatal.
    #[error("Unexpected thumbnail URL: {0}")]
    MalformedThumbnail(String),

    /// An individual manifest fetch failed. Non-fatal: the caller skips
    /// that digital object and continues with the others.
    #[error("Manifest fetch failed: {0}")]
    TransientFetch(String),

    /// A date expression that cannot be reduced to a year. Non-fatal: the
    /// caller skips the year-derived fields for that date entry only.
    #[error("Cannot parse date expression: {0}")]
    DateParse(String),

    /// A linked agent failed to resolve. Non-fatal: the caller skips that
    /// agent.
    #[error("Agent resolution failed: {0}")]
    AgentResolution(String),

    /// An operation that is not defined for the record kind it was invoked
    /// on.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// XML error while rendering or re-reading an add-doc.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error from the underlying sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;
