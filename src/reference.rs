//! Reference-id patterns, record-kind dispatch, and document identifiers.
//!
//! Every entity in the catalog API is addressed by an opaque reference id
//! whose shape is fixed per record kind (for example
//! `/repositories/3/accessions/42`). This module owns those patterns, the
//! substring-based dispatch from a reference id to a [`RecordKind`], and the
//! derivation of index document ids (`as:<repo><a|r><n>`) from reference
//! ids and back from sink file names.

use crate::error::{IndexError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ACCESSION_REF: Regex = Regex::new(r"^/?repositories/\d+/accessions/\d+$").unwrap();
    static ref COLLECTION_REF: Regex = Regex::new(r"^/?repositories/\d+/resources/\d+$").unwrap();
    static ref ARCHIVAL_OBJECT_REF: Regex =
        Regex::new(r"^/?repositories/\d+/archival_objects/\d+$").unwrap();
    static ref DIGITAL_OBJECT_REF: Regex =
        Regex::new(r"^/?repositories/\d+/digital_objects/\d+$").unwrap();
    static ref TOP_CONTAINER_REF: Regex =
        Regex::new(r"^/?repositories/\d+/top_containers/\d+$").unwrap();
    static ref DOC_ID: Regex = Regex::new(r"^as:\d+[ar]\d+$").unwrap();
    static ref DOC_FILE: Regex = Regex::new(r"^as:(\d+)([ar])(\d+)\.xml$").unwrap();
}

/// The kind of an archival record.
///
/// Dispatch over record kinds is done by pattern match; there is no
/// inheritance hierarchy behind these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// An intake-level archival description. May be superseded by a
    /// published collection.
    Accession,
    /// A finding-aid-level archival description (a "resource" in the
    /// catalog API), the primary nesting container for components.
    Collection,
    /// A nested component within a collection's hierarchy.
    ArchivalObject,
    /// A digitized object with an ordered list of file versions.
    DigitalObject,
    /// A physical storage unit (box/folder) linked to records via
    /// instances.
    TopContainer,
}

impl RecordKind {
    /// Whether records of this kind may have nested components.
    ///
    /// Only collections and archival objects nest; the other kinds always
    /// expose an empty child list, which terminates tree recursion.
    #[must_use]
    pub fn can_nest(self) -> bool {
        matches!(self, RecordKind::Collection | RecordKind::ArchivalObject)
    }

    /// Whether a reference id matches this kind's pattern.
    #[must_use]
    pub fn matches_ref(self, ref_id: &str) -> bool {
        self.pattern().is_match(ref_id)
    }

    /// A lowercase label for error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Accession => "accession",
            RecordKind::Collection => "collection",
            RecordKind::ArchivalObject => "archival object",
            RecordKind::DigitalObject => "digital object",
            RecordKind::TopContainer => "top container",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            RecordKind::Accession => &ACCESSION_REF,
            RecordKind::Collection => &COLLECTION_REF,
            RecordKind::ArchivalObject => &ARCHIVAL_OBJECT_REF,
            RecordKind::DigitalObject => &DIGITAL_OBJECT_REF,
            RecordKind::TopContainer => &TOP_CONTAINER_REF,
        }
    }
}

/// Infer the record kind from a reference id by its path marker.
///
/// Only the kinds that are dispatched from the catalog's id listings are
/// inferred here: accessions, collections, and top containers. Anything
/// else fails; there is no best-effort guess.
///
/// # Errors
///
/// Returns [`IndexError::Dispatch`] when no marker is recognized.
pub fn kind_for_ref(ref_id: &str) -> Result<RecordKind> {
    if ref_id.contains("/accessions/") {
        Ok(RecordKind::Accession)
    } else if ref_id.contains("/resources/") {
        Ok(RecordKind::Collection)
    } else if ref_id.contains("/top_containers/") {
        Ok(RecordKind::TopContainer)
    } else {
        Err(IndexError::Dispatch(ref_id.to_string()))
    }
}

/// Derive the index document id for an accession or collection reference.
///
/// `/repositories/4/accessions/123` becomes `as:4a123` and
/// `/repositories/4/resources/123` becomes `as:4r123`.
///
/// # Errors
///
/// Returns [`IndexError::Validation`] when the reference does not reduce to
/// a well-formed document id.
pub fn doc_id_for_ref(ref_id: &str) -> Result<String> {
    let id = ref_id
        .replace("/repositories/", "as:")
        .replace("/accessions/", "a")
        .replace("/resources/", "r");
    if DOC_ID.is_match(&id) {
        Ok(id)
    } else {
        Err(IndexError::Validation(format!(
            "reference {ref_id} maps to improper document id {id}"
        )))
    }
}

/// Recover the reference id from a sink file name such as `as:4r123.xml`.
///
/// # Errors
///
/// Returns [`IndexError::Validation`] for file names outside the expected
/// shape.
pub fn ref_for_doc_file(file_name: &str) -> Result<String> {
    let caps = DOC_FILE
        .captures(file_name)
        .ok_or_else(|| IndexError::Validation(format!("invalid document file name: {file_name}")))?;
    let marker = if &caps[2] == "r" {
        "/resources/"
    } else {
        "/accessions/"
    };
    Ok(format!("/repositories/{}{marker}{}", &caps[1], &caps[3]))
}
