//! Abstract MARC circulation records for archival holdings.
//!
//! The circulation side of indexing maps a record into a small abstract
//! bibliographic field list: a title field with a non-filing-character
//! indicator, a fixed provenance note, and one holdings field per top
//! container. Serialization to ISO 2709 binary or MARCXML is delegated to
//! a [`MarcSerializer`] collaborator; this module only shapes the fields.

use crate::error::Result;
use crate::natural_sort::natural_cmp;
use crate::record::ArchivalRecord;
use crate::reference::doc_id_for_ref;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Shelving-location code carried on every container holdings field.
pub const SHELVING_LOCATION: &str = "SC-STACKS-MANUSCRIPT";

/// Prefix of the provenance note field.
pub const PROVENANCE_PREFIX: &str = "From ArchivesSpace: ";

/// A subfield of a circulation-record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcSubfield {
    /// Subfield code.
    pub code: char,
    /// Subfield value.
    pub value: String,
}

/// A data field of a circulation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcField {
    /// Field tag (3 digits).
    pub tag: String,
    /// First indicator.
    pub indicator1: char,
    /// Second indicator.
    pub indicator2: char,
    /// Subfields, in order.
    pub subfields: SmallVec<[MarcSubfield; 4]>,
}

impl MarcField {
    /// Create a field with no subfields.
    #[must_use]
    pub fn new(tag: &str, indicator1: char, indicator2: char) -> Self {
        MarcField {
            tag: tag.to_string(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(MarcSubfield {
            code,
            value: value.into(),
        });
    }
}

/// An abstract circulation record: control fields plus data fields, in
/// emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationRecord {
    /// Control fields as (tag, value) pairs.
    pub control_fields: Vec<(String, String)>,
    /// Data fields in order.
    pub fields: Vec<MarcField>,
}

/// Collaborator that serializes circulation records to a persisted MARC
/// encoding (binary or XML).
pub trait MarcSerializer {
    /// Serialize one circulation record.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the record cannot be encoded.
    fn serialize(&mut self, record: &CirculationRecord) -> Result<Vec<u8>>;
}

/// The non-filing-character indicator for a title.
///
/// Derived from a fixed prefix table: `"A "` skips 2 characters, `"The "`
/// skips 4, anything else files from the first character.
#[must_use]
pub fn nonfiling_indicator(title: &str) -> char {
    if title.starts_with("A ") {
        '2'
    } else if title.starts_with("The ") {
        '4'
    } else {
        '0'
    }
}

/// Build the abstract circulation record for an accession or collection.
///
/// Emits a `001` control field with the document id, a `245` title field,
/// a `590` provenance note, and one `949` per naturally-sorted top
/// container carrying its call number, the fixed shelving location, and
/// its barcode.
///
/// # Errors
///
/// Returns the first fatal resolution error hit while gathering the
/// record's title or containers.
pub fn build_circulation_record(record: &ArchivalRecord<'_>) -> Result<CirculationRecord> {
    let mut circulation = CirculationRecord::default();
    circulation
        .control_fields
        .push(("001".to_string(), doc_id_for_ref(record.uri()?)?));

    let title = record.title()?;
    let mut field = MarcField::new("245", '0', nonfiling_indicator(title));
    field.add_subfield('a', title);
    circulation.fields.push(field);

    let mut field = MarcField::new("590", '1', ' ');
    field.add_subfield('a', format!("{PROVENANCE_PREFIX}{}", record.uri()?));
    circulation.fields.push(field);

    let call_number = record.call_number()?;
    let mut containers: Vec<(String, &ArchivalRecord<'_>)> = Vec::new();
    for container in record.top_containers()? {
        containers.push((container.container_call_number("")?, container));
    }
    containers.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

    for (_, container) in containers {
        let mut field = MarcField::new("949", ' ', ' ');
        field.add_subfield('a', container.container_call_number(&call_number)?);
        field.add_subfield('h', SHELVING_LOCATION);
        field.add_subfield('i', container.barcode()?);
        circulation.fields.push(field);
    }

    Ok(circulation)
}
