//! Public-visibility rules: published and shadowed states per record kind.
//!
//! A record can exist in the catalog yet be hidden ("shadowed") from the
//! public index. The rules interact:
//!
//! | Kind | published | shadowed |
//! |---|---|---|
//! | Accession | `publish` flag | `!(published && !has published related collection)` |
//! | Collection | `publish` + finding aid completed + at least one container | `!published` |
//! | ArchivalObject | `publish` flag | not independently defined |
//! | DigitalObject | `publish` flag | `!published` |
//! | TopContainer | linked to a published record | `!published` |
//!
//! The accession rule keeps its double negative on purpose: an accession is
//! visible only while it is published and not yet superseded by a published
//! finding aid among its related resources.

use crate::error::{IndexError, Result};
use crate::json;
use crate::record::ArchivalRecord;
use crate::reference::RecordKind;

impl ArchivalRecord<'_> {
    /// Whether this record is published in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record (or, for
    /// collections, its containers) cannot be resolved.
    pub fn is_published(&self) -> Result<bool> {
        match self.kind() {
            RecordKind::Accession | RecordKind::ArchivalObject | RecordKind::DigitalObject => {
                Ok(json::bool_field(self.raw()?, "publish"))
            }
            RecordKind::Collection => {
                let raw = self.raw()?;
                if !json::bool_field(raw, "publish")
                    || json::str_field(raw, "finding_aid_status") != Some("completed")
                {
                    return Ok(false);
                }
                Ok(!self.top_containers()?.is_empty())
            }
            RecordKind::TopContainer => {
                Ok(json::bool_field(self.raw()?, "is_linked_to_published_record"))
            }
        }
    }

    /// Whether this record is hidden from the public index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Unsupported`] for archival objects, whose
    /// shadow state is never consulted independently, and
    /// [`IndexError::Resolution`] when a required reference cannot be
    /// resolved.
    pub fn is_shadowed(&self) -> Result<bool> {
        match self.kind() {
            RecordKind::Accession => {
                Ok(!(self.is_published()? && !self.has_published_collection()?))
            }
            RecordKind::Collection | RecordKind::DigitalObject | RecordKind::TopContainer => {
                Ok(!self.is_published()?)
            }
            RecordKind::ArchivalObject => Err(IndexError::Unsupported(
                "archival objects do not carry an independent shadow state".to_string(),
            )),
        }
    }

    /// Whether any related resource of this accession resolves to a
    /// published collection.
    ///
    /// Only entries whose ref structurally matches the collection pattern
    /// are resolved; related resources of any other shape are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when a related collection cannot
    /// be resolved.
    pub fn has_published_collection(&self) -> Result<bool> {
        let raw = self.raw()?;
        let Some(related) = json::array_field(raw, "related_resources") else {
            return Ok(false);
        };
        for entry in related {
            let Some(ref_id) = json::str_field(entry, "ref") else {
                continue;
            };
            if !RecordKind::Collection.matches_ref(ref_id) {
                continue;
            }
            let collection = ArchivalRecord::new(self.resolver(), RecordKind::Collection, ref_id)?;
            if collection.is_published()? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
