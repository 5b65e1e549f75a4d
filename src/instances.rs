//! Recursive collection of container and digital-object references.
//!
//! Records link to physical top containers and to digital objects through
//! their `instances` array. Gathering the full set for an accession or
//! collection means walking its component tree: every node contributes its
//! own instances, and recursion descends only into published children — an
//! unpublished component hides its entire subtree, even when deeper
//! descendants are individually published.

use crate::error::Result;
use crate::json;
use crate::record::ArchivalRecord;
use crate::reference::RecordKind;
use std::collections::HashSet;
use tracing::warn;

impl<'a> ArchivalRecord<'a> {
    /// Collect the deduplicated container and digital-object reference sets
    /// for this record and its published descendants.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the record, its tree, or a child record cannot be resolved.
    pub fn instance_refs(&self) -> Result<(HashSet<String>, HashSet<String>)> {
        let mut container_refs = HashSet::new();
        let mut digital_refs = HashSet::new();
        self.collect_instance_refs(&mut container_refs, &mut digital_refs)?;
        Ok((container_refs, digital_refs))
    }

    /// Add this node's instance refs to the passed sets and recurse to the
    /// published children.
    pub(crate) fn collect_instance_refs(
        &self,
        container_refs: &mut HashSet<String>,
        digital_refs: &mut HashSet<String>,
    ) -> Result<()> {
        if let Some(entries) = json::array_field(self.raw()?, "instances") {
            for entry in entries {
                if json::str_field(entry, "instance_type") == Some("digital_object") {
                    match json::str_at(entry, &["digital_object", "ref"]) {
                        Some(r) => {
                            digital_refs.insert(r.to_string());
                        }
                        None => warn!(record = self.ref_id(), "digital instance without a ref"),
                    }
                } else {
                    match json::str_at(entry, &["sub_container", "top_container", "ref"]) {
                        Some(r) => {
                            container_refs.insert(r.to_string());
                        }
                        None => warn!(record = self.ref_id(), "container instance without a ref"),
                    }
                }
            }
        }

        for child in self.children()? {
            if child.is_published()? {
                child.collect_instance_refs(container_refs, digital_refs)?;
            }
        }
        Ok(())
    }

    /// The top containers reachable from this record's published tree,
    /// materialized once per instance.
    ///
    /// Materialization order is the sorted reference order; display
    /// ordering by call number is the document builder's concern.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the tree walk fails, or
    /// [`IndexError::Validation`](crate::IndexError::Validation) when a
    /// collected ref is not a top-container reference.
    pub fn top_containers(&self) -> Result<&[ArchivalRecord<'a>]> {
        if let Some(containers) = self.containers.get() {
            return Ok(containers);
        }
        let (built, objects) = self.materialize_instances()?;
        let _ = self.digital_objects.set(objects);
        Ok(self.containers.get_or_init(|| built))
    }

    /// The digital objects reachable from this record's published tree,
    /// materialized once per instance.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the tree walk fails, or
    /// [`IndexError::Validation`](crate::IndexError::Validation) when a
    /// collected ref is not a digital-object reference.
    pub fn digital_objects(&self) -> Result<&[ArchivalRecord<'a>]> {
        if let Some(objects) = self.digital_objects.get() {
            return Ok(objects);
        }
        let (containers, built) = self.materialize_instances()?;
        let _ = self.containers.set(containers);
        Ok(self.digital_objects.get_or_init(|| built))
    }

    fn materialize_instances(
        &self,
    ) -> Result<(Vec<ArchivalRecord<'a>>, Vec<ArchivalRecord<'a>>)> {
        let (container_refs, digital_refs) = self.instance_refs()?;

        let mut container_refs: Vec<String> = container_refs.into_iter().collect();
        container_refs.sort();
        let containers = container_refs
            .into_iter()
            .map(|r| ArchivalRecord::new(self.resolver(), RecordKind::TopContainer, r))
            .collect::<Result<Vec<_>>>()?;

        let mut digital_refs: Vec<String> = digital_refs.into_iter().collect();
        digital_refs.sort();
        let objects = digital_refs
            .into_iter()
            .map(|r| ArchivalRecord::new(self.resolver(), RecordKind::DigitalObject, r))
            .collect::<Result<Vec<_>>>()?;

        Ok((containers, objects))
    }
}
