//! The polymorphic archival record and its resolve-once field cells.
//!
//! [`ArchivalRecord`] is a tagged variant over the five record kinds rather
//! than an inheritance hierarchy: one struct carrying a [`RecordKind`], with
//! behavior dispatched by pattern match in this module and its companions
//! ([`visibility`](crate::visibility), [`instances`](crate::instances),
//! [`container`](crate::container)).
//!
//! Every remote lookup a record needs — its raw JSON bag, its component
//! tree, its materialized children and instances — is held in a
//! [`OnceCell`] that resolves at most once per record instance and is
//! immutable afterwards. Instances live only for the duration of one
//! document-generation pass; a new instance over the same reference
//! re-resolves.

use crate::error::{IndexError, Result};
use crate::json;
use crate::reference::{kind_for_ref, RecordKind};
use crate::resolver::ReferenceResolver;
use serde_json::Value;
use std::cell::OnceCell;

/// A single archival record bound to a resolver.
///
/// Construction validates the reference id against the kind's pattern;
/// nothing is fetched until a field is first accessed.
pub struct ArchivalRecord<'a> {
    kind: RecordKind,
    ref_id: String,
    resolver: &'a dyn ReferenceResolver,
    raw: OnceCell<Value>,
    tree: OnceCell<Option<Value>>,
    children: OnceCell<Vec<ArchivalRecord<'a>>>,
    pub(crate) containers: OnceCell<Vec<ArchivalRecord<'a>>>,
    pub(crate) digital_objects: OnceCell<Vec<ArchivalRecord<'a>>>,
    pub(crate) current_location: OnceCell<String>,
}

impl std::fmt::Debug for ArchivalRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchivalRecord")
            .field("kind", &self.kind)
            .field("ref_id", &self.ref_id)
            .field("resolved", &self.raw.get().is_some())
            .finish()
    }
}

impl<'a> ArchivalRecord<'a> {
    /// Create a record of a known kind.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Validation`] when the reference id does not
    /// match the kind's pattern.
    pub fn new(
        resolver: &'a dyn ReferenceResolver,
        kind: RecordKind,
        ref_id: impl Into<String>,
    ) -> Result<Self> {
        let ref_id = ref_id.into();
        if !kind.matches_ref(&ref_id) {
            return Err(IndexError::Validation(format!(
                "{ref_id} is not a {} reference",
                kind.label()
            )));
        }
        Ok(ArchivalRecord {
            kind,
            ref_id,
            resolver,
            raw: OnceCell::new(),
            tree: OnceCell::new(),
            children: OnceCell::new(),
            containers: OnceCell::new(),
            digital_objects: OnceCell::new(),
            current_location: OnceCell::new(),
        })
    }

    /// Create a record whose tree position is already known.
    ///
    /// Used for archival objects materialized from a parent's component
    /// tree: the tree node is preset so descending further never refetches
    /// the tree, while the raw record bag still resolves lazily.
    pub(crate) fn with_tree(
        resolver: &'a dyn ReferenceResolver,
        kind: RecordKind,
        ref_id: impl Into<String>,
        tree_node: Value,
    ) -> Result<Self> {
        let record = ArchivalRecord::new(resolver, kind, ref_id)?;
        let _ = record.tree.set(Some(tree_node));
        Ok(record)
    }

    /// Dispatch a reference id to its record kind and construct the record.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Dispatch`] when the kind cannot be inferred
    /// and [`IndexError::Validation`] when the id fails the kind's pattern.
    pub fn parse(resolver: &'a dyn ReferenceResolver, ref_id: &str) -> Result<Self> {
        let kind = kind_for_ref(ref_id)?;
        ArchivalRecord::new(resolver, kind, ref_id)
    }

    /// The record's kind.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The reference id this record was constructed from.
    #[must_use]
    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    /// The resolver this record is bound to.
    #[must_use]
    pub fn resolver(&self) -> &'a dyn ReferenceResolver {
        self.resolver
    }

    /// The raw JSON bag, resolved on first access and memoized.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the reference cannot be
    /// resolved.
    pub fn raw(&self) -> Result<&Value> {
        if let Some(raw) = self.raw.get() {
            return Ok(raw);
        }
        let fetched = self.resolver.resolve(&self.ref_id)?;
        Ok(self.raw.get_or_init(|| fetched))
    }

    /// The component tree, if the record carries a tree reference.
    ///
    /// Resolved on first access and memoized; records without a `tree`
    /// member memoize `None`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the tree reference cannot be
    /// resolved.
    pub fn tree(&self) -> Result<Option<&Value>> {
        if let Some(tree) = self.tree.get() {
            return Ok(tree.as_ref());
        }
        let fetched = match json::str_at(self.raw()?, &["tree", "ref"]) {
            Some(tree_ref) => Some(self.resolver.resolve_tree(tree_ref)?),
            None => None,
        };
        Ok(self.tree.get_or_init(|| fetched).as_ref())
    }

    /// The record's nested components, in tree order.
    ///
    /// Empty for kinds that cannot nest. Children are archival objects
    /// carrying their tree node, so walking an entire component tree costs
    /// one tree resolution at the root.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the tree cannot be resolved.
    pub fn children(&self) -> Result<&[ArchivalRecord<'a>]> {
        if let Some(children) = self.children.get() {
            return Ok(children);
        }
        let mut built = Vec::new();
        if self.kind.can_nest() {
            if let Some(tree) = self.tree()? {
                if let Some(nodes) = json::array_field(tree, "children") {
                    for node in nodes {
                        if let Some(uri) = json::str_field(node, "record_uri") {
                            built.push(ArchivalRecord::with_tree(
                                self.resolver,
                                RecordKind::ArchivalObject,
                                uri,
                                node.clone(),
                            )?);
                        }
                    }
                }
            }
        }
        Ok(self.children.get_or_init(|| built))
    }

    /// The record's display title.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record cannot be
    /// resolved or has no title.
    pub fn title(&self) -> Result<&str> {
        self.require_str("title")
    }

    /// The record's catalog URI.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record cannot be
    /// resolved or has no uri.
    pub fn uri(&self) -> Result<&str> {
        self.require_str("uri")
    }

    /// The record's lock version, a counter that increases on every
    /// upstream edit. Used to skip records unchanged since the last pass.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record cannot be
    /// resolved or has no lock version.
    pub fn lock_version(&self) -> Result<i64> {
        json::expect_int(self.raw()?, "lock_version", &self.ref_id)
    }

    /// The record's call number: the trimmed `id_0` through `id_5` members
    /// joined with `-`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record cannot be
    /// resolved.
    pub fn call_number(&self) -> Result<String> {
        let raw = self.raw()?;
        let mut parts = Vec::new();
        for i in 0..6 {
            if let Some(part) = json::str_field(raw, &format!("id_{i}")) {
                parts.push(part.trim().to_string());
            }
        }
        Ok(parts.join("-"))
    }

    /// A flattened identifier derived from the call number: hyphens become
    /// underscores, slashes and spaces are stripped, the rest uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`] when the record cannot be
    /// resolved.
    pub fn doc_key(&self) -> Result<String> {
        Ok(self
            .call_number()?
            .replace('-', "_")
            .replace(['/', ' '], "")
            .to_uppercase())
    }

    pub(crate) fn require_str(&self, key: &str) -> Result<&str> {
        json::expect_str(self.raw()?, key, &self.ref_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct OneRecordResolver {
        record: Value,
        resolutions: Cell<usize>,
    }

    impl ReferenceResolver for OneRecordResolver {
        fn resolve(&self, _ref_id: &str) -> Result<Value> {
            self.resolutions.set(self.resolutions.get() + 1);
            Ok(self.record.clone())
        }

        fn resolve_tree(&self, tree_ref: &str) -> Result<Value> {
            Err(IndexError::Resolution(tree_ref.to_string()))
        }
    }

    fn resolver_for(record: Value) -> OneRecordResolver {
        OneRecordResolver {
            record,
            resolutions: Cell::new(0),
        }
    }

    #[test]
    fn test_construction_validates_pattern() {
        let resolver = resolver_for(json!({}));
        assert!(
            ArchivalRecord::new(&resolver, RecordKind::Accession, "/repositories/3/accessions/1")
                .is_ok()
        );
        let err = ArchivalRecord::new(
            &resolver,
            RecordKind::Accession,
            "/repositories/3/resources/1",
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::Validation(_)));
    }

    #[test]
    fn test_raw_resolves_once() {
        let resolver = resolver_for(json!({"title": "Papers", "lock_version": 3}));
        let record =
            ArchivalRecord::new(&resolver, RecordKind::Collection, "/repositories/3/resources/1")
                .unwrap();
        assert_eq!(record.title().unwrap(), "Papers");
        assert_eq!(record.lock_version().unwrap(), 3);
        assert_eq!(resolver.resolutions.get(), 1);
    }

    #[test]
    fn test_call_number_joins_trimmed_ids() {
        let resolver = resolver_for(json!({"id_0": "MSS ", "id_1": "1234", "id_3": "b"}));
        let record =
            ArchivalRecord::new(&resolver, RecordKind::Collection, "/repositories/3/resources/1")
                .unwrap();
        assert_eq!(record.call_number().unwrap(), "MSS-1234-b");
    }

    #[test]
    fn test_doc_key_flattens_call_number() {
        let resolver = resolver_for(json!({"id_0": "mss", "id_1": "12/3", "id_2": "a b"}));
        let record =
            ArchivalRecord::new(&resolver, RecordKind::Collection, "/repositories/3/resources/1")
                .unwrap();
        assert_eq!(record.doc_key().unwrap(), "MSS_123_AB");
    }

    #[test]
    fn test_non_nesting_kinds_have_no_children() {
        let resolver = resolver_for(json!({"tree": {"ref": "/never/fetched"}}));
        let record = ArchivalRecord::new(
            &resolver,
            RecordKind::TopContainer,
            "/repositories/3/top_containers/1",
        )
        .unwrap();
        assert!(record.children().unwrap().is_empty());
    }

    #[test]
    fn test_children_from_preset_tree() {
        let resolver = resolver_for(json!({"publish": true}));
        let tree = json!({
            "record_uri": "/repositories/3/archival_objects/1",
            "children": [
                {"record_uri": "/repositories/3/archival_objects/2", "children": []},
                {"record_uri": "/repositories/3/archival_objects/3", "children": []},
            ]
        });
        let record = ArchivalRecord::with_tree(
            &resolver,
            RecordKind::ArchivalObject,
            "/repositories/3/archival_objects/1",
            tree,
        )
        .unwrap();
        let children = record.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].ref_id(), "/repositories/3/archival_objects/2");
        assert_eq!(children[1].kind(), RecordKind::ArchivalObject);
    }
}
