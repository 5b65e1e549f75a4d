//! Reference resolution contract and session memoization.
//!
//! The catalog API is an external collaborator reached through the
//! [`ReferenceResolver`] trait: `resolve` fetches the raw JSON for a
//! reference id, `resolve_tree` fetches the component tree for a tree
//! reference. Transport, authentication, retries, and timeouts all belong
//! to the implementor; the core treats any failure as a fatal
//! [`IndexError::Resolution`](crate::IndexError::Resolution) for the
//! current document.
//!
//! [`MemoResolver`] wraps any resolver with an insertion-ordered cache for
//! the duration of one resolution session, so that repeated lookups of the
//! same reference (a collection resolved from several accessions, a
//! repository resolved for every record) hit the network once.

use crate::error::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;

/// Collaborator that fetches raw JSON by reference id.
pub trait ReferenceResolver {
    /// Resolve a reference id to its raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution) on
    /// any non-success response or transport failure.
    fn resolve(&self, ref_id: &str) -> Result<Value>;

    /// Resolve a tree reference to the component-tree JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution) on
    /// any non-success response or transport failure.
    fn resolve_tree(&self, tree_ref: &str) -> Result<Value>;
}

/// A memoizing decorator around a [`ReferenceResolver`].
///
/// Successful resolutions are cached for the lifetime of the decorator;
/// failures are not cached. A fresh `MemoResolver` per indexing session
/// keeps the cache bounded to one run.
pub struct MemoResolver<R> {
    inner: R,
    records: RefCell<IndexMap<String, Value>>,
    trees: RefCell<IndexMap<String, Value>>,
}

impl<R> std::fmt::Debug for MemoResolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoResolver")
            .field("records", &self.records.borrow().len())
            .field("trees", &self.trees.borrow().len())
            .finish()
    }
}

impl<R: ReferenceResolver> MemoResolver<R> {
    /// Wrap a resolver with a session cache.
    pub fn new(inner: R) -> Self {
        MemoResolver {
            inner,
            records: RefCell::new(IndexMap::new()),
            trees: RefCell::new(IndexMap::new()),
        }
    }

    /// Number of distinct references resolved so far.
    #[must_use]
    pub fn cached_records(&self) -> usize {
        self.records.borrow().len()
    }
}

impl<R: ReferenceResolver> ReferenceResolver for MemoResolver<R> {
    fn resolve(&self, ref_id: &str) -> Result<Value> {
        if let Some(hit) = self.records.borrow().get(ref_id) {
            return Ok(hit.clone());
        }
        let value = self.inner.resolve(ref_id)?;
        self.records
            .borrow_mut()
            .insert(ref_id.to_string(), value.clone());
        Ok(value)
    }

    fn resolve_tree(&self, tree_ref: &str) -> Result<Value> {
        if let Some(hit) = self.trees.borrow().get(tree_ref) {
            return Ok(hit.clone());
        }
        let value = self.inner.resolve_tree(tree_ref)?;
        self.trees
            .borrow_mut()
            .insert(tree_ref.to_string(), value.clone());
        Ok(value)
    }
}
