//! Common test fixtures shared across the integration suite.
//!
//! Provides in-memory stand-ins for the three external collaborators: the
//! catalog resolver, the rights store, and the IIIF manifest service.

// Each test binary uses its own subset of these fixtures.
#![allow(dead_code)]

use asdex::error::{IndexError, Result};
use asdex::{ManifestFetcher, ReferenceResolver, RightsLookup, RightsStatement};
use serde_json::{json, Value};
use std::collections::HashMap;

/// In-memory reference resolver backed by two maps.
#[derive(Debug, Default)]
pub struct FixtureResolver {
    records: HashMap<String, Value>,
    trees: HashMap<String, Value>,
}

impl FixtureResolver {
    pub fn new() -> Self {
        FixtureResolver::default()
    }

    pub fn insert(&mut self, ref_id: &str, record: Value) -> &mut Self {
        self.records.insert(ref_id.to_string(), record);
        self
    }

    pub fn insert_tree(&mut self, tree_ref: &str, tree: Value) -> &mut Self {
        self.trees.insert(tree_ref.to_string(), tree);
        self
    }
}

impl ReferenceResolver for FixtureResolver {
    fn resolve(&self, ref_id: &str) -> Result<Value> {
        self.records
            .get(ref_id)
            .cloned()
            .ok_or_else(|| IndexError::Resolution(format!("no fixture for {ref_id}")))
    }

    fn resolve_tree(&self, tree_ref: &str) -> Result<Value> {
        self.trees
            .get(tree_ref)
            .cloned()
            .ok_or_else(|| IndexError::Resolution(format!("no tree fixture for {tree_ref}")))
    }
}

/// In-memory rights store.
#[derive(Debug, Default)]
pub struct FixtureRights {
    statements: HashMap<String, RightsStatement>,
}

impl FixtureRights {
    pub fn new() -> Self {
        FixtureRights::default()
    }

    pub fn insert(&mut self, uri: &str, statement: RightsStatement) -> &mut Self {
        self.statements.insert(uri.to_string(), statement);
        self
    }
}

impl RightsLookup for FixtureRights {
    fn lookup(&self, rights_uri: &str) -> Result<RightsStatement> {
        self.statements
            .get(rights_uri)
            .cloned()
            .ok_or_else(|| IndexError::RightsNotFound(rights_uri.to_string()))
    }
}

/// In-memory manifest service; unknown URLs fail like a dead endpoint.
#[derive(Debug, Default)]
pub struct FixtureManifests {
    manifests: HashMap<String, Value>,
}

impl FixtureManifests {
    pub fn new() -> Self {
        FixtureManifests::default()
    }

    pub fn insert(&mut self, url: &str, manifest: Value) -> &mut Self {
        self.manifests.insert(url.to_string(), manifest);
        self
    }
}

impl ManifestFetcher for FixtureManifests {
    fn fetch(&self, manifest_url: &str) -> Result<Value> {
        self.manifests
            .get(manifest_url)
            .cloned()
            .ok_or_else(|| IndexError::TransientFetch(format!("no manifest at {manifest_url}")))
    }
}

/// A repository record carrying a display name.
pub fn repository(name: &str) -> Value {
    json!({ "name": name })
}

/// A minimal published top-container record.
pub fn top_container(uri: &str, display_string: &str) -> Value {
    json!({
        "uri": uri,
        "display_string": display_string,
        "is_linked_to_published_record": true,
        "container_locations": [],
    })
}

/// An instance entry linking to a top container.
pub fn container_instance(container_ref: &str) -> Value {
    json!({
        "instance_type": "mixed_materials",
        "sub_container": { "top_container": { "ref": container_ref } },
    })
}

/// An instance entry linking to a digital object.
pub fn digital_instance(object_ref: &str) -> Value {
    json!({
        "instance_type": "digital_object",
        "digital_object": { "ref": object_ref },
    })
}
