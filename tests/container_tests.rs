//! Container identity: call numbers, barcodes, and locations.

mod common;

use asdex::{ArchivalRecord, RecordKind};
use common::FixtureResolver;
use serde_json::json;

fn container<'a>(resolver: &'a FixtureResolver, ref_id: &str) -> ArchivalRecord<'a> {
    ArchivalRecord::new(resolver, RecordKind::TopContainer, ref_id).unwrap()
}

#[test]
fn call_number_joins_owner_and_display_string() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({"display_string": "Box 10"}),
    );
    let container = container(&resolver, "/repositories/3/top_containers/1");
    assert_eq!(
        container.container_call_number("MSS-1234").unwrap(),
        "MSS-1234 Box 10"
    );
    assert_eq!(container.container_call_number("").unwrap(), " Box 10");
}

#[test]
fn explicit_barcode_wins() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({
            "display_string": "Box 1",
            "barcode": "X003322914",
            "uri": "/repositories/3/top_containers/1",
        }),
    );
    let container = container(&resolver, "/repositories/3/top_containers/1");
    assert_eq!(container.barcode().unwrap(), "X003322914");
}

#[test]
fn missing_barcode_falls_back_to_uri_derived_id() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/7/top_containers/42",
        json!({
            "display_string": "Box 1",
            "uri": "/repositories/7/top_containers/42",
        }),
    );
    let container = container(&resolver, "/repositories/7/top_containers/42");
    assert_eq!(container.barcode().unwrap(), "AS:7C42");
}

#[test]
fn unparseable_uri_yields_unknown_barcode() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({"display_string": "Box 1", "uri": "/containers/legacy/1"}),
    );
    resolver.insert(
        "/repositories/3/top_containers/2",
        json!({"display_string": "Box 2"}),
    );
    assert_eq!(
        container(&resolver, "/repositories/3/top_containers/1")
            .barcode()
            .unwrap(),
        "UNKNOWN"
    );
    assert_eq!(
        container(&resolver, "/repositories/3/top_containers/2")
            .barcode()
            .unwrap(),
        "UNKNOWN"
    );
}

#[test]
fn current_location_resolves_the_current_entry_only() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({
            "display_string": "Box 1",
            "container_locations": [
                {"status": "previous", "ref": "/locations/2"},
                {"status": "current", "ref": "/locations/9"},
            ],
        }),
    );
    resolver.insert("/locations/9", json!({"title": "SC Vault"}));
    let container = container(&resolver, "/repositories/3/top_containers/1");
    assert_eq!(container.current_location().unwrap(), "SC Vault");
}

#[test]
fn missing_current_location_is_empty() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({
            "display_string": "Box 1",
            "container_locations": [{"status": "previous", "ref": "/locations/2"}],
        }),
    );
    let container = container(&resolver, "/repositories/3/top_containers/1");
    assert_eq!(container.current_location().unwrap(), "");
}

#[test]
fn shelf_location_prefers_room() {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/top_containers/1",
        json!({"display_string": "Box 1", "room": "Vault 2"}),
    );
    resolver.insert(
        "/repositories/3/top_containers/2",
        json!({"display_string": "Box 2"}),
    );
    resolver.insert(
        "/repositories/3/top_containers/3",
        json!({"display_string": "Box 3", "room": null}),
    );
    assert_eq!(
        container(&resolver, "/repositories/3/top_containers/1")
            .shelf_location()
            .unwrap(),
        "Vault 2"
    );
    assert_eq!(
        container(&resolver, "/repositories/3/top_containers/2")
            .shelf_location()
            .unwrap(),
        "STACKS"
    );
    assert_eq!(
        container(&resolver, "/repositories/3/top_containers/3")
            .shelf_location()
            .unwrap(),
        "STACKS"
    );
}
