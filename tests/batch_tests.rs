//! Batch runs: failure isolation, version skipping, and sink output.

mod common;

use asdex::solr::version_from_add_doc;
use asdex::{index_records, DocumentBuilder, FileSink, Outcome};
use common::{FixtureManifests, FixtureResolver, FixtureRights};
use serde_json::json;
use std::fs;

/// Two shadowed records that build without further lookups, so batch
/// behavior can be observed in isolation.
fn batch_fixture() -> FixtureResolver {
    let mut resolver = FixtureResolver::new();
    resolver.insert(
        "/repositories/3/resources/1",
        json!({
            "uri": "/repositories/3/resources/1",
            "lock_version": 7,
            "title": "Papers of Ada Example",
            "id_0": "MSS", "id_1": "1234",
            "publish": false,
        }),
    );
    resolver.insert(
        "/repositories/3/accessions/7",
        json!({
            "uri": "/repositories/3/accessions/7",
            "lock_version": 2,
            "title": "Unprocessed gift",
            "id_0": "2024", "id_1": "019",
            "publish": false,
        }),
    );
    resolver
}

#[test]
fn failures_do_not_stop_the_run() {
    let resolver = batch_fixture();
    let rights = FixtureRights::new();
    let manifests = FixtureManifests::new();
    let builder = DocumentBuilder::new(&resolver, &rights, &manifests);

    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());
    let refs = vec![
        "/repositories/3/resources/1".to_string(),
        "/repositories/3/subjects/9".to_string(),
        "/repositories/3/accessions/7".to_string(),
    ];
    let report = index_records(&builder, &refs, &mut sink);

    assert_eq!(report.indexed(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.unchanged(), 0);
    assert_eq!(
        report.outcomes[0].1,
        Outcome::Indexed {
            doc_id: "as:3r1".to_string()
        }
    );
    assert!(matches!(report.outcomes[1].1, Outcome::Failed { .. }));
    assert!(sink.path_for("as:3r1").is_file());
    assert!(sink.path_for("as:3a7").is_file());
}

#[test]
fn unresolvable_record_is_reported_not_raised() {
    let resolver = FixtureResolver::new();
    let rights = FixtureRights::new();
    let manifests = FixtureManifests::new();
    let builder = DocumentBuilder::new(&resolver, &rights, &manifests);

    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());
    let refs = vec!["/repositories/3/resources/404".to_string()];
    let report = index_records(&builder, &refs, &mut sink);

    assert_eq!(report.failed(), 1);
    assert!(matches!(report.outcomes[0].1, Outcome::Failed { .. }));
}

#[test]
fn unchanged_records_are_skipped_on_the_second_run() {
    let resolver = batch_fixture();
    let rights = FixtureRights::new();
    let manifests = FixtureManifests::new();
    let builder = DocumentBuilder::new(&resolver, &rights, &manifests);

    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());
    let refs = vec![
        "/repositories/3/resources/1".to_string(),
        "/repositories/3/accessions/7".to_string(),
    ];

    let first = index_records(&builder, &refs, &mut sink);
    assert_eq!(first.indexed(), 2);

    let second = index_records(&builder, &refs, &mut sink);
    assert_eq!(second.indexed(), 0);
    assert_eq!(second.unchanged(), 2);
}

#[test]
fn edited_record_is_rebuilt() {
    let mut resolver = batch_fixture();
    let rights = FixtureRights::new();
    let manifests = FixtureManifests::new();

    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());
    let refs = vec!["/repositories/3/accessions/7".to_string()];

    {
        let builder = DocumentBuilder::new(&resolver, &rights, &manifests);
        index_records(&builder, &refs, &mut sink);
    }

    resolver.insert(
        "/repositories/3/accessions/7",
        json!({
            "uri": "/repositories/3/accessions/7",
            "lock_version": 3,
            "title": "Unprocessed gift (renamed)",
            "id_0": "2024", "id_1": "019",
            "publish": false,
        }),
    );
    let builder = DocumentBuilder::new(&resolver, &rights, &manifests);
    let report = index_records(&builder, &refs, &mut sink);
    assert_eq!(report.indexed(), 1);

    let xml = fs::read_to_string(sink.path_for("as:3a7")).unwrap();
    assert_eq!(version_from_add_doc(&xml).unwrap(), Some(3));
    assert!(xml.contains("Unprocessed gift (renamed)"));
}
