#![warn(missing_docs)]

//! # asdex: archival description indexing
//!
//! A library for converting hierarchical archival-description records —
//! accessions, collections, nested components, digital objects, and
//! physical containers — into search-index documents and abstract MARC
//! circulation records.
//!
//! The catalog API, rights store, and IIIF image service are external
//! collaborators injected as traits ([`ReferenceResolver`],
//! [`RightsLookup`], [`ManifestFetcher`]); everything else — the record
//! model, the visibility rules, the recursive instance walk, and the field
//! mapping — lives here.
//!
//! ## Quick start
//!
//! ```ignore
//! use asdex::{ArchivalRecord, DocumentBuilder, FileSink, MemoResolver};
//!
//! # fn run(client: impl asdex::ReferenceResolver,
//! #        rights: impl asdex::RightsLookup,
//! #        iiif: impl asdex::ManifestFetcher) -> asdex::Result<()> {
//! let resolver = MemoResolver::new(client);
//! let builder = DocumentBuilder::new(&resolver, &rights, &iiif);
//!
//! let record = ArchivalRecord::parse(&resolver, "/repositories/3/resources/42")?;
//! let doc = builder.build(&record)?;
//!
//! let mut sink = FileSink::new("solr-docs");
//! asdex::index_records(&builder, &["/repositories/3/resources/42".to_string()], &mut sink);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`] — The polymorphic archival record and its resolve-once cells
//! - [`reference`] — Reference-id patterns, kind dispatch, document ids
//! - [`resolver`] — Catalog resolution contract and session memoization
//! - [`visibility`] — Published/shadowed rules per record kind
//! - [`instances`] — Recursive container/digital-object collection
//! - [`container`] — Container call numbers, barcodes, locations
//! - [`natural_sort`] — Digit-run-aware ordering for call numbers
//! - [`dates`] — Date-expression parsing and age buckets
//! - [`library`] — Repository-name normalization
//! - [`rights`] — Rights-statement lookup contract
//! - [`iiif`] — Manifest fetching contract and manifest-derived values
//! - [`document`] — The ordered index field list for one record
//! - [`solr`] — Add-doc XML rendering and the document sink
//! - [`marc`] — Abstract MARC circulation records
//! - [`batch`] — Multi-record driver with per-record failure isolation
//! - [`error`] — Error types and result alias
//!
//! ## Failure model
//!
//! Fatal errors (failed resolution, rights lookup miss, unknown library,
//! malformed thumbnail) abort document generation for the current record
//! only and carry the record's identifier. Non-fatal errors (manifest
//! fetch failure, unparseable date expression, agent resolution failure)
//! are logged and skip exactly the item they concern.

pub mod batch;
pub mod container;
pub mod dates;
pub mod document;
pub mod error;
pub mod iiif;
pub mod instances;
pub mod json;
pub mod library;
pub mod marc;
pub mod natural_sort;
pub mod record;
pub mod reference;
pub mod resolver;
pub mod rights;
pub mod solr;
pub mod visibility;

pub use batch::{index_records, BatchReport, Outcome};
pub use document::{DocumentBuilder, SolrDocument};
pub use error::{IndexError, Result};
pub use iiif::ManifestFetcher;
pub use marc::{build_circulation_record, CirculationRecord, MarcField, MarcSerializer, MarcSubfield};
pub use natural_sort::{natural_cmp, natural_sort};
pub use record::ArchivalRecord;
pub use reference::{doc_id_for_ref, kind_for_ref, RecordKind};
pub use resolver::{MemoResolver, ReferenceResolver};
pub use rights::{RightsLookup, RightsStatement};
pub use solr::{to_add_doc_xml, DocumentSink, FileSink};
