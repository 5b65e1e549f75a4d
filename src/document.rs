//! Index document generation: the ordered field list for one record.
//!
//! [`DocumentBuilder`] maps a resolved, visibility-classified record into a
//! flat, ordered, repeatable field list ([`SolrDocument`]). The header
//! fields are always emitted; the descriptive fields (library, subjects,
//! extents, dates, creators, holdings, digital objects, notes) only when
//! the record is not shadowed; and a trailing group (content description,
//! online URL, export-suppression features) regardless of shadow state.
//!
//! Fatal failures (resolution, rights lookup misses, unknown libraries,
//! malformed thumbnails) abort the document. Non-fatal failures — an
//! unparseable date expression, a manifest that will not fetch, a linked
//! agent that will not resolve — are logged and skip only the item they
//! concern.

use crate::dates;
use crate::error::Result;
use crate::iiif::{self, ManifestFetcher, DEFAULT_THUMBNAIL_URL};
use crate::json;
use crate::library::normalize_library_name;
use crate::natural_sort::natural_cmp;
use crate::record::ArchivalRecord;
use crate::reference::doc_id_for_ref;
use crate::resolver::ReferenceResolver;
use crate::rights::{RightsLookup, RIGHTS_WRAPPER_URL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Source facet attached to every document.
pub const SOURCE_FACET: &str = "ArchivesSpace";
/// Format facet attached to every document.
pub const FORMAT_FACET: &str = "Manuscript/Archive";
/// Format facet added when a document carries manifest-derived content.
pub const ONLINE_FORMAT_FACET: &str = "Online";
/// Base URL for the public online view of a record.
pub const ONLINE_URL_BASE: &str = "https://archives.lib.virginia.edu";

/// Export formats that must never apply to documents from this source.
pub const SUPPRESSED_EXPORTS: [&str; 3] = [
    "suppress_endnote_export",
    "suppress_refworks_export",
    "suppress_ris_export",
];

/// An ordered, repeatable list of (name, value) index fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolrDocument {
    /// The fields in emission order. Names repeat freely.
    pub fields: Vec<(String, String)>,
}

impl SolrDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        SolrDocument::default()
    }

    /// Append a field.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    /// All values emitted under a field name, in order.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value emitted under a field name.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The document id, when the header has been emitted.
    #[must_use]
    pub fn doc_id(&self) -> Option<&str> {
        self.first("id")
    }
}

/// Builds index documents from archival records.
///
/// Holds the external collaborators one generation pass needs: the
/// reference resolver, the rights lookup, and the manifest fetcher. The
/// current year used for age buckets defaults to the system clock and is
/// injectable for tests.
pub struct DocumentBuilder<'a> {
    resolver: &'a dyn ReferenceResolver,
    rights: &'a dyn RightsLookup,
    manifests: &'a dyn ManifestFetcher,
    current_year: i32,
}

impl std::fmt::Debug for DocumentBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("current_year", &self.current_year)
            .finish()
    }
}

impl<'a> DocumentBuilder<'a> {
    /// Create a builder over the given collaborators.
    pub fn new(
        resolver: &'a dyn ReferenceResolver,
        rights: &'a dyn RightsLookup,
        manifests: &'a dyn ManifestFetcher,
    ) -> Self {
        DocumentBuilder {
            resolver,
            rights,
            manifests,
            current_year: dates::current_year(),
        }
    }

    /// Override the year used for published-date age buckets.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// The resolver this builder hands to records it constructs.
    #[must_use]
    pub fn resolver(&self) -> &'a dyn ReferenceResolver {
        self.resolver
    }

    /// Generate the index document for a record.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error hit while resolving the record's
    /// dependencies; the error aborts this record's document only.
    pub fn build(&self, record: &ArchivalRecord<'_>) -> Result<SolrDocument> {
        let mut doc = SolrDocument::new();
        let call_number = record.call_number()?;
        let title = record.title()?.to_string();

        doc.add("id", doc_id_for_ref(record.uri()?)?);
        doc.add("aspace_version_facet", record.lock_version()?.to_string());
        doc.add("call_number_facet", &call_number);
        doc.add("main_title_display", &title);
        doc.add("title_text", &title);
        doc.add("source_facet", SOURCE_FACET);
        doc.add("format_facet", FORMAT_FACET);

        let shadowed = record.is_shadowed()?;
        doc.add(
            "shadowed_location_facet",
            if shadowed { "HIDDEN" } else { "VISIBLE" },
        );

        if !shadowed {
            let library = self.resolve_library(record)?;
            doc.add("library_facet", library);

            self.push_subjects(&mut doc, record)?;
            self.push_extents(&mut doc, record)?;
            self.push_dates(&mut doc, record)?;
            self.push_creators(&mut doc, record)?;
            self.push_holdings(&mut doc, record, library, &call_number)?;
            self.push_digital_objects(&mut doc, record)?;
            self.push_notes(&mut doc, record)?;
        }

        if let Some(description) = json::str_field(record.raw()?, "content_description") {
            doc.add("note_text", description);
            doc.add("note_display", description);
        }

        doc.add(
            "online_url_display",
            format!("{ONLINE_URL_BASE}{}", record.uri()?),
        );

        // Required for proper display in the discovery layer.
        for feature in SUPPRESSED_EXPORTS {
            doc.add("feature_facet", feature);
        }

        Ok(doc)
    }

    fn resolve_library(&self, record: &ArchivalRecord<'_>) -> Result<&'static str> {
        let repo_ref = json::str_at(record.raw()?, &["repository", "ref"]).ok_or_else(|| {
            crate::error::IndexError::Resolution(format!(
                "{} carries no repository reference",
                record.ref_id()
            ))
        })?;
        let repository = self.resolver.resolve(repo_ref)?;
        normalize_library_name(json::expect_str(&repository, "name", repo_ref)?)
    }

    fn push_subjects(&self, doc: &mut SolrDocument, record: &ArchivalRecord<'_>) -> Result<()> {
        let Some(subjects) = json::array_field(record.raw()?, "subjects") else {
            return Ok(());
        };
        for link in subjects {
            let Some(subject_ref) = json::str_field(link, "ref") else {
                continue;
            };
            let subject = self.resolver.resolve(subject_ref)?;
            if json::bool_field(&subject, "publish") {
                let subject_title = json::expect_str(&subject, "title", subject_ref)?;
                doc.add("subject_facet", subject_title);
                doc.add("subject_text", subject_title);
            }
        }
        Ok(())
    }

    fn push_extents(&self, doc: &mut SolrDocument, record: &ArchivalRecord<'_>) -> Result<()> {
        let Some(extents) = json::array_field(record.raw()?, "extents") else {
            return Ok(());
        };
        for extent in extents {
            let number = json::expect_str(extent, "number", record.ref_id())?;
            let extent_type = json::expect_str(extent, "extent_type", record.ref_id())?;
            let mut display = format!("{number} {}", extent_type.replace('_', " "));
            if let Some(summary) = json::str_field(extent, "container_summary") {
                display.push_str(&format!(" ({summary})"));
            }
            doc.add("extent_display", display);
        }
        Ok(())
    }

    fn push_dates(&self, doc: &mut SolrDocument, record: &ArchivalRecord<'_>) -> Result<()> {
        let Some(entries) = json::array_field(record.raw()?, "dates") else {
            return Ok(());
        };
        let mut sort_date_set = false;
        for entry in entries {
            if let Some(expression) = json::str_field(entry, "expression") {
                match dates::parse_year(expression) {
                    Ok(year) => {
                        if !sort_date_set {
                            doc.add("date_multisort_i", year.to_string());
                            sort_date_set = true;
                        }
                        for bucket in dates::age_buckets(self.current_year - year) {
                            doc.add("published_date_facet", bucket);
                        }
                    }
                    Err(err) => {
                        warn!(record = record.ref_id(), %err, "skipping date entry");
                    }
                }
                doc.add("date_display", expression);
            } else if let (Some(begin), Some(end)) = (
                json::str_field(entry, "begin"),
                json::str_field(entry, "end"),
            ) {
                doc.add("date_display", format!("{begin}-{end}"));
            }
        }
        Ok(())
    }

    fn push_creators(&self, doc: &mut SolrDocument, record: &ArchivalRecord<'_>) -> Result<()> {
        let Some(agents) = json::array_field(record.raw()?, "linked_agents") else {
            return Ok(());
        };
        for link in agents {
            let Some(agent_ref) = json::str_field(link, "ref") else {
                continue;
            };
            if json::str_field(link, "role") != Some("creator") {
                continue;
            }
            match self.resolver.resolve(agent_ref) {
                Ok(agent) => {
                    if json::bool_field(&agent, "publish") {
                        if let Some(name) = json::str_field(&agent, "title") {
                            doc.add("author_facet", name);
                            doc.add("author_text", name);
                        }
                    }
                }
                Err(err) => {
                    let err = crate::error::IndexError::AgentResolution(format!("{agent_ref}: {err}"));
                    warn!(record = record.ref_id(), %err, "skipping linked agent");
                }
            }
        }
        Ok(())
    }

    fn push_holdings(
        &self,
        doc: &mut SolrDocument,
        record: &ArchivalRecord<'_>,
        library: &str,
        call_number: &str,
    ) -> Result<()> {
        let mut containers: Vec<(String, &ArchivalRecord<'_>)> = Vec::new();
        for container in record.top_containers()? {
            containers.push((container.container_call_number("")?, container));
        }
        containers.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

        let mut holdings = Vec::new();
        for (_, container) in containers {
            holdings.push(serde_json::json!({
                "library": library,
                "location": container.shelf_location()?,
                "call_number": container.container_call_number(call_number)?,
                "barcode": container.barcode()?,
                "special_collections_location": container.current_location()?,
            }));
        }
        doc.add(
            "special_collections_holding_display",
            Value::Array(holdings).to_string(),
        );
        Ok(())
    }

    /// Cutoff above which a record's digital objects are not expanded into
    /// manifest-derived fields.
    const MANIFEST_CUTOFF: usize = 5;

    fn push_digital_objects(
        &self,
        doc: &mut SolrDocument,
        record: &ArchivalRecord<'_>,
    ) -> Result<()> {
        let objects = record.digital_objects()?;
        let mut manifests_included = 0;
        if objects.len() <= Self::MANIFEST_CUTOFF {
            for object in objects {
                let Some(url) = object.manifest_url()? else {
                    continue;
                };
                match self.manifests.fetch(&url) {
                    Ok(manifest) => {
                        self.push_manifest_fields(doc, &manifest, &url, manifests_included == 0)?;
                        manifests_included += 1;
                    }
                    Err(err) => {
                        warn!(record = record.ref_id(), manifest = %url, %err, "skipping digital object");
                    }
                }
            }
        }
        if manifests_included > 0 {
            doc.add("feature_facet", "iiif");
            doc.add("format_facet", ONLINE_FORMAT_FACET);
        } else {
            doc.add("thumbnail_url_display", DEFAULT_THUMBNAIL_URL);
        }
        Ok(())
    }

    fn push_manifest_fields(
        &self,
        doc: &mut SolrDocument,
        manifest: &Value,
        manifest_url: &str,
        first: bool,
    ) -> Result<()> {
        let manifest_id = json::expect_str(manifest, "@id", manifest_url)?;
        let short_id = iiif::short_manifest_id(manifest_id);
        let rights_uri = json::expect_str(manifest, "license", manifest_url)?;

        let statement = self.rights.lookup(rights_uri)?;
        doc.add("feature_facet", "rights_wrapper");
        doc.add(
            "rights_wrapper_url_display",
            format!("{RIGHTS_WRAPPER_URL}?pid={short_id}&pagePid="),
        );
        doc.add("rs_uri_display", rights_uri);
        doc.add("rights_wrapper_display", statement.statement.as_str());
        for facet in statement.use_facets() {
            doc.add("use_facet", facet);
        }

        doc.add("alternate_id_facet", short_id);
        doc.add(
            "individual_call_number_display",
            json::expect_str(manifest, "label", manifest_url)?,
        );

        if first {
            let thumbnail = iiif::first_canvas_thumbnail(manifest, manifest_url)?;
            doc.add("thumbnail_url_display", iiif::resize_thumbnail(thumbnail)?);
        }

        doc.add("iiif_presentation_metadata_display", manifest.to_string());
        Ok(())
    }

    fn push_notes(&self, doc: &mut SolrDocument, record: &ArchivalRecord<'_>) -> Result<()> {
        let Some(notes) = json::array_field(record.raw()?, "notes") else {
            return Ok(());
        };
        for note in notes {
            if !json::bool_field(note, "publish") {
                continue;
            }
            let Some(subnotes) = json::array_field(note, "subnotes") else {
                continue;
            };
            let mut text = String::new();
            for subnote in subnotes {
                if json::bool_field(subnote, "publish") {
                    if let Some(content) = json::str_field(subnote, "content") {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(content);
                    }
                }
            }
            if !text.is_empty() {
                if json::str_field(note, "type") == Some("scopecontent") {
                    doc.add("note_display", text.as_str());
                }
                doc.add("note_text", text);
            }
        }
        Ok(())
    }
}
