//! Add-doc XML rendering and the document sink contract.
//!
//! Index documents are persisted in the ingestion service's add-doc XML
//! shape: an `<add>` element wrapping one `<doc>` of repeatable named
//! `<field>` elements. [`FileSink`] writes one file per document under an
//! output directory, named after the document id, and can read a previously
//! written file back just far enough to recover its
//! `aspace_version_facet` — which lets a batch run skip records whose lock
//! version has not moved.

use crate::document::SolrDocument;
use crate::error::{IndexError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Render a document to add-doc XML.
#[must_use]
pub fn to_add_doc_xml(doc: &SolrDocument) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<add>\n  <doc>\n");
    for (name, value) in &doc.fields {
        let _ = writeln!(
            xml,
            "    <field name=\"{}\">{}</field>",
            escape_xml(name),
            escape_xml(value)
        );
    }
    xml.push_str("  </doc>\n</add>\n");
    xml
}

/// The sink file name for a document id: `as:4r123` becomes `as:4r123.xml`.
#[must_use]
pub fn doc_file_name(doc_id: &str) -> String {
    format!("{doc_id}.xml")
}

/// Recover the `aspace_version_facet` of a previously rendered add-doc.
///
/// Returns `None` when the document carries no parseable version field.
///
/// # Errors
///
/// Returns [`IndexError::Xml`] when the payload is not well-formed XML.
pub fn version_from_add_doc(xml: &str) -> Result<Option<i64>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut in_version_field = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"field" => {
                in_version_field = match e.try_get_attribute("name")? {
                    Some(attr) => attr.unescape_value()?.as_ref() == "aspace_version_facet",
                    None => false,
                };
            }
            Event::Text(text) if in_version_field => {
                return Ok(text.unescape()?.parse::<i64>().ok());
            }
            Event::End(_) => in_version_field = false,
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Collaborator that persists generated documents.
pub trait DocumentSink {
    /// The version already persisted for a document id, if any.
    fn current_version(&self, doc_id: &str) -> Option<i64>;

    /// Persist a document.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the document cannot be persisted; the batch
    /// driver treats this as fatal to the current record only.
    fn accept(&mut self, doc: &SolrDocument) -> Result<()>;
}

/// A sink that writes one add-doc XML file per document.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at an output directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSink { dir: dir.into() }
    }

    /// The path a document id is written to.
    #[must_use]
    pub fn path_for(&self, doc_id: &str) -> PathBuf {
        self.dir.join(doc_file_name(doc_id))
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for FileSink {
    fn current_version(&self, doc_id: &str) -> Option<i64> {
        let xml = fs::read_to_string(self.path_for(doc_id)).ok()?;
        version_from_add_doc(&xml).ok().flatten()
    }

    fn accept(&mut self, doc: &SolrDocument) -> Result<()> {
        let doc_id = doc
            .doc_id()
            .ok_or_else(|| IndexError::Validation("document has no id field".to_string()))?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(doc_id), to_add_doc_xml(doc))?;
        Ok(())
    }
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
