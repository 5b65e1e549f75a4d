//! Batch driver: index many records, isolating failures per record.
//!
//! A fatal error while generating one record's document is logged with the
//! record's reference id and recorded in the report; the run always
//! continues to the next record. Records whose lock version matches what
//! the sink already holds are skipped without rebuilding.

use crate::document::DocumentBuilder;
use crate::error::Result;
use crate::record::ArchivalRecord;
use crate::reference::doc_id_for_ref;
use crate::solr::DocumentSink;
use tracing::{error, info};

/// The outcome of indexing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A document was generated and accepted by the sink.
    Indexed {
        /// The document id written.
        doc_id: String,
    },
    /// The sink already holds this lock version; nothing was rebuilt.
    Unchanged,
    /// A fatal error aborted this record's document.
    Failed {
        /// The error, rendered for the report.
        error: String,
    },
}

/// Per-record outcomes of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// (reference id, outcome) in input order.
    pub outcomes: Vec<(String, Outcome)>,
}

impl BatchReport {
    /// Number of records indexed.
    #[must_use]
    pub fn indexed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Indexed { .. }))
            .count()
    }

    /// Number of records skipped as unchanged.
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Unchanged))
            .count()
    }

    /// Number of records that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Failed { .. }))
            .count()
    }
}

/// Index a batch of records into a sink.
///
/// Each reference id is dispatched to its record kind, skipped when the
/// sink already holds its current lock version, and otherwise built and
/// handed to the sink. Failures never propagate past the record they
/// belong to.
pub fn index_records<S: DocumentSink>(
    builder: &DocumentBuilder<'_>,
    ref_ids: &[String],
    sink: &mut S,
) -> BatchReport {
    let mut report = BatchReport::default();
    for ref_id in ref_ids {
        let outcome = match index_one(builder, ref_id, sink) {
            Ok(Some(doc_id)) => {
                info!(record = ref_id.as_str(), doc_id = doc_id.as_str(), "indexed");
                Outcome::Indexed { doc_id }
            }
            Ok(None) => {
                info!(record = ref_id.as_str(), "unchanged since last index");
                Outcome::Unchanged
            }
            Err(err) => {
                error!(record = ref_id.as_str(), %err, "skipped due to error");
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
        };
        report.outcomes.push((ref_id.clone(), outcome));
    }
    info!(
        indexed = report.indexed(),
        unchanged = report.unchanged(),
        failed = report.failed(),
        "batch complete"
    );
    report
}

fn index_one<S: DocumentSink>(
    builder: &DocumentBuilder<'_>,
    ref_id: &str,
    sink: &mut S,
) -> Result<Option<String>> {
    let record = ArchivalRecord::parse(builder.resolver(), ref_id)?;
    let doc_id = doc_id_for_ref(ref_id)?;
    if let Some(existing) = sink.current_version(&doc_id) {
        if existing == record.lock_version()? {
            return Ok(None);
        }
    }
    let doc = builder.build(&record)?;
    sink.accept(&doc)?;
    Ok(Some(doc_id))
}
