//! Note processing orchestrator.
//!
//! Single entry point that drives the full pipeline for one submission:
//! read (documents only) -> extract fields -> classify -> outcome.
//!
//! Every call owns its intermediate state. Nothing is shared between runs,
//! so one processor can serve any number of submissions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::ExtractorConfig;
use crate::export::Table;
use crate::intelligence::classify_all;
use crate::models::{ClassifiedRecord, ExtractionMode, InputKind};
use crate::pipeline::extraction::{DocumentFormatError, DocumentReader, DocxReader};
use crate::pipeline::structuring::{
    EmptyResultNotice, EntryParseWarning, ExtractionReport, FieldExtractor,
};

/// Everything one run produced, ready for tabular export.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub run_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub input: InputKind,
    pub mode: ExtractionMode,
    pub records: Vec<ClassifiedRecord>,
    pub warnings: Vec<EntryParseWarning>,
    pub notice: Option<EmptyResultNotice>,
}

impl ProcessingOutcome {
    fn from_report(run_id: Uuid, input: InputKind, report: ExtractionReport) -> Self {
        Self {
            run_id,
            processed_at: Utc::now(),
            input,
            mode: report.mode,
            records: classify_all(report.records),
            warnings: report.warnings,
            notice: report.notice,
        }
    }

    pub fn table(&self) -> Table {
        Table::from_classified(&self.records)
    }
}

/// Orchestrates read -> extract -> classify.
///
/// The document reader is injected so tests and other front ends can swap it.
pub struct NoteProcessor {
    reader: Box<dyn DocumentReader + Send + Sync>,
    extractor: FieldExtractor,
}

impl NoteProcessor {
    /// Processor with the .docx reader, limits taken from `config`.
    pub fn new(config: ExtractorConfig) -> Self {
        let reader = DocxReader::with_max_bytes(config.max_document_bytes);
        Self::with_reader(Box::new(reader), config)
    }

    pub fn with_reader(reader: Box<dyn DocumentReader + Send + Sync>, config: ExtractorConfig) -> Self {
        Self {
            reader,
            extractor: FieldExtractor::new(config),
        }
    }

    /// Process a typed note. Never fails: bad entries become warnings.
    pub fn process_note(&self, text: &str, mode: ExtractionMode) -> ProcessingOutcome {
        let run_id = Uuid::new_v4();
        tracing::info!(run_id = %run_id, mode = mode.as_str(), bytes = text.len(), "Processing note");

        let report = self.extractor.extract_text(text, mode);
        let outcome = ProcessingOutcome::from_report(run_id, InputKind::TypedNote, report);
        log_outcome(&outcome);
        outcome
    }

    /// Process an uploaded document in structured-paragraph mode.
    ///
    /// Malformed bytes fail the whole upload; no partial outcome is produced.
    pub fn process_document(&self, bytes: &[u8]) -> Result<ProcessingOutcome, DocumentFormatError> {
        let run_id = Uuid::new_v4();
        tracing::info!(run_id = %run_id, bytes = bytes.len(), "Processing document");

        let paragraphs = self.reader.read_paragraphs(bytes).map_err(|e| {
            tracing::warn!(run_id = %run_id, error = %e, "Document could not be read");
            e
        })?;

        let report = self.extractor.extract_paragraphs(&paragraphs);
        let outcome = ProcessingOutcome::from_report(run_id, InputKind::WordDocument, report);
        log_outcome(&outcome);
        Ok(outcome)
    }
}

impl Default for NoteProcessor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

fn log_outcome(outcome: &ProcessingOutcome) {
    if let Some(notice) = &outcome.notice {
        tracing::info!(run_id = %outcome.run_id, notice = %notice, "Empty result");
    }
    tracing::info!(
        run_id = %outcome.run_id,
        records = outcome.records.len(),
        warnings = outcome.warnings.len(),
        "Processing complete"
    );
}
