use super::free_text::extract_free_text;
use super::structured::{extract_paragraphs, extract_structured_text};
use super::types::ExtractionReport;
use crate::config::ExtractorConfig;
use crate::models::ExtractionMode;

/// Single entry point over both extraction modes.
///
/// The caller picks the mode from the input shape: document paragraphs are
/// structured, typed notes are free text.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    config: ExtractorConfig,
}

impl FieldExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Structured mode over paragraphs from the document reader.
    pub fn extract_paragraphs<S: AsRef<str>>(&self, paragraphs: &[S]) -> ExtractionReport {
        let report = extract_paragraphs(paragraphs);
        log_report(&report);
        report
    }

    /// Extract from a text blob in the requested mode. In structured mode
    /// every line is a paragraph.
    pub fn extract_text(&self, text: &str, mode: ExtractionMode) -> ExtractionReport {
        let report = match mode {
            ExtractionMode::FreeText => extract_free_text(text, &self.config),
            ExtractionMode::StructuredParagraphs => extract_structured_text(text),
        };
        log_report(&report);
        report
    }
}

fn log_report(report: &ExtractionReport) {
    tracing::info!(
        mode = report.mode.as_str(),
        records = report.records.len(),
        warnings = report.warnings.len(),
        empty = report.notice.is_some(),
        "Field extraction finished"
    );
}
