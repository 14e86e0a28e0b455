//! Structured-paragraph mode: `Patient N` sections of `Key: Value` paragraphs.
//!
//! Keys are stored verbatim. A key that only differs from a canonical field
//! name by case or spacing is logged, not remapped: it will not be classified.

use super::types::ExtractionReport;
use crate::models::{canonical_lookalike, ExtractionMode, FieldValue, PatientRecord};

/// Paragraph prefix that opens a new patient section.
pub const SECTION_MARKER: &str = "Patient ";

const KEY_VALUE_DELIMITER: &str = ": ";

/// Run structured extraction over document paragraphs, in order.
pub fn extract_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> ExtractionReport {
    let mut records = Vec::new();
    let mut current = PatientRecord::new();
    let mut scanned = 0usize;

    for (i, paragraph) in paragraphs.iter().enumerate() {
        let paragraph = paragraph.as_ref().trim();
        if paragraph.is_empty() {
            continue;
        }
        scanned += 1;

        if paragraph.starts_with(SECTION_MARKER) {
            flush(&mut records, std::mem::replace(&mut current, PatientRecord::with_label(paragraph)));
            continue;
        }

        let Some((key, value)) = paragraph.split_once(KEY_VALUE_DELIMITER) else {
            tracing::debug!(paragraph = i + 1, "Paragraph has no key/value delimiter, skipped");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            tracing::debug!(paragraph = i + 1, "Paragraph has an empty key, skipped");
            continue;
        }

        if let Some(canonical) = canonical_lookalike(key) {
            tracing::warn!(
                paragraph = i + 1,
                key,
                canonical,
                "Field key resembles a recognized field but is stored verbatim and will not be classified"
            );
        }

        let value = value.trim();
        let value = (!value.is_empty()).then(|| FieldValue::Text(value.to_string()));
        current.set(key, value);
    }

    flush(&mut records, current);

    tracing::debug!(paragraphs = scanned, records = records.len(), "Structured extraction complete");

    ExtractionReport::finish(ExtractionMode::StructuredParagraphs, records, Vec::new(), scanned)
}

/// Treat each line of a text blob as a paragraph.
pub fn extract_structured_text(text: &str) -> ExtractionReport {
    let lines: Vec<&str> = text.lines().collect();
    extract_paragraphs(&lines)
}

fn flush(records: &mut Vec<PatientRecord>, record: PatientRecord) {
    if !record.is_empty() {
        records.push(record);
    }
}
