//! Free-text mode: blank-line separated entries of clinical prose.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::scan_fragment;
use super::types::{EntryParseWarning, ExtractionReport};
use super::EntryError;
use crate::config::ExtractorConfig;
use crate::models::{ExtractionMode, PatientRecord};
use crate::pipeline::extraction::sanitize::{first_control_char, normalize_line_endings};

/// Two line breaks with only horizontal whitespace between them.
static ENTRY_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

const FRAGMENT_DELIMITER: &str = ". ";

/// Split a note into non-empty, trimmed entries.
pub fn split_entries(text: &str) -> Vec<String> {
    let normalized = normalize_line_endings(text);
    ENTRY_BOUNDARY
        .split(&normalized)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one entry into at most one record.
///
/// `Ok(None)` means the entry mentioned no recognized field.
pub fn extract_entry(
    entry: &str,
    entry_index: usize,
    config: &ExtractorConfig,
) -> Result<Option<PatientRecord>, EntryError> {
    let chars = entry.chars().count();
    if chars > config.max_entry_chars {
        return Err(EntryError::TooLong {
            chars,
            max: config.max_entry_chars,
        });
    }

    if let Some((offset, c)) = first_control_char(entry) {
        return Err(EntryError::BinaryContent {
            offset,
            code: c as u32,
        });
    }

    let mut record = PatientRecord::with_label(format!("Entry {entry_index}"));
    let touched: usize = entry
        .split(FRAGMENT_DELIMITER)
        .map(|fragment| scan_fragment(fragment, &mut record))
        .sum();
    tracing::debug!(entry = entry_index, triggers = touched, "Entry scanned");

    Ok((!record.is_empty()).then_some(record))
}

/// Run free-text extraction over a whole note.
pub fn extract_free_text(text: &str, config: &ExtractorConfig) -> ExtractionReport {
    let entries = split_entries(text);
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let entry_index = i + 1;
        match extract_entry(entry, entry_index, config) {
            Ok(Some(record)) => {
                tracing::debug!(entry = entry_index, fields = record.len(), "Entry extracted");
                records.push(record);
            }
            Ok(None) => {
                tracing::debug!(entry = entry_index, "Entry has no recognized fields");
            }
            Err(e) => {
                let warning = EntryParseWarning::new(entry_index, entry, &e);
                tracing::warn!(
                    entry = entry_index,
                    preview = %warning.preview(),
                    error = %e,
                    "Skipping unparseable entry"
                );
                warnings.push(warning);
            }
        }
    }

    ExtractionReport::finish(ExtractionMode::FreeText, records, warnings, entries.len())
}
