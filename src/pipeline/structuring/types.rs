use std::fmt;

use serde::Serialize;

use super::EntryError;
use crate::models::{ExtractionMode, PatientRecord};

/// Characters of entry text shown in log lines and console output.
const PREVIEW_CHARS: usize = 60;

/// One free-text entry was dropped; the rest of the batch continued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryParseWarning {
    /// 1-based position among the non-empty entries of the input.
    pub entry_index: usize,
    pub entry_text: String,
    pub reason: String,
}

impl EntryParseWarning {
    pub fn new(entry_index: usize, entry_text: &str, error: &EntryError) -> Self {
        Self {
            entry_index,
            entry_text: entry_text.to_string(),
            reason: error.to_string(),
        }
    }

    /// Shortened single-line view of the entry text.
    pub fn preview(&self) -> String {
        let flat: String = self
            .entry_text
            .chars()
            .map(|c| if c.is_whitespace() || c.is_control() { ' ' } else { c })
            .collect();
        if flat.chars().count() > PREVIEW_CHARS {
            let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", cut.trim_end())
        } else {
            flat
        }
    }
}

impl fmt::Display for EntryParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipped entry {} (\"{}\"): {}",
            self.entry_index,
            self.preview(),
            self.reason
        )
    }
}

/// Non-empty input produced zero records. Informational, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyResultNotice {
    pub mode: ExtractionMode,
    /// Entries (free text) or paragraphs (structured) that were scanned.
    pub units_scanned: usize,
}

impl fmt::Display for EmptyResultNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.mode {
            ExtractionMode::FreeText => "entries",
            ExtractionMode::StructuredParagraphs => "paragraphs",
        };
        write!(
            f,
            "No patient records could be extracted from {} {unit}",
            self.units_scanned
        )
    }
}

/// Batch outcome of one extraction run: records plus what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub mode: ExtractionMode,
    pub records: Vec<PatientRecord>,
    pub warnings: Vec<EntryParseWarning>,
    pub notice: Option<EmptyResultNotice>,
}

impl ExtractionReport {
    /// Assemble a report, raising the empty-result notice when `units_scanned`
    /// non-empty units produced nothing.
    pub fn finish(
        mode: ExtractionMode,
        records: Vec<PatientRecord>,
        warnings: Vec<EntryParseWarning>,
        units_scanned: usize,
    ) -> Self {
        let notice = (records.is_empty() && units_scanned > 0).then_some(EmptyResultNotice {
            mode,
            units_scanned,
        });
        Self {
            mode,
            records,
            warnings,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_flattens_and_truncates() {
        let long = format!("line one\nline two {}", "x".repeat(100));
        let warning = EntryParseWarning::new(
            3,
            &long,
            &EntryError::TooLong { chars: 118, max: 50 },
        );
        let preview = warning.preview();
        assert!(!preview.contains('\n'));
        assert!(preview.ends_with("..."));
        assert!(preview.starts_with("line one line two"));
    }

    #[test]
    fn warning_display_names_entry() {
        let warning = EntryParseWarning::new(
            2,
            "bad\u{0}entry",
            &EntryError::BinaryContent { offset: 3, code: 0 },
        );
        let shown = warning.to_string();
        assert!(shown.contains("entry 2"));
        assert!(shown.contains("bad entry"));
        assert!(shown.contains("U+0000"));
    }

    #[test]
    fn notice_only_for_non_empty_input() {
        let report = ExtractionReport::finish(ExtractionMode::FreeText, vec![], vec![], 2);
        assert_eq!(
            report.notice,
            Some(EmptyResultNotice {
                mode: ExtractionMode::FreeText,
                units_scanned: 2
            })
        );

        let empty = ExtractionReport::finish(ExtractionMode::FreeText, vec![], vec![], 0);
        assert!(empty.notice.is_none());
    }

    #[test]
    fn no_notice_when_records_found() {
        let report = ExtractionReport::finish(
            ExtractionMode::StructuredParagraphs,
            vec![PatientRecord::with_label("Patient 1")],
            vec![],
            3,
        );
        assert!(report.notice.is_none());
    }

    #[test]
    fn notice_display_uses_unit() {
        let notice = EmptyResultNotice {
            mode: ExtractionMode::StructuredParagraphs,
            units_scanned: 4,
        };
        assert_eq!(
            notice.to_string(),
            "No patient records could be extracted from 4 paragraphs"
        );
    }
}
