//! Field extraction: turns note text or document paragraphs into PatientRecords.
//!
//! Two modes share one record schema:
//! - structured paragraphs (`Patient N` sections of `Key: Value` lines), used for documents
//! - free text (blank-line separated entries of prose), used for typed notes
//!
//! Field-level failures become field absence. Only whole-entry failures are
//! reported, as `EntryParseWarning`s, and they never abort the batch.

pub mod types;
pub mod fields;
pub mod free_text;
pub mod structured;
pub mod extractor;

pub use types::*;
pub use fields::*;
pub use free_text::*;
pub use structured::*;
pub use extractor::*;

use thiserror::Error;

/// Why a free-text entry was skipped as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Entry too long: {chars} characters exceeds {max} character limit")]
    TooLong { chars: usize, max: usize },

    #[error("Entry contains control character U+{code:04X} at byte {offset}")]
    BinaryContent { offset: usize, code: u32 },
}
