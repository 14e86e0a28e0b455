pub mod docx;
pub mod sanitize;
pub mod types;

pub use docx::*;
pub use sanitize::*;
pub use types::*;

use thiserror::Error;

/// The uploaded bytes are not a readable document. Fatal to that upload only.
#[derive(Error, Debug)]
pub enum DocumentFormatError {
    #[error("Document too large: {size} bytes exceeds {max} byte limit")]
    TooLarge { size: u64, max: u64 },

    #[error("Not a document container: {0}")]
    NotAnArchive(String),

    #[error("Document part missing: {0}")]
    MissingPart(&'static str),

    #[error("Could not read document part {part}: {reason}")]
    UnreadablePart { part: &'static str, reason: String },

    #[error("Malformed document XML at byte {position}: {reason}")]
    MalformedXml { position: u64, reason: String },
}
