use super::DocumentFormatError;

/// Document decoding abstraction (allows mocking for tests)
///
/// Implementations turn a document byte stream into its non-empty, trimmed
/// paragraphs in document order. No semantic interpretation happens here.
pub trait DocumentReader {
    fn read_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, DocumentFormatError>;
}
