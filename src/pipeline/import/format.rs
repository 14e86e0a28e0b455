use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImportError;

/// Broad input categories we handle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileCategory {
    WordDocument,
    PlainText,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordDocument => "word_document",
            Self::PlainText => "plain_text",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Result of format detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDetection {
    pub mime_type: String,
    pub category: FileCategory,
    pub file_size_bytes: u64,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Detect the input format from magic bytes (NOT file extensions).
pub fn detect_format(path: &Path, max_bytes: u64) -> Result<FormatDetection, ImportError> {
    let file_size = std::fs::metadata(path)?.len();

    if file_size > max_bytes {
        return Ok(FormatDetection {
            mime_type: "unknown".into(),
            category: FileCategory::Unsupported,
            file_size_bytes: file_size,
        });
    }

    let mut file = std::fs::File::open(path)?;
    let mut head = vec![0u8; 4096];
    let n = file.read(&mut head)?;
    head.truncate(n);

    let (mime_type, category) = classify_header(&head);
    Ok(FormatDetection {
        mime_type: mime_type.to_string(),
        category,
        file_size_bytes: file_size,
    })
}

/// Classify the first bytes of an input.
pub fn classify_header(head: &[u8]) -> (&'static str, FileCategory) {
    match head {
        // Zip local file header: PK\x03\x04 (.docx is a zip container)
        [0x50, 0x4B, 0x03, 0x04, ..] => (DOCX_MIME, FileCategory::WordDocument),
        _ if is_likely_text(head) => ("text/plain", FileCategory::PlainText),
        _ => ("application/octet-stream", FileCategory::Unsupported),
    }
}

/// Check if a chunk is likely plain text (valid UTF-8, mostly printable)
fn is_likely_text(chunk: &[u8]) -> bool {
    if chunk.is_empty() {
        return false;
    }

    // The chunk may end inside a multi-byte character
    let text = match std::str::from_utf8(chunk) {
        Ok(t) => t,
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&chunk[..e.valid_up_to()]) {
            Ok(t) => t,
            Err(_) => return false,
        },
        Err(_) => return false,
    };

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    // At least 80% printable characters (or whitespace)
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    printable as f64 / total as f64 > 0.80
}

/// Read a whole input file, refusing anything over `max_bytes`.
pub fn read_input(path: &Path, max_bytes: u64) -> Result<Vec<u8>, ImportError> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > max_bytes {
        return Err(ImportError::FileTooLarge {
            size_mb: file_size as f64 / (1024.0 * 1024.0),
            max_mb: max_bytes as f64 / (1024.0 * 1024.0),
        });
    }
    Ok(std::fs::read(path)?)
}

/// Read a text input, failing on invalid UTF-8.
pub fn read_text_input(path: &Path, max_bytes: u64) -> Result<String, ImportError> {
    let bytes = read_input(path, max_bytes)?;
    String::from_utf8(bytes).map_err(|e| ImportError::EncodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 1024 * 1024;

    #[test]
    fn detect_docx_from_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]).unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::WordDocument);
        assert_eq!(format.mime_type, DOCX_MIME);
    }

    #[test]
    fn detect_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "She is a 29-year-old patient at 36 weeks gestation.").unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::PlainText);
        assert_eq!(format.mime_type, "text/plain");
    }

    #[test]
    fn detect_binary_as_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.exe");
        std::fs::write(&path, [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00]).unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::Unsupported);
    }

    #[test]
    fn wrong_extension_detected_by_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misleading.txt");
        std::fs::write(&path, [0x50, 0x4B, 0x03, 0x04, 0x00]).unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::WordDocument);
    }

    #[test]
    fn oversized_file_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.bin");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(LIMIT + 1).unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::Unsupported);
    }

    #[test]
    fn empty_file_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        let format = detect_format(&path, LIMIT).unwrap();
        assert_eq!(format.category, FileCategory::Unsupported);
    }

    #[test]
    fn truncated_multibyte_char_still_text() {
        let bytes = "Hémoglobine".as_bytes();
        // Cut inside the two-byte 'é'
        let (_, category) = classify_header(&bytes[..2]);
        assert_eq!(category, FileCategory::PlainText);
    }

    #[test]
    fn read_input_rejects_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();
        let err = read_input(&path, 32).unwrap_err();
        assert!(matches!(err, ImportError::FileTooLarge { .. }));
    }

    #[test]
    fn read_text_input_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, [0x48, 0xE9, 0x6D, 0x6F]).unwrap();
        let err = read_text_input(&path, LIMIT).unwrap_err();
        assert!(matches!(err, ImportError::EncodingError(_)));
    }

    #[test]
    fn file_category_traits() {
        assert!(FileCategory::WordDocument.is_supported());
        assert!(FileCategory::PlainText.is_supported());
        assert!(!FileCategory::Unsupported.is_supported());
        assert_eq!(FileCategory::PlainText.as_str(), "plain_text");
    }
}
