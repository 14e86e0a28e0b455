//! .docx paragraph reader.
//!
//! A .docx file is a zip container; the body text lives in `word/document.xml`.
//! Only body-level `w:p` paragraphs are returned: paragraphs inside tables or
//! nested in text boxes are skipped. Within a paragraph, `w:t` runs are
//! concatenated, `w:tab` becomes a tab and `w:br`/`w:cr` a newline.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::types::DocumentReader;
use super::DocumentFormatError;
use crate::config::DEFAULT_MAX_DOCUMENT_BYTES;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads Office Open XML word-processing documents.
pub struct DocxReader {
    max_bytes: u64,
}

impl DocxReader {
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for DocxReader {
    fn read_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, DocumentFormatError> {
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            return Err(DocumentFormatError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        let xml = read_document_part(bytes, self.max_bytes)?;
        let paragraphs = parse_body_paragraphs(&xml)?;

        tracing::debug!(
            bytes = size,
            paragraphs = paragraphs.len(),
            "DocxReader: document decoded"
        );

        Ok(paragraphs)
    }
}

/// Pull `word/document.xml` out of the container. The archive is dropped
/// before returning, on success and on every error path.
///
/// The inflated part is held to `max_bytes` as well: the declared size is
/// checked first, then the read itself is capped in case the header lies.
fn read_document_part(bytes: &[u8], max_bytes: u64) -> Result<String, DocumentFormatError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentFormatError::NotAnArchive(e.to_string()))?;

    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Err(DocumentFormatError::MissingPart(DOCUMENT_PART)),
        Err(e) => {
            return Err(DocumentFormatError::UnreadablePart {
                part: DOCUMENT_PART,
                reason: e.to_string(),
            })
        }
    };

    let declared = part.size();
    if declared > max_bytes {
        return Err(DocumentFormatError::TooLarge {
            size: declared,
            max: max_bytes,
        });
    }

    let mut raw = Vec::new();
    (&mut part)
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(|e| DocumentFormatError::UnreadablePart {
            part: DOCUMENT_PART,
            reason: e.to_string(),
        })?;

    let inflated = raw.len() as u64;
    if inflated > max_bytes {
        return Err(DocumentFormatError::TooLarge {
            size: inflated,
            max: max_bytes,
        });
    }

    String::from_utf8(raw).map_err(|e| DocumentFormatError::UnreadablePart {
        part: DOCUMENT_PART,
        reason: e.to_string(),
    })
}

fn parse_body_paragraphs(xml: &str) -> Result<Vec<String>, DocumentFormatError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(reader.buffer_position() as u64, e))?;
        let collecting = table_depth == 0 && paragraph_depth == 1;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current.clear();
                    }
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) if collecting => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(ref t) if collecting && in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| malformed(reader.buffer_position() as u64, e))?;
                current.push_str(&text);
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:p" => {
                    if collecting {
                        let text = current.trim();
                        if !text.is_empty() {
                            paragraphs.push(text.to_string());
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if paragraph_depth != 0 || table_depth != 0 {
        return Err(DocumentFormatError::MalformedXml {
            position: reader.buffer_position() as u64,
            reason: "unexpected end of document".into(),
        });
    }

    Ok(paragraphs)
}

fn malformed(position: u64, err: impl std::fmt::Display) -> DocumentFormatError {
    DocumentFormatError::MalformedXml {
        position,
        reason: err.to_string(),
    }
}
