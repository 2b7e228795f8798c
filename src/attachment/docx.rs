//! Word document text extraction
//!
//! A `.docx` file is a zip archive whose main text lives in
//! `word/document.xml`. The extractor pulls that entry and reduces the
//! WordprocessingML markup to plain text: paragraph and explicit break tags
//! become newlines, every other tag becomes a space, and the remaining
//! whitespace is normalized. An archive without the entry yields empty
//! text, not an error.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::constants::DOCX_DOCUMENT_ENTRY;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("attachment is not a valid zip archive: {0}")]
    Archive(#[from] ZipError),
    #[error("failed to read archive entry: {0}")]
    Io(#[from] std::io::Error),
}

static PARAGRAPH_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:p[^>]*>").unwrap());
static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:br\b[^>]*/>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static SPACE_BEFORE_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\x0c\x0b]+").unwrap());
static PADDED_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s+\n").unwrap());

/// Extract the plain text of a Word document.
///
/// Returns empty text when the archive has no `word/document.xml` entry.
/// A malformed archive is an error; the caller decides whether to degrade.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entry = match archive.by_name(DOCX_DOCUMENT_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(String::new()),
        Err(err) => return Err(err.into()),
    };

    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut raw)?;
    let xml = String::from_utf8_lossy(&raw);

    Ok(normalize_markup(&xml))
}

/// Reduce WordprocessingML markup to normalized plain text.
///
/// The replacement order matters: structural tags become newlines before
/// the generic tag strip turns everything else into spaces, and the
/// whitespace collapses run on the result.
pub fn normalize_markup(xml: &str) -> String {
    let text = PARAGRAPH_TAG.replace_all(xml, "\n");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, " ");
    let text = SPACE_BEFORE_NEWLINE.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = HORIZONTAL_WHITESPACE.replace_all(&text, " ");
    let text = PADDED_BLANK_LINE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
