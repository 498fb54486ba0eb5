//! Document Extractor
//!
//! Turns an uploaded file into plain text.
//!
//! ## Supported Formats
//! - PDF: per-page text via pdf-extract (feature `pdf`)
//! - Word: .docx via docx-rs (feature `docx`)
//! - Text: .txt, .md (direct decode)
//!
//! ## Dispatch
//! 1. Declared media type
//! 2. File name extension, resolved through mime_guess
//! 3. Otherwise `UnsupportedFormat`, before any parser runs

mod docx;
mod pdf;
mod text;

use crate::error::{DocQueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";
pub const MARKDOWN_MIME: &str = "text/markdown";

/// A file as selected by the user. Consumed by extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Vec<u8>,
    /// Media type reported by the picker; may be empty
    pub media_type: String,
    pub file_name: String,
}

impl UploadedDocument {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a file from disk without a declared type, so dispatch goes by extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(bytes, String::new(), file_name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
        }
    }

    /// Map a media type (parameters ignored) to a supported format
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            PDF_MIME => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            TEXT_MIME | MARKDOWN_MIME => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Map a file name to a supported format through its extension
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        mime_guess::from_path(file_name)
            .iter()
            .find_map(|mime| Self::from_media_type(mime.essence_str()))
    }

    /// Declared media type first, extension second
    pub fn detect(media_type: &str, file_name: &str) -> Result<Self> {
        if let Some(format) = Self::from_media_type(media_type) {
            return Ok(format);
        }
        if let Some(format) = Self::from_file_name(file_name) {
            return Ok(format);
        }

        let declared = if !media_type.trim().is_empty() {
            media_type.trim().to_string()
        } else {
            Path::new(file_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_lowercase()))
                .unwrap_or_else(|| "unknown".to_string())
        };

        Err(DocQueryError::UnsupportedFormat { declared })
    }
}

/// Text produced by one of the format readers
#[derive(Debug)]
struct RawText {
    text: String,
    page_count: Option<usize>,
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub format: DocumentFormat,
    pub page_count: Option<usize>,
    pub word_count: usize,
}

/// Stateless; parsers are chosen per call
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract plain text from an uploaded document
    pub async fn extract(&self, document: UploadedDocument) -> Result<ExtractedDocument> {
        let format = DocumentFormat::detect(&document.media_type, &document.file_name)?;
        let file_name = document.file_name.clone();

        tracing::info!(
            "[DocumentExtractor] Extracting {} ({} bytes) as {}",
            file_name,
            document.bytes.len(),
            format.as_str()
        );

        let raw = match format {
            DocumentFormat::PlainText => text::extract(&document.bytes),
            DocumentFormat::Pdf | DocumentFormat::Docx => {
                let join_name = file_name.clone();
                tokio::task::spawn_blocking(move || {
                    Self::extract_binary(format, &document.bytes, &document.file_name)
                })
                .await
                .map_err(|e| DocQueryError::ExtractionFailed {
                    file_name: join_name,
                    reason: format!("extraction task failed: {}", e),
                })??
            }
        };

        if raw.text.trim().is_empty() {
            tracing::warn!(
                "[DocumentExtractor] No text found in {} - likely scanned or empty",
                file_name
            );
            return Err(DocQueryError::NoExtractableText { file_name });
        }

        let word_count = raw.text.split_whitespace().count();

        tracing::info!(
            "[DocumentExtractor] {} extracted: {} chars, {} words, {} pages",
            file_name,
            raw.text.len(),
            word_count,
            raw.page_count
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string())
        );

        Ok(ExtractedDocument {
            text: raw.text,
            format,
            page_count: raw.page_count,
            word_count,
        })
    }

    fn extract_binary(format: DocumentFormat, bytes: &[u8], file_name: &str) -> Result<RawText> {
        match format {
            DocumentFormat::Pdf => pdf::extract(bytes, file_name),
            DocumentFormat::Docx => docx::extract(bytes, file_name),
            DocumentFormat::PlainText => Ok(text::extract(bytes)),
        }
    }
}

/// Trim lines and drop empty ones
fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
