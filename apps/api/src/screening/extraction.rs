//! Plain-text extraction from uploaded resume documents.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::analysis::normalize_text;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported document type for '{0}' (expected .pdf or .txt)")]
    UnsupportedType(String),

    #[error("could not read '{filename}': {reason}")]
    Unreadable { filename: String, reason: String },

    #[error("'{0}' contains no extractable text")]
    Empty(String),
}

/// One uploaded document, as received.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    fn detect(document: &ResumeDocument) -> Option<Self> {
        let lower = document.filename.to_lowercase();
        if lower.ends_with(".pdf") || document.bytes.starts_with(b"%PDF") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }
}

/// Converts a document to normalized plain text. Reading order is kept per page and
/// pages are joined with newlines.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &ResumeDocument) -> Result<String, ExtractionError>;
}

/// PDF via `pdf-extract` on the blocking pool; `.txt` as UTF-8.
pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<String, ExtractionError> {
        let kind = DocumentKind::detect(document)
            .ok_or_else(|| ExtractionError::UnsupportedType(document.filename.clone()))?;

        let raw = match kind {
            DocumentKind::PlainText => String::from_utf8(document.bytes.to_vec()).map_err(|e| {
                ExtractionError::Unreadable {
                    filename: document.filename.clone(),
                    reason: e.to_string(),
                }
            })?,
            DocumentKind::Pdf => {
                let bytes = document.bytes.clone();
                // pdf-extract can panic on malformed input; the JoinError catches it.
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| ExtractionError::Unreadable {
                        filename: document.filename.clone(),
                        reason: format!("PDF parser aborted: {e}"),
                    })?
                    .map_err(|e| ExtractionError::Unreadable {
                        filename: document.filename.clone(),
                        reason: format!("{e:?}"),
                    })?
            }
        };

        let text = normalize_text(&raw);
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty(document.filename.clone()));
        }
        Ok(text)
    }
}
