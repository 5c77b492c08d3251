//! Text extraction: turns an uploaded resume into normalized plain text.
//!
//! Dispatch is by `DocumentKind`. PDFs go through an ordered chain of
//! `ExtractionStrategy` objects (see `pdf`). Every path ends in
//! `normalize::normalize_text` followed by the minimum-length guard.
//! Decoding is CPU-bound and runs inside `tokio::task::spawn_blocking`.

pub mod normalize;
pub mod pdf;
pub mod plain_text;
pub mod word;

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use crate::extraction::pdf::PdfExtractor;
use crate::intake::resource::{DocumentKind, RawFile};
use crate::intake::working_set::WorkingSet;

/// Normalized text shorter than this is rejected whatever produced it.
pub const MIN_EXTRACTED_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("The text file appears to be empty or too short.")]
    EmptyContent,

    #[error("Failed to parse Word document: {0}")]
    ParseFailure(String),

    #[error("{0}")]
    UnavailableProcessor(String),

    #[error("Unable to extract text from PDF. The file may be corrupted, encrypted, or contain only images.")]
    ExtractionExhausted,

    #[error("Could not extract sufficient text from the file (got {chars} characters, need at least 50). Please ensure the file contains readable text.")]
    InsufficientText { chars: usize },

    #[error("Extraction aborted: {0}")]
    Aborted(String),
}

impl ExtractionError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::EmptyContent => "empty_content",
            ExtractionError::ParseFailure(_) => "parse_failure",
            ExtractionError::UnavailableProcessor(_) => "unavailable_processor",
            ExtractionError::ExtractionExhausted => "extraction_exhausted",
            ExtractionError::InsufficientText { .. } => "insufficient_text",
            ExtractionError::Aborted(_) => "aborted",
        }
    }
}

/// Per-format text extractor. Cheap to clone; holds no per-resource state.
#[derive(Clone, Default)]
pub struct TextExtractor {
    pdf: Arc<PdfExtractor>,
}

impl TextExtractor {
    pub fn new(pdf: PdfExtractor) -> Self {
        Self { pdf: Arc::new(pdf) }
    }

    /// Extracts and normalizes the text of `file` on the blocking pool.
    /// A panic inside a decoder comes back as `ExtractionError::Aborted`.
    pub async fn extract(&self, file: &RawFile) -> Result<String, ExtractionError> {
        let kind = file.kind().ok_or_else(|| {
            ExtractionError::UnavailableProcessor(format!(
                "No extractor for '{}'. Please upload PDF, DOC, DOCX, or TXT files.",
                file.filename
            ))
        })?;

        let extractor = self.clone();
        let bytes = file.bytes().clone();
        tokio::task::spawn_blocking(move || extractor.extract_blocking(kind, &bytes))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))?
    }

    pub fn extract_blocking(
        &self,
        kind: DocumentKind,
        bytes: &[u8],
    ) -> Result<String, ExtractionError> {
        let raw = match kind {
            DocumentKind::PlainText => plain_text::extract(bytes)?,
            DocumentKind::Docx => word::extract_docx(bytes)?,
            DocumentKind::Doc => word::extract_doc(bytes)?,
            DocumentKind::Pdf => self.pdf.extract(bytes)?,
        };

        let text = normalize::normalize_text(&raw);
        let chars = text.chars().count();
        if chars < MIN_EXTRACTED_CHARS {
            return Err(ExtractionError::InsufficientText { chars });
        }
        Ok(text)
    }
}

/// Runs one extraction for resource `id` in the background and records the
/// outcome in the working set. Dropping the handle does not stop the work.
pub fn spawn_extraction(
    workspace: Arc<WorkingSet>,
    extractor: TextExtractor,
    id: Uuid,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let file = match workspace.begin_extraction(id).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Not extracting {id}: {e}");
                return;
            }
        };
        let outcome = extractor.extract(&file).await;
        workspace.finish_extraction(id, outcome).await;
    })
}
