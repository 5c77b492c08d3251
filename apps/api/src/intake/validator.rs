//! File intake rules. Checked in order; the first failure wins.
//!
//! 1. size: 100 B – 15 MB (1 KB minimum for PDF-typed files)
//! 2. type: extension in {.pdf, .doc, .docx, .txt}; a declared MIME must match it
//! 3. duplicate: same filename and byte size as a non-failed resource
//! 4. capacity: at most `MAX_LIVE_RESOURCES` non-failed resources at once

use thiserror::Error;

use crate::intake::resource::{DocumentKind, LifecycleState, RawFile, UploadedResource};

pub const MIN_FILE_BYTES: usize = 100;
pub const MIN_PDF_BYTES: usize = 1024;
pub const MAX_FILE_BYTES: usize = 15 * 1024 * 1024;
pub const MAX_LIVE_RESOURCES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeRejection {
    #[error("File too large ({size} bytes). Please upload files under 15MB.")]
    TooLarge { size: usize, max: usize },

    #[error("File too small ({size} bytes, minimum {min}). Please ensure the file contains content.")]
    TooSmall { size: usize, min: usize },

    #[error("Invalid file type for '{filename}'. Please upload PDF, DOC, DOCX, or TXT files only.")]
    UnsupportedType { filename: String },

    #[error("File type mismatch: '{filename}' was declared as '{mime}'. Please ensure the file is a valid document of that type.")]
    TypeMismatch { filename: String, mime: String },

    #[error("File already uploaded: '{filename}'")]
    DuplicateFile { filename: String },

    #[error("Too many files in this session (limit {limit}). Remove some before uploading more.")]
    TooManyResources { limit: usize },
}

impl IntakeRejection {
    pub fn code(&self) -> &'static str {
        match self {
            IntakeRejection::TooLarge { .. } => "too_large",
            IntakeRejection::TooSmall { .. } => "too_small",
            IntakeRejection::UnsupportedType { .. } => "unsupported_type",
            IntakeRejection::TypeMismatch { .. } => "type_mismatch",
            IntakeRejection::DuplicateFile { .. } => "duplicate_file",
            IntakeRejection::TooManyResources { .. } => "too_many_resources",
        }
    }
}

/// A file that passed intake, with the format extraction should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub kind: DocumentKind,
}

/// Decides whether `file` may join the working set. Pure: the caller owns
/// inserting the resulting pending or failed resource.
pub fn validate(file: &RawFile, existing: &[UploadedResource]) -> Result<Accepted, IntakeRejection> {
    let size = file.size();
    let min = if file.is_pdf_typed() {
        MIN_PDF_BYTES
    } else {
        MIN_FILE_BYTES
    };

    if size > MAX_FILE_BYTES {
        return Err(IntakeRejection::TooLarge {
            size,
            max: MAX_FILE_BYTES,
        });
    }
    if size < min {
        return Err(IntakeRejection::TooSmall { size, min });
    }

    let kind = file
        .kind()
        .ok_or_else(|| IntakeRejection::UnsupportedType {
            filename: file.filename.clone(),
        })?;

    if let Some(mime) = file.declared_mime() {
        if !kind.accepts_mime(&mime) {
            return Err(IntakeRejection::TypeMismatch {
                filename: file.filename.clone(),
                mime,
            });
        }
    }

    let duplicate = existing.iter().any(|resource| {
        resource.state != LifecycleState::Failed
            && resource.file.filename == file.filename
            && resource.file.size() == size
    });
    if duplicate {
        return Err(IntakeRejection::DuplicateFile {
            filename: file.filename.clone(),
        });
    }

    let live = existing
        .iter()
        .filter(|resource| resource.state != LifecycleState::Failed)
        .count();
    if live >= MAX_LIVE_RESOURCES {
        return Err(IntakeRejection::TooManyResources {
            limit: MAX_LIVE_RESOURCES,
        });
    }

    Ok(Accepted { kind })
}
