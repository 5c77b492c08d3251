use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// Where an uploaded resource is in its processing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Pending,
    Extracting,
    Extracted,
    Failed,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Extracted | LifecycleState::Failed)
    }
}

/// Document format, decided by the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Whether a declared MIME essence belongs to this kind's family.
    /// Both Word MIME types are accepted for either Word extension.
    pub fn accepts_mime(self, mime: &str) -> bool {
        match self {
            DocumentKind::Pdf => mime == MIME_PDF,
            DocumentKind::Doc | DocumentKind::Docx => mime == MIME_DOC || mime == MIME_DOCX,
            DocumentKind::PlainText => mime == MIME_TEXT,
        }
    }
}

/// The uploaded blob plus what the client declared about it. The size is
/// recorded at upload and outlives the blob once it is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub filename: String,
    pub mime: Option<String>,
    size: usize,
    bytes: Bytes,
}

impl RawFile {
    pub fn new(filename: impl Into<String>, mime: Option<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            filename: filename.into(),
            mime,
            size: bytes.len(),
            bytes,
        }
    }

    /// Byte size as uploaded.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The blob; empty once released.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn is_released(&self) -> bool {
        self.bytes.is_empty() && self.size > 0
    }

    /// Drops this handle on the blob. Clones already handed to an
    /// extraction keep theirs.
    pub fn release(&mut self) {
        self.bytes = Bytes::new();
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_filename(&self.filename)
    }

    /// MIME essence (lowercased, parameters dropped). Clients that send no
    /// type, or the generic `application/octet-stream`, count as undeclared.
    pub fn declared_mime(&self) -> Option<String> {
        let essence = self
            .mime
            .as_deref()?
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.is_empty() || essence == "application/octet-stream" {
            None
        } else {
            Some(essence)
        }
    }

    pub fn is_pdf_typed(&self) -> bool {
        self.kind() == Some(DocumentKind::Pdf) || self.declared_mime().as_deref() == Some(MIME_PDF)
    }
}

/// One uploaded file and its processing state. Working state only.
#[derive(Debug, Clone)]
pub struct UploadedResource {
    pub id: Uuid,
    pub file: RawFile,
    pub state: LifecycleState,
    pub extracted_text: Option<String>,
    pub failure_code: Option<&'static str>,
    pub failure_reason: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl UploadedResource {
    pub fn pending(file: RawFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            state: LifecycleState::Pending,
            extracted_text: None,
            failure_code: None,
            failure_reason: None,
            received_at: Utc::now(),
        }
    }

    /// A resource that never made it past intake. Kept so the client sees
    /// the rejection next to the files that were accepted; only the name,
    /// size and reason survive, the blob is released.
    pub fn rejected(mut file: RawFile, code: &'static str, reason: String) -> Self {
        file.release();
        Self {
            state: LifecycleState::Failed,
            failure_code: Some(code),
            failure_reason: Some(reason),
            ..Self::pending(file)
        }
    }

    pub fn label(&self) -> &str {
        &self.file.filename
    }
}

/// JSON view of a resource returned by the resources API.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    pub id: Uuid,
    pub filename: String,
    pub mime: Option<String>,
    pub size: usize,
    pub kind: Option<DocumentKind>,
    pub state: LifecycleState,
    pub failure_code: Option<&'static str>,
    pub failure_reason: Option<String>,
    pub extracted_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl ResourceView {
    pub fn summary(resource: &UploadedResource) -> Self {
        Self {
            id: resource.id,
            filename: resource.file.filename.clone(),
            mime: resource.file.mime.clone(),
            size: resource.file.size(),
            kind: resource.file.kind(),
            state: resource.state,
            failure_code: resource.failure_code,
            failure_reason: resource.failure_reason.clone(),
            extracted_chars: resource
                .extracted_text
                .as_ref()
                .map(|text| text.chars().count()),
            extracted_text: None,
            received_at: resource.received_at,
        }
    }

    pub fn detailed(resource: &UploadedResource) -> Self {
        Self {
            extracted_text: resource.extracted_text.clone(),
            ..Self::summary(resource)
        }
    }
}
