use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use raisepath_core::{CompanyId, DocumentId, DomainError, Entity};

/// Declared media type of an uploaded document.
///
/// The allow-list is closed: PDF, spreadsheet (XLSX) and presentation (PPTX).
/// Anything else is rejected at the domain boundary before any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Spreadsheet,
    Presentation,
}

impl MediaType {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const SPREADSHEET_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    pub const PRESENTATION_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";

    /// Match a declared MIME string against the allow-list.
    pub fn from_mime(mime: &str) -> Result<Self, DomainError> {
        match mime {
            Self::PDF_MIME => Ok(MediaType::Pdf),
            Self::SPREADSHEET_MIME => Ok(MediaType::Spreadsheet),
            Self::PRESENTATION_MIME => Ok(MediaType::Presentation),
            other => Err(DomainError::validation(format!(
                "invalid file type '{other}': only PDF, PPTX and XLSX files are allowed"
            ))),
        }
    }

    pub fn as_mime(self) -> &'static str {
        match self {
            MediaType::Pdf => Self::PDF_MIME,
            MediaType::Spreadsheet => Self::SPREADSHEET_MIME,
            MediaType::Presentation => Self::PRESENTATION_MIME,
        }
    }
}

/// Caller-declared metadata for a document being recorded.
///
/// `media_type` is the raw declared MIME string; the allow-list check happens
/// in the aggregate's decision logic. `storage_ref` is an opaque locator —
/// where the bytes actually live is not this crate's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub storage_ref: String,
}

/// A document attached to a company profile.
///
/// Append-only: documents are never mutated, only added and counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub company_id: CompanyId,
    pub name: String,
    pub media_type: MediaType,
    pub size_bytes: u64,
    pub storage_ref: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
