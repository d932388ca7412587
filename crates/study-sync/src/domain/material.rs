//! Study Material Entity
//!
//! A material carries at most one payload: an uploaded document or an
//! external link. The backend has used both shapes on the same endpoint, so
//! both decode into [`MaterialPayload`] here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::entity::Entity;
use crate::error::{SyncError, SyncResult};

/// Largest document accepted for upload
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
];

/// What a material points at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MaterialPayload {
    /// Uploaded file. `bytes` is empty for documents already on the server,
    /// which are addressed through `href` instead.
    Document {
        filename: String,
        bytes: Vec<u8>,
        href: Option<String>,
    },
    /// External resource
    Link { url: String },
    #[default]
    None,
}

impl MaterialPayload {
    pub fn document(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        MaterialPayload::Document { filename: filename.into(), bytes, href: None }
    }

    pub fn link(url: impl Into<String>) -> Self {
        MaterialPayload::Link { url: url.into() }
    }

    /// Where the material can be opened from, if anywhere
    pub fn href(&self) -> Option<&str> {
        match self {
            MaterialPayload::Document { href, .. } => href.as_deref(),
            MaterialPayload::Link { url } => Some(url),
            MaterialPayload::None => None,
        }
    }

    /// True when a request must carry file bytes
    pub fn has_upload(&self) -> bool {
        matches!(self, MaterialPayload::Document { bytes, .. } if !bytes.is_empty())
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            MaterialPayload::Document { .. } => "Document",
            MaterialPayload::Link { .. } => "Link",
            MaterialPayload::None => "Note",
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        match self {
            MaterialPayload::Document { filename, bytes, .. } if !bytes.is_empty() => {
                if document_mime(filename).is_none() {
                    return Err(SyncError::validation("Please select a valid file type (PDF, DOC, DOCX)"));
                }
                if bytes.len() > MAX_DOCUMENT_BYTES {
                    return Err(SyncError::validation("File size must be less than 10MB"));
                }
                Ok(())
            }
            MaterialPayload::Link { url } => validate_link(url),
            _ => Ok(()),
        }
    }
}

/// MIME type for an accepted document, keyed by file extension
pub fn document_mime(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    DOCUMENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

fn validate_link(raw: &str) -> SyncResult<()> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|_| SyncError::validation("Please enter a valid URL"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(SyncError::validation("Links must start with http:// or https://")),
    }
}

/// A study material as returned by `/study-materials`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "MaterialRecord")]
pub struct StudyMaterial {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub description: String,
    pub payload: MaterialPayload,
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire shape; every known variant decodes through here
#[derive(Deserialize)]
struct MaterialRecord {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(rename = "materialName", alias = "name", default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(rename = "materialDescription", alias = "description", default, deserialize_with = "null_as_empty")]
    description: String,
    #[serde(rename = "studyMaterialDocument", default)]
    document: Option<String>,
    #[serde(default, alias = "url")]
    link: Option<String>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<MaterialRecord> for StudyMaterial {
    fn from(record: MaterialRecord) -> Self {
        let link = record.link.filter(|l| !l.trim().is_empty());
        let document = record.document.filter(|d| !d.trim().is_empty());
        let payload = match (link, document) {
            (Some(url), _) => MaterialPayload::Link { url },
            (None, Some(reference)) => MaterialPayload::Document {
                filename: reference
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(reference.as_str())
                    .to_string(),
                bytes: Vec::new(),
                href: Some(reference),
            },
            (None, None) => MaterialPayload::None,
        };
        StudyMaterial {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            description: record.description,
            payload,
            created_at: record.created_at,
        }
    }
}

/// Fields for creating a material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialDraft {
    pub user_id: Option<String>,
    pub name: String,
    pub description: String,
    pub payload: MaterialPayload,
}

impl MaterialDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), ..Default::default() }
    }

    pub fn with_payload(mut self, payload: MaterialPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Partial update for a material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub payload: Option<MaterialPayload>,
}

impl MaterialPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.payload.is_none()
    }
}

impl Entity for StudyMaterial {
    type Draft = MaterialDraft;
    type Patch = MaterialPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn provisional(id: String, draft: &MaterialDraft) -> Self {
        StudyMaterial {
            id,
            user_id: draft.user_id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            payload: draft.payload.clone(),
            created_at: Some(Utc::now()),
        }
    }

    fn apply(&mut self, patch: &MaterialPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(payload) = &patch.payload {
            self.payload = payload.clone();
        }
    }

    fn validate_draft(draft: &MaterialDraft) -> SyncResult<()> {
        if draft.name.trim().is_empty() {
            return Err(SyncError::validation("Material name is required"));
        }
        draft.payload.validate()
    }

    fn validate_patch(patch: &MaterialPatch) -> SyncResult<()> {
        if patch.is_empty() {
            return Err(SyncError::validation("Nothing to update"));
        }
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(SyncError::validation("Material name is required"));
        }
        match &patch.payload {
            Some(payload) => payload.validate(),
            None => Ok(()),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
