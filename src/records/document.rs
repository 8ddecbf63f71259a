use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_empty, Entity, EntityId, ListFilter};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Blueprint,
    Permit,
    Contract,
    Report,
    Invoice,
    Other,
}

/// Document metadata; file contents are served separately by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    pub kind: DocumentKind,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_by: Option<EntityId>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub project_id: EntityId,
    pub title: String,
    pub kind: DocumentKind,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_by: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
}

impl Entity for Document {
    type Create = NewDocument;
    type Patch = DocumentPatch;

    const KIND: &'static str = "document";
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create(id: EntityId, input: NewDocument) -> Result<Self> {
        require_non_empty("document title", &input.title)?;
        require_non_empty("document file name", &input.file_name)?;

        Ok(Self {
            id,
            project_id: input.project_id,
            title: input.title.trim().to_string(),
            kind: input.kind,
            file_name: input.file_name,
            size_bytes: input.size_bytes,
            uploaded_by: input.uploaded_by,
            uploaded_at: Utc::now(),
        })
    }

    fn apply_patch(&mut self, patch: DocumentPatch) -> Result<()> {
        if let Some(title) = &patch.title {
            require_non_empty("document title", title)?;
        }
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.matches_project(Some(&self.project_id))
            && (filter.matches_search(&self.title) || filter.matches_search(&self.file_name))
    }
}
