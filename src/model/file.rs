//! Translation file model and the export boundary format.
//!
//! # Purpose
//! A file holds all messages for one language of a project; the (project,
//! language_code) pair is unique and the code must be one of the project's
//! declared target languages. `current_version` starts at 0 and is bumped by
//! exactly 1 on every message update, in lockstep with the version snapshots.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::MessageStatus;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TranslationFile {
    pub id: Uuid,
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub language_code: String,
    pub language_name: String,
    pub current_version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct FilePatchRequest {
    pub language_name: Option<String>,
}

/// Round-trip document consumed by downstream translation tooling. The field
/// set is a stable contract; do not rename without coordinating with editors.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FileExport {
    pub language_code: String,
    pub language_name: String,
    pub version: u32,
    pub messages: Vec<ExportedMessage>,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ExportedMessage {
    pub key: String,
    pub value: String,
    pub status: MessageStatus,
    pub comment: Option<String>,
}
