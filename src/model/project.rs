//! Project model definitions and patch/stat payloads.
//!
//! # Purpose
//! Defines project records (unique by name within an organization), the patch
//! payload used by the update workflow, and the read-only stats aggregate.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub source_language: String,
    pub target_languages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ProjectPatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub source_language: Option<String>,
    pub target_languages: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProjectStats {
    pub project_id: Uuid,
    pub name: String,
    pub files: u64,
    pub messages: u64,
    pub members: u64,
}
