//! Append-only audit trail records.
//!
//! # Purpose
//! Every mutating workflow writes exactly one audit row (two for message
//! updates, which also record the version snapshot) inside the same
//! transaction as the mutation itself. Rows are never updated or deleted
//! except by project cascade.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Approve => "APPROVE",
            AuditAction::Reject => "REJECT",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            "APPROVE" => Ok(AuditAction::Approve),
            "REJECT" => Ok(AuditAction::Reject),
            other => Err(format!("unknown audit action: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntityType {
    Project,
    TranslationFile,
    Message,
    TranslationVersion,
    ProjectMember,
}

impl std::fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuditEntityType::Project => "PROJECT",
            AuditEntityType::TranslationFile => "TRANSLATION_FILE",
            AuditEntityType::Message => "MESSAGE",
            AuditEntityType::TranslationVersion => "TRANSLATION_VERSION",
            AuditEntityType::ProjectMember => "PROJECT_MEMBER",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for AuditEntityType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PROJECT" => Ok(AuditEntityType::Project),
            "TRANSLATION_FILE" => Ok(AuditEntityType::TranslationFile),
            "MESSAGE" => Ok(AuditEntityType::Message),
            "TRANSLATION_VERSION" => Ok(AuditEntityType::TranslationVersion),
            "PROJECT_MEMBER" => Ok(AuditEntityType::ProjectMember),
            other => Err(format!("unknown audit entity type: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AuditLog {
    pub id: Uuid,
    /// Nullable so the trail survives actor deletion upstream.
    pub user_id: Option<Uuid>,
    pub project_id: Uuid,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: Uuid,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
