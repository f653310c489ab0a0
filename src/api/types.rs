//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the REST API and OpenAPI schema
//! generation. Field-level validation beyond shape (lengths, formats) is the
//! caller's concern; uniqueness and role checks live in the store.
use crate::model::{
    AuditLog, Message, Organization, Project, ProjectMember, Role, TranslationFile,
    TranslationVersion,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub api_version: String,
    pub storage_backend: String,
    pub durable: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrganizationCreateRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrganizationListResponse {
    pub items: Vec<Organization>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProjectCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub source_language: String,
    pub target_languages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProjectListResponse {
    pub items: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MemberAddRequest {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MemberListResponse {
    pub items: Vec<ProjectMember>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FileCreateRequest {
    pub language_code: String,
    pub language_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FileListResponse {
    pub items: Vec<TranslationFile>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct VersionListResponse {
    pub items: Vec<TranslationVersion>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AuditListResponse {
    pub items: Vec<AuditLog>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessageCreateRequest {
    pub key: String,
    pub value: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessageListResponse {
    pub items: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct RejectRequest {
    pub reason: Option<String>,
}
