use crate::auth::rbac::Action;
use crate::model::{
    AuditLog, FileExport, FilePatchRequest, MemberPatchRequest, Message, MessagePatchRequest,
    MessageStatus, Organization, Project, ProjectMember, ProjectPatchRequest, ProjectStats, Role,
    TranslationFile, TranslationVersion,
};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("action not permitted: {0}")]
    Unauthorized(Action),
    #[error("project must retain at least one LEAD member")]
    LastLead,
    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: MessageStatus,
        to: MessageStatus,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for the translation workflow.
///
/// Implementations enforce role checks, uniqueness, cascades and the message
/// versioning invariants transactionally; handlers above this trait only
/// translate errors to HTTP. `actor` is the caller's user id, already
/// authenticated upstream.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    async fn create_organization(&self, org: Organization) -> StoreResult<Organization>;
    async fn get_organization(&self, org_id: Uuid) -> StoreResult<Organization>;
    async fn list_organizations(&self) -> StoreResult<Vec<Organization>>;

    async fn create_project(&self, actor: Uuid, project: Project) -> StoreResult<Project>;
    async fn get_project(&self, project_id: Uuid) -> StoreResult<Project>;
    async fn list_projects(&self, org_id: Uuid) -> StoreResult<Vec<Project>>;
    async fn update_project(
        &self,
        actor: Uuid,
        project_id: Uuid,
        patch: ProjectPatchRequest,
    ) -> StoreResult<Project>;
    async fn delete_project(&self, actor: Uuid, project_id: Uuid) -> StoreResult<()>;
    async fn project_stats(&self, project_id: Uuid) -> StoreResult<ProjectStats>;
    async fn list_audit_log(&self, project_id: Uuid, limit: u32) -> StoreResult<Vec<AuditLog>>;

    async fn add_member(
        &self,
        actor: Uuid,
        project_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> StoreResult<ProjectMember>;
    async fn list_members(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>>;
    async fn update_member_role(
        &self,
        actor: Uuid,
        project_id: Uuid,
        member_id: Uuid,
        patch: MemberPatchRequest,
    ) -> StoreResult<ProjectMember>;
    async fn remove_member(&self, actor: Uuid, project_id: Uuid, member_id: Uuid)
        -> StoreResult<()>;

    async fn create_file(
        &self,
        actor: Uuid,
        project_id: Uuid,
        language_code: String,
        language_name: String,
    ) -> StoreResult<TranslationFile>;
    async fn get_file(&self, file_id: Uuid) -> StoreResult<TranslationFile>;
    async fn list_files(&self, project_id: Uuid) -> StoreResult<Vec<TranslationFile>>;
    async fn update_file(
        &self,
        actor: Uuid,
        file_id: Uuid,
        patch: FilePatchRequest,
    ) -> StoreResult<TranslationFile>;
    async fn delete_file(&self, actor: Uuid, file_id: Uuid) -> StoreResult<()>;
    async fn export_file(&self, file_id: Uuid) -> StoreResult<FileExport>;
    async fn version_history(&self, file_id: Uuid) -> StoreResult<Vec<TranslationVersion>>;

    async fn create_message(
        &self,
        actor: Uuid,
        file_id: Uuid,
        key: String,
        value: String,
        comment: Option<String>,
    ) -> StoreResult<Message>;
    async fn get_message(&self, message_id: Uuid) -> StoreResult<Message>;
    async fn list_messages(
        &self,
        file_id: Uuid,
        status: Option<MessageStatus>,
    ) -> StoreResult<Vec<Message>>;
    async fn update_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        patch: MessagePatchRequest,
    ) -> StoreResult<Message>;
    async fn approve_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<Message>;
    async fn reject_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        reason: Option<String>,
    ) -> StoreResult<Message>;
    async fn delete_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
