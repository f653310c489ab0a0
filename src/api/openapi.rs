//! OpenAPI schema aggregation for the translation-management API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    files, members, messages, organizations, projects, system,
    types::{
        AuditListResponse, ErrorResponse, FileCreateRequest, FileListResponse, HealthStatus,
        MemberAddRequest, MemberListResponse, MessageCreateRequest, MessageListResponse,
        OrganizationCreateRequest, OrganizationListResponse, ProjectCreateRequest,
        ProjectListResponse, RejectRequest, SystemInfo, VersionListResponse,
    },
};
use crate::model::{
    AuditAction, AuditEntityType, AuditLog, ExportedMessage, FileExport, FilePatchRequest,
    MemberPatchRequest, Message, MessagePatchRequest, MessageSnapshot, MessageStatus,
    Organization, Project, ProjectMember, ProjectPatchRequest, ProjectStats, Role,
    TranslationFile, TranslationVersion,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "localehub",
        version = "v1",
        description = "Multi-tenant translation management HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        organizations::create_organization,
        organizations::list_organizations,
        organizations::get_organization,
        organizations::create_project,
        organizations::list_projects,
        projects::get_project,
        projects::patch_project,
        projects::delete_project,
        projects::project_stats,
        projects::list_audit_log,
        members::list_members,
        members::add_member,
        members::patch_member,
        members::remove_member,
        files::list_files,
        files::create_file,
        files::get_file,
        files::patch_file,
        files::delete_file,
        files::export_file,
        files::version_history,
        messages::list_messages,
        messages::create_message,
        messages::get_message,
        messages::patch_message,
        messages::approve_message,
        messages::reject_message,
        messages::delete_message
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        Organization,
        OrganizationCreateRequest,
        OrganizationListResponse,
        Project,
        ProjectCreateRequest,
        ProjectPatchRequest,
        ProjectListResponse,
        ProjectStats,
        ProjectMember,
        Role,
        MemberAddRequest,
        MemberPatchRequest,
        MemberListResponse,
        TranslationFile,
        FileCreateRequest,
        FilePatchRequest,
        FileListResponse,
        FileExport,
        ExportedMessage,
        Message,
        MessageStatus,
        MessageCreateRequest,
        MessagePatchRequest,
        MessageListResponse,
        RejectRequest,
        TranslationVersion,
        MessageSnapshot,
        VersionListResponse,
        AuditLog,
        AuditAction,
        AuditEntityType,
        AuditListResponse
    )),
    tags(
        (name = "system", description = "Service metadata and health"),
        (name = "organizations", description = "Organization scoping"),
        (name = "projects", description = "Project lifecycle, stats and audit trail"),
        (name = "members", description = "Project membership and roles"),
        (name = "files", description = "Per-language translation files, export and versions"),
        (name = "messages", description = "Message entries and the review workflow")
    )
)]
pub struct ApiDoc;
