//! Project API handlers.
use crate::api::error::{api_from_store, ApiError};
use crate::api::types::AuditListResponse;
use crate::app::AppState;
use crate::auth::Actor;
use crate::model::{Project, ProjectPatchRequest, ProjectStats};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_AUDIT_LIMIT: u32 = 50;

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_project(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Project>, ApiError> {
    let project = state
        .store
        .get_project(project_id)
        .await
        .map_err(|err| api_from_store("failed to load project", err))?;
    Ok(Json(project))
}

#[utoipa::path(
    patch,
    path = "/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = ProjectPatchRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Role does not permit project update", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_project(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<ProjectPatchRequest>,
) -> Result<Json<Project>, ApiError> {
    let project = state
        .store
        .update_project(actor.user_id, project_id, patch)
        .await
        .map_err(|err| api_from_store("failed to update project", err))?;
    Ok(Json(project))
}

#[utoipa::path(
    delete,
    path = "/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Project and all owned entities deleted"),
        (status = 404, description = "Project not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_project(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_project(actor.user_id, project_id)
        .await
        .map_err(|err| api_from_store("failed to delete project", err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/stats",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "File/message/member counts", body = ProjectStats)
    )
)]
pub(crate) async fn project_stats(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ProjectStats>, ApiError> {
    let stats = state
        .store
        .project_stats(project_id)
        .await
        .map_err(|err| api_from_store("failed to load project stats", err))?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/audit",
    tag = "projects",
    params(
        ("project_id" = Uuid, Path, description = "Project identifier"),
        ("limit" = Option<u32>, Query, description = "Max entries, newest first")
    ),
    responses(
        (status = 200, description = "Audit trail, newest first", body = AuditListResponse)
    )
)]
pub(crate) async fn list_audit_log(
    Path(project_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<AuditListResponse>, ApiError> {
    let limit = params
        .get("limit")
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(DEFAULT_AUDIT_LIMIT);
    let items = state
        .store
        .list_audit_log(project_id, limit)
        .await
        .map_err(|err| api_from_store("failed to load audit log", err))?;
    Ok(Json(AuditListResponse { items }))
}
