//! Project membership API handlers.
//!
//! Membership mutations are admin-only and the store refuses to remove or
//! demote a project's last LEAD, surfacing the dedicated `last_lead` code.
use crate::api::error::{api_from_store, ApiError};
use crate::api::types::{MemberAddRequest, MemberListResponse};
use crate::app::AppState;
use crate::auth::Actor;
use crate::model::{MemberPatchRequest, ProjectMember};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/members",
    tag = "members",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project members", body = MemberListResponse)
    )
)]
pub(crate) async fn list_members(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<MemberListResponse>, ApiError> {
    let items = state
        .store
        .list_members(project_id)
        .await
        .map_err(|err| api_from_store("failed to list members", err))?;
    Ok(Json(MemberListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/members",
    tag = "members",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = MemberAddRequest,
    responses(
        (status = 201, description = "Member added", body = ProjectMember),
        (status = 409, description = "User is already a member", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_member(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<MemberAddRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member = state
        .store
        .add_member(actor.user_id, project_id, body.user_id, body.role)
        .await
        .map_err(|err| api_from_store("failed to add member", err))?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    patch,
    path = "/v1/projects/{project_id}/members/{member_id}",
    tag = "members",
    params(
        ("project_id" = Uuid, Path, description = "Project identifier"),
        ("member_id" = Uuid, Path, description = "Membership identifier")
    ),
    request_body = MemberPatchRequest,
    responses(
        (status = 200, description = "Role updated", body = ProjectMember),
        (status = 409, description = "Would demote the last LEAD", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_member(
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<MemberPatchRequest>,
) -> Result<Json<ProjectMember>, ApiError> {
    let member = state
        .store
        .update_member_role(actor.user_id, project_id, member_id, patch)
        .await
        .map_err(|err| api_from_store("failed to update member role", err))?;
    Ok(Json(member))
}

#[utoipa::path(
    delete,
    path = "/v1/projects/{project_id}/members/{member_id}",
    tag = "members",
    params(
        ("project_id" = Uuid, Path, description = "Project identifier"),
        ("member_id" = Uuid, Path, description = "Membership identifier")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 409, description = "Would remove the last LEAD", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn remove_member(
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .remove_member(actor.user_id, project_id, member_id)
        .await
        .map_err(|err| api_from_store("failed to remove member", err))?;
    Ok(StatusCode::NO_CONTENT)
}
