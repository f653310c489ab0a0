//! Organization API handlers.
//!
//! # Purpose
//! Minimal organization support: organizations exist to scope project name
//! uniqueness. Richer organization member management is out of scope; any
//! authenticated caller may create one.
use crate::api::error::{api_from_store, ApiError};
use crate::api::types::{
    OrganizationCreateRequest, OrganizationListResponse, ProjectCreateRequest,
    ProjectListResponse,
};
use crate::app::AppState;
use crate::auth::Actor;
use crate::model::{Organization, Project};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/v1/organizations",
    tag = "organizations",
    request_body = OrganizationCreateRequest,
    responses(
        (status = 201, description = "Organization created", body = Organization)
    )
)]
pub(crate) async fn create_organization(
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<OrganizationCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let org = Organization {
        id: Uuid::new_v4(),
        name: body.name,
        description: body.description,
        created_by: actor.user_id,
        created_at: now,
        updated_at: now,
    };
    let created = state
        .store
        .create_organization(org)
        .await
        .map_err(|err| api_from_store("failed to create organization", err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/v1/organizations",
    tag = "organizations",
    responses(
        (status = 200, description = "List organizations", body = OrganizationListResponse)
    )
)]
pub(crate) async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<OrganizationListResponse>, ApiError> {
    let items = state
        .store
        .list_organizations()
        .await
        .map_err(|err| api_from_store("failed to list organizations", err))?;
    Ok(Json(OrganizationListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/organizations/{org_id}",
    tag = "organizations",
    params(("org_id" = Uuid, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Organization", body = Organization),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_organization(
    Path(org_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Organization>, ApiError> {
    let org = state
        .store
        .get_organization(org_id)
        .await
        .map_err(|err| api_from_store("failed to load organization", err))?;
    Ok(Json(org))
}

#[utoipa::path(
    post,
    path = "/v1/organizations/{org_id}/projects",
    tag = "projects",
    params(("org_id" = Uuid, Path, description = "Organization identifier")),
    request_body = ProjectCreateRequest,
    responses(
        (status = 201, description = "Project created, creator enrolled as ADMIN", body = Project),
        (status = 409, description = "Project name already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_project(
    Path(org_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<ProjectCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        organization_id: org_id,
        name: body.name,
        description: body.description,
        created_by: actor.user_id,
        source_language: body.source_language,
        target_languages: body.target_languages,
        created_at: now,
        updated_at: now,
    };
    let created = state
        .store
        .create_project(actor.user_id, project)
        .await
        .map_err(|err| api_from_store("failed to create project", err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/v1/organizations/{org_id}/projects",
    tag = "projects",
    params(("org_id" = Uuid, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Projects in the organization", body = ProjectListResponse)
    )
)]
pub(crate) async fn list_projects(
    Path(org_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let items = state
        .store
        .list_projects(org_id)
        .await
        .map_err(|err| api_from_store("failed to list projects", err))?;
    Ok(Json(ProjectListResponse { items }))
}
