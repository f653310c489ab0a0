//! Translation file API handlers.
use crate::api::error::{api_from_store, ApiError};
use crate::api::types::{FileCreateRequest, FileListResponse, VersionListResponse};
use crate::app::AppState;
use crate::auth::Actor;
use crate::model::{FileExport, FilePatchRequest, TranslationFile};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/files",
    tag = "files",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Translation files in the project", body = FileListResponse)
    )
)]
pub(crate) async fn list_files(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, ApiError> {
    let items = state
        .store
        .list_files(project_id)
        .await
        .map_err(|err| api_from_store("failed to list files", err))?;
    Ok(Json(FileListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/files",
    tag = "files",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = FileCreateRequest,
    responses(
        (status = 201, description = "File created at version 0", body = TranslationFile),
        (status = 409, description = "Language file already exists", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Language not among the project's targets", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_file(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<FileCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state
        .store
        .create_file(actor.user_id, project_id, body.language_code, body.language_name)
        .await
        .map_err(|err| api_from_store("failed to create file", err))?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    get,
    path = "/v1/files/{file_id}",
    tag = "files",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Translation file", body = TranslationFile),
        (status = 404, description = "File not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_file(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<TranslationFile>, ApiError> {
    let file = state
        .store
        .get_file(file_id)
        .await
        .map_err(|err| api_from_store("failed to load file", err))?;
    Ok(Json(file))
}

#[utoipa::path(
    patch,
    path = "/v1/files/{file_id}",
    tag = "files",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    request_body = FilePatchRequest,
    responses(
        (status = 200, description = "File updated", body = TranslationFile)
    )
)]
pub(crate) async fn patch_file(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<FilePatchRequest>,
) -> Result<Json<TranslationFile>, ApiError> {
    let file = state
        .store
        .update_file(actor.user_id, file_id, patch)
        .await
        .map_err(|err| api_from_store("failed to update file", err))?;
    Ok(Json(file))
}

#[utoipa::path(
    delete,
    path = "/v1/files/{file_id}",
    tag = "files",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 204, description = "File, its messages and versions deleted")
    )
)]
pub(crate) async fn delete_file(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_file(actor.user_id, file_id)
        .await
        .map_err(|err| api_from_store("failed to delete file", err))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/files/{file_id}/export",
    tag = "files",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Round-trip export document", body = FileExport)
    )
)]
pub(crate) async fn export_file(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<FileExport>, ApiError> {
    let export = state
        .store
        .export_file(file_id)
        .await
        .map_err(|err| api_from_store("failed to export file", err))?;
    Ok(Json(export))
}

#[utoipa::path(
    get,
    path = "/v1/files/{file_id}/versions",
    tag = "files",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Version snapshots, oldest first", body = VersionListResponse)
    )
)]
pub(crate) async fn version_history(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<VersionListResponse>, ApiError> {
    let items = state
        .store
        .version_history(file_id)
        .await
        .map_err(|err| api_from_store("failed to load version history", err))?;
    Ok(Json(VersionListResponse { items }))
}
