//! Message API handlers: create/read, the versioned update, and the review
//! workflow (approve/reject).
use crate::api::error::{api_from_store, api_unprocessable, ApiError};
use crate::api::types::{MessageCreateRequest, MessageListResponse, RejectRequest};
use crate::app::AppState;
use crate::auth::Actor;
use crate::model::{Message, MessagePatchRequest, MessageStatus};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/v1/files/{file_id}/messages",
    tag = "messages",
    params(
        ("file_id" = Uuid, Path, description = "File identifier"),
        ("status" = Option<String>, Query, description = "Filter by PENDING/APPROVED/REJECTED")
    ),
    responses(
        (status = 200, description = "Messages in the file, ordered by key", body = MessageListResponse)
    )
)]
pub(crate) async fn list_messages(
    Path(file_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let status = params
        .get("status")
        .map(|value| MessageStatus::from_str(value))
        .transpose()
        .map_err(|err| api_unprocessable("validation_error", &err))?;
    let items = state
        .store
        .list_messages(file_id, status)
        .await
        .map_err(|err| api_from_store("failed to list messages", err))?;
    Ok(Json(MessageListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/v1/files/{file_id}/messages",
    tag = "messages",
    params(("file_id" = Uuid, Path, description = "File identifier")),
    request_body = MessageCreateRequest,
    responses(
        (status = 201, description = "Message created in PENDING status", body = Message),
        (status = 409, description = "Key already exists in file", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_message(
    Path(file_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<MessageCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .store
        .create_message(actor.user_id, file_id, body.key, body.value, body.comment)
        .await
        .map_err(|err| api_from_store("failed to create message", err))?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/v1/messages/{message_id}",
    tag = "messages",
    params(("message_id" = Uuid, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message", body = Message),
        (status = 404, description = "Message not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_message(
    Path(message_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .store
        .get_message(message_id)
        .await
        .map_err(|err| api_from_store("failed to load message", err))?;
    Ok(Json(message))
}

#[utoipa::path(
    patch,
    path = "/v1/messages/{message_id}",
    tag = "messages",
    params(("message_id" = Uuid, Path, description = "Message identifier")),
    request_body = MessagePatchRequest,
    responses(
        (status = 200, description = "Message updated; file version bumped and snapshot written", body = Message),
        (status = 403, description = "Role does not permit message update", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_message(
    Path(message_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<MessagePatchRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .store
        .update_message(actor.user_id, message_id, patch)
        .await
        .map_err(|err| api_from_store("failed to update message", err))?;
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/v1/messages/{message_id}/approve",
    tag = "messages",
    params(("message_id" = Uuid, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Message approved", body = Message),
        (status = 422, description = "Message is not PENDING", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn approve_message(
    Path(message_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .store
        .approve_message(actor.user_id, message_id)
        .await
        .map_err(|err| api_from_store("failed to approve message", err))?;
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/v1/messages/{message_id}/reject",
    tag = "messages",
    params(("message_id" = Uuid, Path, description = "Message identifier")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Message rejected", body = Message),
        (status = 422, description = "Message is not PENDING", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn reject_message(
    Path(message_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<Message>, ApiError> {
    let reason = body.and_then(|Json(body)| body.reason);
    let message = state
        .store
        .reject_message(actor.user_id, message_id, reason)
        .await
        .map_err(|err| api_from_store("failed to reject message", err))?;
    Ok(Json(message))
}

#[utoipa::path(
    delete,
    path = "/v1/messages/{message_id}",
    tag = "messages",
    params(("message_id" = Uuid, Path, description = "Message identifier")),
    responses(
        (status = 204, description = "Message deleted; key captured in the audit trail")
    )
)]
pub(crate) async fn delete_message(
    Path(message_id): Path<Uuid>,
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_message(actor.user_id, message_id)
        .await
        .map_err(|err| api_from_store("failed to delete message", err))?;
    Ok(StatusCode::NO_CONTENT)
}
