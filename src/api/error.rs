//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint returns the
//! same shape, and maps the store's error taxonomy onto status codes in one
//! place.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build(status: StatusCode, code: &str, message: String) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message,
            request_id: None,
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    build(StatusCode::NOT_FOUND, "not_found", message.to_string())
}

pub fn api_forbidden(message: &str) -> ApiError {
    build(StatusCode::FORBIDDEN, "forbidden", message.to_string())
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    build(StatusCode::CONFLICT, code, message.to_string())
}

pub fn api_unprocessable(code: &str, message: &str) -> ApiError {
    build(StatusCode::UNPROCESSABLE_ENTITY, code, message.to_string())
}

/// Log the store error server-side and return a generic internal response.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "localehub storage error");
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        message.to_string(),
    )
}

/// Translate a store failure into the uniform HTTP error shape.
///
/// `context` is used only for the internal (500) message; every other
/// variant carries enough detail of its own.
pub fn api_from_store(context: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => api_not_found(&format!("{what} not found")),
        StoreError::Unauthorized(action) => {
            api_forbidden(&format!("role does not permit {action}"))
        }
        StoreError::Conflict(what) => api_conflict("already_exists", &what),
        StoreError::LastLead => api_conflict(
            "last_lead",
            "project must retain at least one LEAD member",
        ),
        StoreError::InvalidStatusTransition { from, to } => api_unprocessable(
            "invalid_status_transition",
            &format!("cannot transition message from {from} to {to}"),
        ),
        StoreError::Validation(message) => api_unprocessable("validation_error", &message),
        err @ StoreError::Unexpected(_) => api_internal(context, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::rbac::Action;
    use crate::model::MessageStatus;

    #[test]
    fn store_errors_map_to_expected_statuses() {
        let cases = [
            (
                api_from_store("x", StoreError::NotFound("project".into())),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                api_from_store("x", StoreError::Unauthorized(Action::DeleteProject)),
                StatusCode::FORBIDDEN,
                "forbidden",
            ),
            (
                api_from_store("x", StoreError::Conflict("membership exists".into())),
                StatusCode::CONFLICT,
                "already_exists",
            ),
            (
                api_from_store("x", StoreError::LastLead),
                StatusCode::CONFLICT,
                "last_lead",
            ),
            (
                api_from_store(
                    "x",
                    StoreError::InvalidStatusTransition {
                        from: MessageStatus::Approved,
                        to: MessageStatus::Rejected,
                    },
                ),
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_status_transition",
            ),
            (
                api_from_store("x", StoreError::Validation("bad language".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
            ),
            (
                api_from_store("x", StoreError::Unexpected(anyhow::anyhow!("boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
            ),
        ];
        for (api, status, code) in cases {
            assert_eq!(api.status, status);
            assert_eq!(api.body.code, code);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = StoreError::Unexpected(anyhow::anyhow!("connection refused to 10.0.0.5"));
        let api = api_from_store("failed to list projects", err);
        assert_eq!(api.body.message, "failed to list projects");
    }
}
