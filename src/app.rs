//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::store::TranslationStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn TranslationStore + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/organizations",
            axum::routing::get(api::organizations::list_organizations)
                .post(api::organizations::create_organization),
        )
        .route(
            "/v1/organizations/:org_id",
            axum::routing::get(api::organizations::get_organization),
        )
        .route(
            "/v1/organizations/:org_id/projects",
            axum::routing::get(api::organizations::list_projects)
                .post(api::organizations::create_project),
        )
        .route(
            "/v1/projects/:project_id",
            axum::routing::get(api::projects::get_project)
                .patch(api::projects::patch_project)
                .delete(api::projects::delete_project),
        )
        .route(
            "/v1/projects/:project_id/stats",
            axum::routing::get(api::projects::project_stats),
        )
        .route(
            "/v1/projects/:project_id/audit",
            axum::routing::get(api::projects::list_audit_log),
        )
        .route(
            "/v1/projects/:project_id/members",
            axum::routing::get(api::members::list_members).post(api::members::add_member),
        )
        .route(
            "/v1/projects/:project_id/members/:member_id",
            axum::routing::patch(api::members::patch_member)
                .delete(api::members::remove_member),
        )
        .route(
            "/v1/projects/:project_id/files",
            axum::routing::get(api::files::list_files).post(api::files::create_file),
        )
        .route(
            "/v1/files/:file_id",
            axum::routing::get(api::files::get_file)
                .patch(api::files::patch_file)
                .delete(api::files::delete_file),
        )
        .route(
            "/v1/files/:file_id/export",
            axum::routing::get(api::files::export_file),
        )
        .route(
            "/v1/files/:file_id/versions",
            axum::routing::get(api::files::version_history),
        )
        .route(
            "/v1/files/:file_id/messages",
            axum::routing::get(api::messages::list_messages)
                .post(api::messages::create_message),
        )
        .route(
            "/v1/messages/:message_id",
            axum::routing::get(api::messages::get_message)
                .patch(api::messages::patch_message)
                .delete(api::messages::delete_message),
        )
        .route(
            "/v1/messages/:message_id/approve",
            axum::routing::post(api::messages::approve_message),
        )
        .route(
            "/v1/messages/:message_id/reject",
            axum::routing::post(api::messages::reject_message),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
