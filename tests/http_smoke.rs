mod http_helpers;

use axum::body::Body;
use axum::http::StatusCode;
use http_helpers::{actor_request, bare_request, json_request, read_json};
use localehub::app::{build_router, AppState};
use localehub::store::memory::InMemoryStore;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

type App = axum::routing::RouterIntoService<Body, ()>;

fn app() -> App {
    let state = AppState {
        api_version: "v1".to_string(),
        store: Arc::new(InMemoryStore::new()),
    };
    build_router(state).into_service()
}

async fn setup_project(app: &App, admin: Uuid) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/organizations",
            admin,
            serde_json::json!({ "name": "Acme", "description": "translations" }),
        ))
        .await
        .expect("organization");
    assert_eq!(response.status(), StatusCode::CREATED);
    let org = read_json(response).await;
    let org_id = org["id"].as_str().expect("org id").to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/organizations/{org_id}/projects"),
            admin,
            serde_json::json!({
                "name": "website",
                "description": null,
                "source_language": "en",
                "target_languages": ["es", "fr"]
            }),
        ))
        .await
        .expect("project");
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = read_json(response).await;
    let project_id = project["id"].as_str().expect("project id").to_string();
    (org_id, project_id)
}

async fn create_file(app: &App, admin: Uuid, project_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/files"),
            admin,
            serde_json::json!({ "language_code": "es", "language_name": "Spanish" }),
        ))
        .await
        .expect("file");
    assert_eq!(response.status(), StatusCode::CREATED);
    let file = read_json(response).await;
    assert_eq!(file["current_version"], 0);
    file["id"].as_str().expect("file id").to_string()
}

#[tokio::test]
async fn translation_workflow_smoke() {
    let app = app();
    let admin = Uuid::new_v4();
    let (_org_id, project_id) = setup_project(&app, admin).await;

    // Files outside the project's declared targets are rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/files"),
            admin,
            serde_json::json!({ "language_code": "de", "language_name": "German" }),
        ))
        .await
        .expect("file out of targets");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");

    let file_id = create_file(&app, admin, &project_id).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/files/{file_id}/messages"),
            admin,
            serde_json::json!({ "key": "greeting", "value": "Hello", "comment": null }),
        ))
        .await
        .expect("message");
    assert_eq!(response.status(), StatusCode::CREATED);
    let message = read_json(response).await;
    assert_eq!(message["status"], "PENDING");
    let message_id = message["id"].as_str().expect("message id").to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/v1/messages/{message_id}"),
            admin,
            serde_json::json!({ "value": "Hola", "comment": "informal" }),
        ))
        .await
        .expect("patch message");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["value"], "Hola");

    // The update bumped the file version and wrote a full snapshot.
    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/v1/files/{file_id}/versions")))
        .await
        .expect("versions");
    assert_eq!(response.status(), StatusCode::OK);
    let versions = read_json(response).await;
    let items = versions["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["version_number"], 1);
    assert_eq!(items[0]["snapshot"]["greeting"]["value"], "Hola");

    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/v1/files/{file_id}/export")))
        .await
        .expect("export");
    assert_eq!(response.status(), StatusCode::OK);
    let export = read_json(response).await;
    assert_eq!(export["language_code"], "es");
    assert_eq!(export["version"], 1);
    assert_eq!(export["messages"].as_array().expect("messages").len(), 1);
    assert_eq!(export["messages"][0]["key"], "greeting");

    let response = app
        .clone()
        .oneshot(actor_request(
            "POST",
            &format!("/v1/messages/{message_id}/approve"),
            admin,
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);
    let approved = read_json(response).await;
    assert_eq!(approved["status"], "APPROVED");

    // APPROVED is terminal.
    let response = app
        .clone()
        .oneshot(actor_request(
            "POST",
            &format!("/v1/messages/{message_id}/approve"),
            admin,
        ))
        .await
        .expect("double approve");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "invalid_status_transition");

    let response = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/v1/projects/{project_id}/audit?limit=10"),
        ))
        .await
        .expect("audit");
    assert_eq!(response.status(), StatusCode::OK);
    let audit = read_json(response).await;
    let entries = audit["items"].as_array().expect("items");
    assert!(!entries.is_empty());
    // Newest first: the approval precedes the project creation in the list.
    assert_eq!(entries[0]["action"], "APPROVE");

    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/v1/projects/{project_id}/stats")))
        .await
        .expect("stats");
    assert_eq!(response.status(), StatusCode::OK);
    let stats = read_json(response).await;
    assert_eq!(stats["files"], 1);
    assert_eq!(stats["messages"], 1);
    assert_eq!(stats["members"], 1);
}

#[tokio::test]
async fn authorization_boundaries() {
    let app = app();
    let admin = Uuid::new_v4();
    let (_org_id, project_id) = setup_project(&app, admin).await;
    let file_id = create_file(&app, admin, &project_id).await;

    // Mutations require an actor identity.
    let response = app
        .clone()
        .oneshot(bare_request("POST", "/v1/organizations"))
        .await
        .expect("no actor");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let viewer = Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/members"),
            admin,
            serde_json::json!({ "user_id": viewer, "role": "VIEWER" }),
        ))
        .await
        .expect("viewer member");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/files/{file_id}/messages"),
            viewer,
            serde_json::json!({ "key": "farewell", "value": "Bye", "comment": null }),
        ))
        .await
        .expect("viewer create");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "forbidden");

    let outsider = Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/files/{file_id}/messages"),
            outsider,
            serde_json::json!({ "key": "farewell", "value": "Bye", "comment": null }),
        ))
        .await
        .expect("outsider create");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Editors write content but never review.
    let editor = Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/members"),
            admin,
            serde_json::json!({ "user_id": editor, "role": "EDITOR" }),
        ))
        .await
        .expect("editor member");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/files/{file_id}/messages"),
            editor,
            serde_json::json!({ "key": "farewell", "value": "Bye", "comment": null }),
        ))
        .await
        .expect("editor create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let message = read_json(response).await;
    let message_id = message["id"].as_str().expect("message id").to_string();

    let response = app
        .clone()
        .oneshot(actor_request(
            "POST",
            &format!("/v1/messages/{message_id}/approve"),
            editor,
        ))
        .await
        .expect("editor approve");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Duplicate keys within a file conflict.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/files/{file_id}/messages"),
            editor,
            serde_json::json!({ "key": "farewell", "value": "Adios", "comment": null }),
        ))
        .await
        .expect("duplicate key");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "already_exists");
}

#[tokio::test]
async fn last_lead_guard() {
    let app = app();
    let admin = Uuid::new_v4();
    let (_org_id, project_id) = setup_project(&app, admin).await;

    let lead = Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/members"),
            admin,
            serde_json::json!({ "user_id": lead, "role": "LEAD" }),
        ))
        .await
        .expect("lead member");
    assert_eq!(response.status(), StatusCode::CREATED);
    let member = read_json(response).await;
    let member_id = member["id"].as_str().expect("member id").to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/v1/projects/{project_id}/members/{member_id}"),
            admin,
            serde_json::json!({ "role": "EDITOR" }),
        ))
        .await
        .expect("demote lead");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "last_lead");

    let response = app
        .clone()
        .oneshot(actor_request(
            "DELETE",
            &format!("/v1/projects/{project_id}/members/{member_id}"),
            admin,
        ))
        .await
        .expect("remove lead");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A second lead lifts the restriction.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/v1/projects/{project_id}/members"),
            admin,
            serde_json::json!({ "user_id": Uuid::new_v4(), "role": "LEAD" }),
        ))
        .await
        .expect("second lead");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(actor_request(
            "DELETE",
            &format!("/v1/projects/{project_id}/members/{member_id}"),
            admin,
        ))
        .await
        .expect("remove first lead");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn system_endpoints_report_backend() {
    let app = app();

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/system/info"))
        .await
        .expect("info");
    assert_eq!(response.status(), StatusCode::OK);
    let info = read_json(response).await;
    assert_eq!(info["api_version"], "v1");
    assert_eq!(info["storage_backend"], "memory");
    assert_eq!(info["durable"], false);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/system/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let health = read_json(response).await;
    assert_eq!(health["status"], "ok");
}
