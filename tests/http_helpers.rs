use axum::body::Body;
use axum::http::Request;
use uuid::Uuid;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("collect body");
    serde_json::from_slice(&body).expect("parse json")
}

pub fn json_request(method: &str, uri: &str, actor: Uuid, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-actor-id", actor.to_string())
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn actor_request(method: &str, uri: &str, actor: Uuid) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-actor-id", actor.to_string())
        .body(Body::empty())
        .expect("request")
}

pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}
