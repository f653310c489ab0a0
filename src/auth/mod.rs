//! Request identity and the authorization gate.
//!
//! Identity arrives as an opaque user id in the `x-actor-id` header; token
//! verification happens upstream of this service. The [`Actor`] extractor
//! rejects requests without a parseable id so handlers always have one.
pub mod rbac;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::types::ErrorResponse;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Authenticated caller identity for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok());
        match header.map(Uuid::parse_str) {
            Some(Ok(user_id)) => Ok(Actor { user_id }),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    code: "unauthenticated".to_string(),
                    message: format!("missing or malformed {ACTOR_HEADER} header"),
                    request_id: None,
                }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_actor_from_header() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .header(ACTOR_HEADER, id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.user_id, id);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let rejection = Actor::from_request_parts(&mut parts, &())
            .await
            .expect_err("no header");
        assert_eq!(rejection.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_malformed_id() {
        let request = Request::builder()
            .header(ACTOR_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let rejection = Actor::from_request_parts(&mut parts, &())
            .await
            .expect_err("bad uuid");
        assert_eq!(rejection.0, StatusCode::UNAUTHORIZED);
    }
}
