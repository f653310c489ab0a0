//! Project membership model and the closed role vocabulary.
//!
//! # Purpose
//! A member binds a user to exactly one role within a project; the (project,
//! user) pair is unique. `Role` is the single closed enumeration consulted by
//! every authorization check; there is no second vocabulary anywhere.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Project role, ordered ADMIN > LEAD > EDITOR > VIEWER.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Lead,
    Editor,
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Lead => "LEAD",
            Role::Editor => "EDITOR",
            Role::Viewer => "VIEWER",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Role::Admin),
            "LEAD" => Ok(Role::Lead),
            "EDITOR" => Ok(Role::Editor),
            "VIEWER" => Ok(Role::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProjectMember {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MemberPatchRequest {
    pub role: Role,
}
