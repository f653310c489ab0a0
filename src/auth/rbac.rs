//! Role-based authorization gate.
//!
//! # Purpose and responsibility
//! Maps (project role, requested action) to allow/deny through one static
//! table. The gate is pure: no lookups, no side effects, safe to call before
//! any lock or transaction is taken.
//!
//! # Key invariants and assumptions
//! - `Role` and `Action` are closed enumerations; there is no string matching
//!   and no second role vocabulary anywhere in the codebase.
//! - Absence of a membership row means "no role" and denies every action;
//!   callers express that by passing `None` to [`require`].
use crate::model::Role;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mutating action gated by a project role.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    UpdateProject,
    DeleteProject,
    AddMember,
    UpdateMember,
    RemoveMember,
    CreateFile,
    UpdateFile,
    DeleteFile,
    CreateMessage,
    UpdateMessage,
    ReviewMessage,
    DeleteMessage,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::UpdateProject => "update_project",
            Action::DeleteProject => "delete_project",
            Action::AddMember => "add_member",
            Action::UpdateMember => "update_member",
            Action::RemoveMember => "remove_member",
            Action::CreateFile => "create_file",
            Action::UpdateFile => "update_file",
            Action::DeleteFile => "delete_file",
            Action::CreateMessage => "create_message",
            Action::UpdateMessage => "update_message",
            Action::ReviewMessage => "review_message",
            Action::DeleteMessage => "delete_message",
        };
        f.write_str(name)
    }
}

/// Decide whether `role` may perform `action`.
///
/// The table is deterministic: the same pair always yields the same answer,
/// independent of call order or any prior state.
pub fn authorize(role: Role, action: Action) -> bool {
    match action {
        Action::UpdateProject
        | Action::DeleteProject
        | Action::AddMember
        | Action::UpdateMember
        | Action::RemoveMember
        | Action::DeleteFile
        | Action::DeleteMessage => role == Role::Admin,
        Action::CreateFile
        | Action::UpdateFile
        | Action::CreateMessage
        | Action::UpdateMessage => role != Role::Viewer,
        Action::ReviewMessage => matches!(role, Role::Admin | Role::Lead),
    }
}

/// Gate helper for workflow code: `None` (no membership) denies everything.
pub fn require(role: Option<Role>, action: Action) -> Result<Role, StoreError> {
    match role {
        Some(role) if authorize(role, action) => Ok(role),
        _ => Err(StoreError::Unauthorized(action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Lead, Role::Editor, Role::Viewer];
    const ALL_ACTIONS: [Action; 12] = [
        Action::UpdateProject,
        Action::DeleteProject,
        Action::AddMember,
        Action::UpdateMember,
        Action::RemoveMember,
        Action::CreateFile,
        Action::UpdateFile,
        Action::DeleteFile,
        Action::CreateMessage,
        Action::UpdateMessage,
        Action::ReviewMessage,
        Action::DeleteMessage,
    ];

    #[test]
    fn admin_only_actions() {
        for action in [
            Action::UpdateProject,
            Action::DeleteProject,
            Action::AddMember,
            Action::UpdateMember,
            Action::RemoveMember,
            Action::DeleteFile,
            Action::DeleteMessage,
        ] {
            assert!(authorize(Role::Admin, action), "{action}");
            assert!(!authorize(Role::Lead, action), "{action}");
            assert!(!authorize(Role::Editor, action), "{action}");
            assert!(!authorize(Role::Viewer, action), "{action}");
        }
    }

    #[test]
    fn viewer_is_read_only() {
        for action in ALL_ACTIONS {
            assert!(!authorize(Role::Viewer, action), "{action}");
        }
    }

    #[test]
    fn editors_write_content_but_never_review() {
        for action in [
            Action::CreateFile,
            Action::UpdateFile,
            Action::CreateMessage,
            Action::UpdateMessage,
        ] {
            assert!(authorize(Role::Editor, action), "{action}");
            assert!(authorize(Role::Lead, action), "{action}");
        }
        assert!(!authorize(Role::Editor, Action::ReviewMessage));
        assert!(authorize(Role::Lead, Action::ReviewMessage));
        assert!(authorize(Role::Admin, Action::ReviewMessage));
    }

    #[test]
    fn table_is_deterministic_across_calls() {
        let first: Vec<bool> = ALL_ROLES
            .iter()
            .flat_map(|role| ALL_ACTIONS.iter().map(|action| authorize(*role, *action)))
            .collect();
        for _ in 0..3 {
            let again: Vec<bool> = ALL_ROLES
                .iter()
                .flat_map(|role| ALL_ACTIONS.iter().map(|action| authorize(*role, *action)))
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn missing_membership_denies() {
        for action in ALL_ACTIONS {
            let err = require(None, action).expect_err("no role");
            assert!(matches!(err, StoreError::Unauthorized(denied) if denied == action));
        }
    }
}
