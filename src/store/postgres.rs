//! Postgres-backed implementation of the translation store.
//!
//! # Key invariants
//! - Uniqueness ((org, name), (project, language), (file, key), (project,
//!   user)) is enforced by database constraints; unique violations map to
//!   `StoreError::Conflict`.
//! - Every mutation runs in one transaction that couples the authoritative
//!   write with its audit append (and, for message updates, the version
//!   counter bump and snapshot insert). No partial state is ever committed.
//! - Cascade deletes are FK `ON DELETE CASCADE`; the application never
//!   deletes dependents row by row.
//!
//! # Concurrency model
//! - The store is shared across async handlers; `sqlx::PgPool` manages
//!   connection concurrency.
//! - `update_message` serializes concurrent updates to the same file by
//!   taking the file row lock (`UPDATE ... RETURNING`) before the snapshot
//!   read. Two racing updates therefore commit distinct version numbers and
//!   each snapshot observes the other's committed edit or runs entirely
//!   before it.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")`; if they
//!   fail the service fails startup instead of serving a partial schema.
//! - Database URLs may contain credentials; avoid logging them.
use super::{StoreError, StoreResult, TranslationStore};
use crate::auth::rbac::{require, Action};
use crate::config::PostgresConfig;
use crate::model::{
    AuditAction, AuditEntityType, AuditLog, ExportedMessage, FileExport, FilePatchRequest,
    MemberPatchRequest, Message, MessagePatchRequest, MessageSnapshot, MessageStatus,
    Organization, Project, ProjectMember, ProjectPatchRequest, ProjectStats, Role,
    TranslationFile, TranslationVersion,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Durable translation store backed by Postgres.
pub struct PostgresStore {
    pool: PgPool,
}

/// Row shapes are direct mappings of the SQL schema via `sqlx::FromRow`,
/// kept separate from domain types so schema details (string enums, BIGINT
/// counters) stay localized to this module.
#[derive(Debug, Clone, FromRow)]
struct DbOrganization {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbProject {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    description: Option<String>,
    created_by: Uuid,
    source_language: String,
    target_languages: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbMember {
    id: Uuid,
    project_id: Uuid,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbFile {
    id: Uuid,
    project_id: Uuid,
    created_by: Uuid,
    language_code: String,
    language_name: String,
    current_version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbMessage {
    id: Uuid,
    file_id: Uuid,
    created_by: Uuid,
    key: String,
    value: String,
    comment: Option<String>,
    status: String,
    reviewed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbVersion {
    id: Uuid,
    file_id: Uuid,
    created_by: Uuid,
    version_number: i64,
    snapshot: Value,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbAudit {
    id: Uuid,
    user_id: Option<Uuid>,
    project_id: Uuid,
    action: String,
    entity_type: String,
    entity_id: Uuid,
    details: Value,
    created_at: DateTime<Utc>,
}

impl PostgresStore {
    /// Connect to Postgres and run migrations before serving requests.
    ///
    /// Pool tuning matters here: `max_connections` protects the database
    /// from overload and `acquire_timeout` makes requests fail fast instead
    /// of hanging when the pool is exhausted.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

fn parse_role(value: &str) -> StoreResult<Role> {
    Role::from_str(value).map_err(|err| StoreError::Unexpected(anyhow!(err)))
}

fn parse_status(value: &str) -> StoreResult<MessageStatus> {
    MessageStatus::from_str(value).map_err(|err| StoreError::Unexpected(anyhow!(err)))
}

fn organization_from_db(row: DbOrganization) -> Organization {
    Organization {
        id: row.id,
        name: row.name,
        description: row.description,
        created_by: row.created_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn project_from_db(row: DbProject) -> Project {
    Project {
        id: row.id,
        organization_id: row.organization_id,
        name: row.name,
        description: row.description,
        created_by: row.created_by,
        source_language: row.source_language,
        target_languages: row.target_languages,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn member_from_db(row: DbMember) -> StoreResult<ProjectMember> {
    Ok(ProjectMember {
        id: row.id,
        project_id: row.project_id,
        user_id: row.user_id,
        role: parse_role(&row.role)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn file_from_db(row: DbFile) -> TranslationFile {
    TranslationFile {
        id: row.id,
        project_id: row.project_id,
        created_by: row.created_by,
        language_code: row.language_code,
        language_name: row.language_name,
        current_version: row.current_version as u32,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn message_from_db(row: DbMessage) -> StoreResult<Message> {
    Ok(Message {
        id: row.id,
        file_id: row.file_id,
        created_by: row.created_by,
        key: row.key,
        value: row.value,
        comment: row.comment,
        status: parse_status(&row.status)?,
        reviewed_by: row.reviewed_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn version_from_db(row: DbVersion) -> StoreResult<TranslationVersion> {
    let snapshot: BTreeMap<String, MessageSnapshot> = serde_json::from_value(row.snapshot)
        .map_err(|err| StoreError::Unexpected(anyhow!("invalid snapshot json: {err}")))?;
    Ok(TranslationVersion {
        id: row.id,
        file_id: row.file_id,
        created_by: row.created_by,
        version_number: row.version_number as u32,
        snapshot,
        created_at: row.created_at,
    })
}

fn audit_from_db(row: DbAudit) -> StoreResult<AuditLog> {
    Ok(AuditLog {
        id: row.id,
        user_id: row.user_id,
        project_id: row.project_id,
        action: AuditAction::from_str(&row.action)
            .map_err(|err| StoreError::Unexpected(anyhow!(err)))?,
        entity_type: AuditEntityType::from_str(&row.entity_type)
            .map_err(|err| StoreError::Unexpected(anyhow!(err)))?,
        entity_id: row.entity_id,
        details: row.details,
        created_at: row.created_at,
    })
}

/// Resolve the actor's role within the current transaction.
async fn role_in(
    conn: &mut PgConnection,
    project_id: Uuid,
    actor: Uuid,
) -> StoreResult<Option<Role>> {
    let role: Option<String> = sqlx::query_scalar(
        "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
    )
    .bind(project_id)
    .bind(actor)
    .fetch_optional(&mut *conn)
    .await?;
    role.as_deref().map(parse_role).transpose()
}

/// Append one audit row inside the caller's transaction.
async fn append_audit(
    conn: &mut PgConnection,
    actor: Uuid,
    project_id: Uuid,
    action: AuditAction,
    entity_type: AuditEntityType,
    entity_id: Uuid,
    details: Value,
) -> StoreResult<()> {
    sqlx::query(
        r#"INSERT INTO audit_log (id, user_id, project_id, action, entity_type, entity_id, details)
           VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(Uuid::new_v4())
    .bind(actor)
    .bind(project_id)
    .bind(action.to_string())
    .bind(entity_type.to_string())
    .bind(entity_id)
    .bind(details)
    .execute(&mut *conn)
    .await?;
    metrics::counter!("localehub_audit_entries_total").increment(1);
    Ok(())
}

/// Fetch a message row with a row lock, so status checks and updates in the
/// same transaction cannot race another writer.
async fn lock_message(conn: &mut PgConnection, message_id: Uuid) -> StoreResult<DbMessage> {
    sqlx::query_as::<_, DbMessage>(
        r#"SELECT id, file_id, created_by, key, value, comment, status, reviewed_by, created_at, updated_at
           FROM messages WHERE id = $1 FOR UPDATE"#,
    )
    .bind(message_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::NotFound("message".into()))
}

async fn file_project(conn: &mut PgConnection, file_id: Uuid) -> StoreResult<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT project_id FROM translation_files WHERE id = $1")
        .bind(file_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StoreError::NotFound("translation file".into()))
}

const SELECT_PROJECT: &str = r#"SELECT id, organization_id, name, description, created_by,
       source_language, target_languages, created_at, updated_at
       FROM projects"#;

const SELECT_FILE: &str = r#"SELECT id, project_id, created_by, language_code, language_name,
       current_version, created_at, updated_at
       FROM translation_files"#;

const SELECT_MESSAGE: &str = r#"SELECT id, file_id, created_by, key, value, comment, status,
       reviewed_by, created_at, updated_at
       FROM messages"#;

#[async_trait]
impl TranslationStore for PostgresStore {
    async fn create_organization(&self, org: Organization) -> StoreResult<Organization> {
        let insert = sqlx::query(
            r#"INSERT INTO organizations (id, name, description, created_by, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(org.id)
        .bind(&org.name)
        .bind(&org.description)
        .bind(org.created_by)
        .bind(org.created_at)
        .bind(org.updated_at)
        .execute(&self.pool)
        .await;
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::Conflict("organization exists".into()));
            }
            return Err(StoreError::Unexpected(err.into()));
        }
        Ok(org)
    }

    async fn get_organization(&self, org_id: Uuid) -> StoreResult<Organization> {
        let row = sqlx::query_as::<_, DbOrganization>(
            r#"SELECT id, name, description, created_by, created_at, updated_at
               FROM organizations WHERE id = $1"#,
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("organization".into()))?;
        Ok(organization_from_db(row))
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, DbOrganization>(
            r#"SELECT id, name, description, created_by, created_at, updated_at
               FROM organizations ORDER BY created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(organization_from_db).collect())
    }

    /// Project creation, creator enrollment as admin, and the audit row are
    /// one commit; a duplicate name rolls all three back.
    async fn create_project(&self, actor: Uuid, project: Project) -> StoreResult<Project> {
        let mut tx = self.pool.begin().await?;
        let org_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations WHERE id = $1")
                .bind(project.organization_id)
                .fetch_one(&mut *tx)
                .await?
                > 0;
        if !org_exists {
            return Err(StoreError::NotFound("organization".into()));
        }
        let insert = sqlx::query(
            r#"INSERT INTO projects (id, organization_id, name, description, created_by,
                   source_language, target_languages, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(project.id)
        .bind(project.organization_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_by)
        .bind(&project.source_language)
        .bind(&project.target_languages)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&mut *tx)
        .await;
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::Conflict(
                    "project name exists in organization".into(),
                ));
            }
            return Err(StoreError::Unexpected(err.into()));
        }
        sqlx::query(
            r#"INSERT INTO project_members (id, project_id, user_id, role)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(Uuid::new_v4())
        .bind(project.id)
        .bind(actor)
        .bind(Role::Admin.to_string())
        .execute(&mut *tx)
        .await?;
        append_audit(
            &mut tx,
            actor,
            project.id,
            AuditAction::Create,
            AuditEntityType::Project,
            project.id,
            serde_json::json!({ "name": project.name }),
        )
        .await?;
        tx.commit().await?;
        metrics::counter!("localehub_projects_created_total").increment(1);
        Ok(project)
    }

    async fn get_project(&self, project_id: Uuid) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, DbProject>(&format!("{SELECT_PROJECT} WHERE id = $1"))
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("project".into()))?;
        Ok(project_from_db(row))
    }

    async fn list_projects(&self, org_id: Uuid) -> StoreResult<Vec<Project>> {
        let org_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations WHERE id = $1")
                .bind(org_id)
                .fetch_one(&self.pool)
                .await?
                > 0;
        if !org_exists {
            return Err(StoreError::NotFound("organization".into()));
        }
        let rows = sqlx::query_as::<_, DbProject>(&format!(
            "{SELECT_PROJECT} WHERE organization_id = $1 ORDER BY created_at"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(project_from_db).collect())
    }

    async fn update_project(
        &self,
        actor: Uuid,
        project_id: Uuid,
        patch: ProjectPatchRequest,
    ) -> StoreResult<Project> {
        let mut tx = self.pool.begin().await?;
        let current = sqlx::query_as::<_, DbProject>(&format!(
            "{SELECT_PROJECT} WHERE id = $1 FOR UPDATE"
        ))
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound("project".into()))?;
        require(role_in(&mut tx, project_id, actor).await?, Action::UpdateProject)?;

        let mut changed: Vec<&str> = Vec::new();
        if patch.name.is_some() {
            changed.push("name");
        }
        if patch.description.is_some() {
            changed.push("description");
        }
        if patch.source_language.is_some() {
            changed.push("source_language");
        }
        if patch.target_languages.is_some() {
            changed.push("target_languages");
        }
        let name = patch.name.unwrap_or(current.name);
        let description = patch.description.or(current.description);
        let source_language = patch.source_language.unwrap_or(current.source_language);
        let target_languages = patch.target_languages.unwrap_or(current.target_languages);

        let update = sqlx::query_as::<_, DbProject>(&format!(
            r#"UPDATE projects
               SET name = $2, description = $3, source_language = $4, target_languages = $5,
                   updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, organization_id, name, description, created_by, source_language, \
                       target_languages, created_at, updated_at"
        ))
        .bind(project_id)
        .bind(&name)
        .bind(&description)
        .bind(&source_language)
        .bind(&target_languages)
        .fetch_one(&mut *tx)
        .await;
        let row = match update {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict(
                    "project name exists in organization".into(),
                ));
            }
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::Project,
            project_id,
            serde_json::json!({ "fields": changed }),
        )
        .await?;
        tx.commit().await?;
        Ok(project_from_db(row))
    }

    async fn delete_project(&self, actor: Uuid, project_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        require(role_in(&mut tx, project_id, actor).await?, Action::DeleteProject)?;
        // FKs cascade members, files, messages, versions and the audit trail.
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn project_stats(&self, project_id: Uuid) -> StoreResult<ProjectStats> {
        let name: String = sqlx::query_scalar("SELECT name FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("project".into()))?;
        let files: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM translation_files WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;
        let messages: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM messages m
               JOIN translation_files f ON f.id = m.file_id
               WHERE f.project_id = $1"#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;
        let members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(ProjectStats {
            project_id,
            name,
            files: files as u64,
            messages: messages as u64,
            members: members as u64,
        })
    }

    async fn list_audit_log(&self, project_id: Uuid, limit: u32) -> StoreResult<Vec<AuditLog>> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        let rows = sqlx::query_as::<_, DbAudit>(
            r#"SELECT id, user_id, project_id, action, entity_type, entity_id, details, created_at
               FROM audit_log WHERE project_id = $1
               ORDER BY created_at DESC, id
               LIMIT $2"#,
        )
        .bind(project_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(audit_from_db).collect()
    }

    async fn add_member(
        &self,
        actor: Uuid,
        project_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> StoreResult<ProjectMember> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        require(role_in(&mut tx, project_id, actor).await?, Action::AddMember)?;
        let insert = sqlx::query_as::<_, DbMember>(
            r#"INSERT INTO project_members (id, project_id, user_id, role)
               VALUES ($1, $2, $3, $4)
               RETURNING id, project_id, user_id, role, created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(user_id)
        .bind(role.to_string())
        .fetch_one(&mut *tx)
        .await;
        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("membership exists".into()));
            }
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::ProjectMember,
            row.id,
            serde_json::json!({ "user_id": user_id, "role": role.to_string() }),
        )
        .await?;
        tx.commit().await?;
        member_from_db(row)
    }

    async fn list_members(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        let rows = sqlx::query_as::<_, DbMember>(
            r#"SELECT id, project_id, user_id, role, created_at, updated_at
               FROM project_members WHERE project_id = $1 ORDER BY created_at"#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(member_from_db).collect()
    }

    async fn update_member_role(
        &self,
        actor: Uuid,
        project_id: Uuid,
        member_id: Uuid,
        patch: MemberPatchRequest,
    ) -> StoreResult<ProjectMember> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        require(role_in(&mut tx, project_id, actor).await?, Action::UpdateMember)?;
        let current = sqlx::query_as::<_, DbMember>(
            r#"SELECT id, project_id, user_id, role, created_at, updated_at
               FROM project_members WHERE id = $1 AND project_id = $2 FOR UPDATE"#,
        )
        .bind(member_id)
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound("project member".into()))?;
        let current_role = parse_role(&current.role)?;
        // Demoting the only lead would leave the project without one.
        if current_role == Role::Lead && patch.role != Role::Lead {
            let leads: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM project_members WHERE project_id = $1 AND role = $2",
            )
            .bind(project_id)
            .bind(Role::Lead.to_string())
            .fetch_one(&mut *tx)
            .await?;
            if leads == 1 {
                return Err(StoreError::LastLead);
            }
        }
        let row = sqlx::query_as::<_, DbMember>(
            r#"UPDATE project_members SET role = $2, updated_at = now()
               WHERE id = $1
               RETURNING id, project_id, user_id, role, created_at, updated_at"#,
        )
        .bind(member_id)
        .bind(patch.role.to_string())
        .fetch_one(&mut *tx)
        .await?;
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::ProjectMember,
            member_id,
            serde_json::json!({ "role": patch.role.to_string() }),
        )
        .await?;
        tx.commit().await?;
        member_from_db(row)
    }

    async fn remove_member(
        &self,
        actor: Uuid,
        project_id: Uuid,
        member_id: Uuid,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        require(role_in(&mut tx, project_id, actor).await?, Action::RemoveMember)?;
        let member = sqlx::query_as::<_, DbMember>(
            r#"SELECT id, project_id, user_id, role, created_at, updated_at
               FROM project_members WHERE id = $1 AND project_id = $2 FOR UPDATE"#,
        )
        .bind(member_id)
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound("project member".into()))?;
        if parse_role(&member.role)? == Role::Lead {
            let leads: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM project_members WHERE project_id = $1 AND role = $2",
            )
            .bind(project_id)
            .bind(Role::Lead.to_string())
            .fetch_one(&mut *tx)
            .await?;
            if leads == 1 {
                return Err(StoreError::LastLead);
            }
        }
        sqlx::query("DELETE FROM project_members WHERE id = $1")
            .bind(member_id)
            .execute(&mut *tx)
            .await?;
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Delete,
            AuditEntityType::ProjectMember,
            member_id,
            serde_json::json!({ "user_id": member.user_id, "role": member.role }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_file(
        &self,
        actor: Uuid,
        project_id: Uuid,
        language_code: String,
        language_name: String,
    ) -> StoreResult<TranslationFile> {
        let mut tx = self.pool.begin().await?;
        let targets: Vec<String> = sqlx::query_scalar::<_, Vec<String>>(
            "SELECT target_languages FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound("project".into()))?;
        require(role_in(&mut tx, project_id, actor).await?, Action::CreateFile)?;
        if !targets.contains(&language_code) {
            return Err(StoreError::Validation(format!(
                "language {language_code} is not among the project's target languages"
            )));
        }
        let insert = sqlx::query_as::<_, DbFile>(&format!(
            r#"INSERT INTO translation_files (id, project_id, created_by, language_code, language_name)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, project_id, created_by, language_code, language_name, \
                       current_version, created_at, updated_at"
        ))
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(actor)
        .bind(&language_code)
        .bind(&language_name)
        .fetch_one(&mut *tx)
        .await;
        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("language file exists in project".into()));
            }
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::TranslationFile,
            row.id,
            serde_json::json!({ "language_code": language_code }),
        )
        .await?;
        tx.commit().await?;
        Ok(file_from_db(row))
    }

    async fn get_file(&self, file_id: Uuid) -> StoreResult<TranslationFile> {
        let row = sqlx::query_as::<_, DbFile>(&format!("{SELECT_FILE} WHERE id = $1"))
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("translation file".into()))?;
        Ok(file_from_db(row))
    }

    async fn list_files(&self, project_id: Uuid) -> StoreResult<Vec<TranslationFile>> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?
            > 0;
        if !exists {
            return Err(StoreError::NotFound("project".into()));
        }
        let rows = sqlx::query_as::<_, DbFile>(&format!(
            "{SELECT_FILE} WHERE project_id = $1 ORDER BY language_code"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(file_from_db).collect())
    }

    async fn update_file(
        &self,
        actor: Uuid,
        file_id: Uuid,
        patch: FilePatchRequest,
    ) -> StoreResult<TranslationFile> {
        let mut tx = self.pool.begin().await?;
        let project_id = file_project(&mut tx, file_id).await?;
        require(role_in(&mut tx, project_id, actor).await?, Action::UpdateFile)?;
        let row = sqlx::query_as::<_, DbFile>(&format!(
            r#"UPDATE translation_files
               SET language_name = COALESCE($2, language_name), updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, project_id, created_by, language_code, language_name, \
                       current_version, created_at, updated_at"
        ))
        .bind(file_id)
        .bind(&patch.language_name)
        .fetch_one(&mut *tx)
        .await?;
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::TranslationFile,
            file_id,
            serde_json::json!({ "language_name": row.language_name }),
        )
        .await?;
        tx.commit().await?;
        Ok(file_from_db(row))
    }

    async fn delete_file(&self, actor: Uuid, file_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let file = sqlx::query_as::<_, DbFile>(&format!("{SELECT_FILE} WHERE id = $1 FOR UPDATE"))
            .bind(file_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound("translation file".into()))?;
        require(role_in(&mut tx, file.project_id, actor).await?, Action::DeleteFile)?;
        // FKs cascade the file's messages and versions.
        sqlx::query("DELETE FROM translation_files WHERE id = $1")
            .bind(file_id)
            .execute(&mut *tx)
            .await?;
        append_audit(
            &mut tx,
            actor,
            file.project_id,
            AuditAction::Delete,
            AuditEntityType::TranslationFile,
            file_id,
            serde_json::json!({ "language_code": file.language_code }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn export_file(&self, file_id: Uuid) -> StoreResult<FileExport> {
        let file = self.get_file(file_id).await?;
        let rows = sqlx::query_as::<_, DbMessage>(&format!(
            "{SELECT_MESSAGE} WHERE file_id = $1 ORDER BY key"
        ))
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        let messages = rows
            .into_iter()
            .map(|row| {
                Ok(ExportedMessage {
                    status: parse_status(&row.status)?,
                    key: row.key,
                    value: row.value,
                    comment: row.comment,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(FileExport {
            language_code: file.language_code,
            language_name: file.language_name,
            version: file.current_version,
            messages,
            exported_at: Utc::now(),
        })
    }

    async fn version_history(&self, file_id: Uuid) -> StoreResult<Vec<TranslationVersion>> {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM translation_files WHERE id = $1")
                .bind(file_id)
                .fetch_one(&self.pool)
                .await?
                > 0;
        if !exists {
            return Err(StoreError::NotFound("translation file".into()));
        }
        let rows = sqlx::query_as::<_, DbVersion>(
            r#"SELECT id, file_id, created_by, version_number, snapshot, created_at
               FROM translation_versions WHERE file_id = $1 ORDER BY version_number"#,
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(version_from_db).collect()
    }

    async fn create_message(
        &self,
        actor: Uuid,
        file_id: Uuid,
        key: String,
        value: String,
        comment: Option<String>,
    ) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;
        let project_id = file_project(&mut tx, file_id).await?;
        require(role_in(&mut tx, project_id, actor).await?, Action::CreateMessage)?;
        let insert = sqlx::query_as::<_, DbMessage>(&format!(
            r#"INSERT INTO messages (id, file_id, created_by, key, value, comment)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, file_id, created_by, key, value, comment, status, reviewed_by, \
                       created_at, updated_at"
        ))
        .bind(Uuid::new_v4())
        .bind(file_id)
        .bind(actor)
        .bind(&key)
        .bind(&value)
        .bind(&comment)
        .fetch_one(&mut *tx)
        .await;
        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict("message key exists in file".into()));
            }
            Err(err) => return Err(StoreError::Unexpected(err.into())),
        };
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::Message,
            row.id,
            serde_json::json!({ "key": key }),
        )
        .await?;
        tx.commit().await?;
        message_from_db(row)
    }

    async fn get_message(&self, message_id: Uuid) -> StoreResult<Message> {
        let row = sqlx::query_as::<_, DbMessage>(&format!("{SELECT_MESSAGE} WHERE id = $1"))
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("message".into()))?;
        message_from_db(row)
    }

    async fn list_messages(
        &self,
        file_id: Uuid,
        status: Option<MessageStatus>,
    ) -> StoreResult<Vec<Message>> {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM translation_files WHERE id = $1")
                .bind(file_id)
                .fetch_one(&self.pool)
                .await?
                > 0;
        if !exists {
            return Err(StoreError::NotFound("translation file".into()));
        }
        let rows = sqlx::query_as::<_, DbMessage>(&format!(
            r#"{SELECT_MESSAGE} WHERE file_id = $1 AND ($2::text IS NULL OR status = $2)
               ORDER BY key"#
        ))
        .bind(file_id)
        .bind(status.map(|s| s.to_string()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(message_from_db).collect()
    }

    /// The versioning core. One transaction covers all six steps; the file
    /// row lock taken by `UPDATE ... RETURNING` serializes concurrent updates
    /// to the same file, so version numbers never collide and every snapshot
    /// read happens after the counter bump it belongs to.
    async fn update_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        patch: MessagePatchRequest,
    ) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;
        let current = lock_message(&mut tx, message_id).await?;
        let project_id = file_project(&mut tx, current.file_id).await?;
        require(role_in(&mut tx, project_id, actor).await?, Action::UpdateMessage)?;

        let row = sqlx::query_as::<_, DbMessage>(&format!(
            r#"UPDATE messages SET value = $2, comment = $3, updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, file_id, created_by, key, value, comment, status, reviewed_by, \
                       created_at, updated_at"
        ))
        .bind(message_id)
        .bind(&patch.value)
        .bind(&patch.comment)
        .fetch_one(&mut *tx)
        .await?;

        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": row.key, "value": patch.value }),
        )
        .await?;

        // Locks the file row for the rest of the transaction.
        let version_number: i64 = sqlx::query_scalar(
            r#"UPDATE translation_files
               SET current_version = current_version + 1, updated_at = now()
               WHERE id = $1
               RETURNING current_version"#,
        )
        .bind(current.file_id)
        .fetch_one(&mut *tx)
        .await?;

        // Complete snapshot of the file, including this transaction's write.
        let message_rows = sqlx::query_as::<_, DbMessage>(&format!(
            "{SELECT_MESSAGE} WHERE file_id = $1"
        ))
        .bind(current.file_id)
        .fetch_all(&mut *tx)
        .await?;
        let mut snapshot: BTreeMap<String, MessageSnapshot> = BTreeMap::new();
        for m in message_rows {
            snapshot.insert(
                m.key,
                MessageSnapshot {
                    value: m.value,
                    status: parse_status(&m.status)?,
                    comment: m.comment,
                },
            );
        }
        let snapshot_json = serde_json::to_value(&snapshot)
            .map_err(|err| StoreError::Unexpected(anyhow!("snapshot encode: {err}")))?;

        let version_id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO translation_versions (id, file_id, created_by, version_number, snapshot)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(version_id)
        .bind(current.file_id)
        .bind(actor)
        .bind(version_number)
        .bind(snapshot_json)
        .execute(&mut *tx)
        .await?;

        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::TranslationVersion,
            version_id,
            serde_json::json!({ "version_number": version_number }),
        )
        .await?;

        tx.commit().await?;
        metrics::counter!("localehub_versions_written_total").increment(1);
        message_from_db(row)
    }

    async fn approve_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<Message> {
        self.review_message(actor, message_id, MessageStatus::Approved, None)
            .await
    }

    async fn reject_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        reason: Option<String>,
    ) -> StoreResult<Message> {
        self.review_message(actor, message_id, MessageStatus::Rejected, reason)
            .await
    }

    async fn delete_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let message = lock_message(&mut tx, message_id).await?;
        let project_id = file_project(&mut tx, message.file_id).await?;
        require(role_in(&mut tx, project_id, actor).await?, Action::DeleteMessage)?;
        sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id)
            .execute(&mut *tx)
            .await?;
        // Capture the key so the trail stays meaningful after the row is gone.
        append_audit(
            &mut tx,
            actor,
            project_id,
            AuditAction::Delete,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": message.key }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

impl PostgresStore {
    /// Shared review path. The row lock taken by `lock_message` makes the
    /// status check and the update one atomic step.
    async fn review_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        to: MessageStatus,
        reason: Option<String>,
    ) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;
        let current = lock_message(&mut tx, message_id).await?;
        let project_id = file_project(&mut tx, current.file_id).await?;
        require(role_in(&mut tx, project_id, actor).await?, Action::ReviewMessage)?;
        let from = parse_status(&current.status)?;
        if from != MessageStatus::Pending {
            return Err(StoreError::InvalidStatusTransition { from, to });
        }
        let row = sqlx::query_as::<_, DbMessage>(&format!(
            r#"UPDATE messages SET status = $2, reviewed_by = $3, updated_at = now()
               WHERE id = $1
               RETURNING {COLUMNS}"#,
            COLUMNS = "id, file_id, created_by, key, value, comment, status, reviewed_by, \
                       created_at, updated_at"
        ))
        .bind(message_id)
        .bind(to.to_string())
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;
        let (action, details) = match to {
            MessageStatus::Approved => (
                AuditAction::Approve,
                serde_json::json!({ "key": row.key }),
            ),
            _ => (
                AuditAction::Reject,
                serde_json::json!({ "key": row.key, "reason": reason }),
            ),
        };
        append_audit(
            &mut tx,
            actor,
            project_id,
            action,
            AuditEntityType::Message,
            message_id,
            details,
        )
        .await?;
        tx.commit().await?;
        message_from_db(row)
    }
}
