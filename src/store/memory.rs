//! In-memory implementation of the translation store.
//!
//! # Purpose
//! Implements `TranslationStore` entirely in memory using `HashMap`s guarded
//! by a single `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: one lock covers every map, so each
//!   workflow (role check, mutation, audit append, version snapshot) runs as
//!   one atomic section. The message update workflow touches four entity maps
//!   at once; per-map locks could expose intermediate state between them.
//! - **No multi-node coordination**: multiple instances each have
//!   independent state.
//!
//! # Cascading deletes
//! Deleting a project removes its members, files, messages, versions and
//! audit rows by scanning; deleting a file removes its messages and versions.
//! Durable backends implement the same cascades via SQL constraints.
//!
//! # Metrics
//! The store updates a small set of gauges/counters to keep observability
//! behavior consistent with durable backends.
use super::{StoreError, StoreResult, TranslationStore};
use crate::auth::rbac::{require, Action};
use crate::model::{
    AuditAction, AuditEntityType, AuditLog, ExportedMessage, FileExport, FilePatchRequest,
    MemberPatchRequest, Message, MessagePatchRequest, MessageSnapshot, MessageStatus,
    Organization, Project, ProjectMember, ProjectPatchRequest, ProjectStats, Role,
    TranslationFile, TranslationVersion,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Authoritative state behind one lock.
///
/// Workflows that span several entity types (message update, cascades,
/// last-lead checks) take a single write guard over the whole struct, which
/// is what makes each of them all-or-nothing in this backend.
#[derive(Default)]
struct State {
    organizations: HashMap<Uuid, Organization>,
    projects: HashMap<Uuid, Project>,
    members: HashMap<Uuid, ProjectMember>,
    files: HashMap<Uuid, TranslationFile>,
    messages: HashMap<Uuid, Message>,
    versions: HashMap<Uuid, TranslationVersion>,
    audit: Vec<AuditLog>,
}

impl State {
    /// Resolve the actor's role in a project; `None` means no membership.
    fn role_of(&self, project_id: Uuid, user_id: Uuid) -> Option<Role> {
        self.members
            .values()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .map(|m| m.role)
    }

    fn project(&self, project_id: Uuid) -> StoreResult<&Project> {
        self.projects
            .get(&project_id)
            .ok_or_else(|| StoreError::NotFound("project".into()))
    }

    fn file(&self, file_id: Uuid) -> StoreResult<&TranslationFile> {
        self.files
            .get(&file_id)
            .ok_or_else(|| StoreError::NotFound("translation file".into()))
    }

    fn message(&self, message_id: Uuid) -> StoreResult<&Message> {
        self.messages
            .get(&message_id)
            .ok_or_else(|| StoreError::NotFound("message".into()))
    }

    fn record_audit(
        &mut self,
        user_id: Uuid,
        project_id: Uuid,
        action: AuditAction,
        entity_type: AuditEntityType,
        entity_id: Uuid,
        details: serde_json::Value,
    ) {
        self.audit.push(AuditLog {
            id: Uuid::new_v4(),
            user_id: Some(user_id),
            project_id,
            action,
            entity_type,
            entity_id,
            details,
            created_at: Utc::now(),
        });
        metrics::counter!("localehub_audit_entries_total").increment(1);
    }

    /// Complete point-in-time copy of every message in the file.
    fn snapshot_of(&self, file_id: Uuid) -> BTreeMap<String, MessageSnapshot> {
        self.messages
            .values()
            .filter(|m| m.file_id == file_id)
            .map(|m| {
                (
                    m.key.clone(),
                    MessageSnapshot {
                        value: m.value.clone(),
                        status: m.status,
                        comment: m.comment.clone(),
                    },
                )
            })
            .collect()
    }

    fn lead_count(&self, project_id: Uuid) -> usize {
        self.members
            .values()
            .filter(|m| m.project_id == project_id && m.role == Role::Lead)
            .count()
    }

    /// Remove a file's messages and versions. Caller removes the file row.
    fn cascade_file(&mut self, file_id: Uuid) {
        self.messages.retain(|_, m| m.file_id != file_id);
        self.versions.retain(|_, v| v.file_id != file_id);
    }
}

/// In-memory translation store. Cloneable and shareable across handlers.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslationStore for InMemoryStore {
    async fn create_organization(&self, org: Organization) -> StoreResult<Organization> {
        let mut state = self.state.write().await;
        if state.organizations.contains_key(&org.id) {
            return Err(StoreError::Conflict("organization exists".into()));
        }
        state.organizations.insert(org.id, org.clone());
        Ok(org)
    }

    async fn get_organization(&self, org_id: Uuid) -> StoreResult<Organization> {
        let state = self.state.read().await;
        state
            .organizations
            .get(&org_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("organization".into()))
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let state = self.state.read().await;
        let mut items: Vec<_> = state.organizations.values().cloned().collect();
        items.sort_by_key(|o| o.created_at);
        Ok(items)
    }

    async fn create_project(&self, actor: Uuid, project: Project) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&project.organization_id) {
            return Err(StoreError::NotFound("organization".into()));
        }
        let duplicate = state
            .projects
            .values()
            .any(|p| p.organization_id == project.organization_id && p.name == project.name);
        if duplicate {
            return Err(StoreError::Conflict(
                "project name exists in organization".into(),
            ));
        }
        state.projects.insert(project.id, project.clone());
        // The creator is the project's first member and its first admin.
        let now = Utc::now();
        let member = ProjectMember {
            id: Uuid::new_v4(),
            project_id: project.id,
            user_id: actor,
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        };
        state.members.insert(member.id, member);
        state.record_audit(
            actor,
            project.id,
            AuditAction::Create,
            AuditEntityType::Project,
            project.id,
            serde_json::json!({ "name": project.name }),
        );
        metrics::gauge!("localehub_projects_total").set(state.projects.len() as f64);
        Ok(project)
    }

    async fn get_project(&self, project_id: Uuid) -> StoreResult<Project> {
        let state = self.state.read().await;
        state.project(project_id).cloned()
    }

    async fn list_projects(&self, org_id: Uuid) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        if !state.organizations.contains_key(&org_id) {
            return Err(StoreError::NotFound("organization".into()));
        }
        let mut items: Vec<_> = state
            .projects
            .values()
            .filter(|p| p.organization_id == org_id)
            .cloned()
            .collect();
        items.sort_by_key(|p| p.created_at);
        Ok(items)
    }

    async fn update_project(
        &self,
        actor: Uuid,
        project_id: Uuid,
        patch: ProjectPatchRequest,
    ) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        let current = state.project(project_id)?.clone();
        require(state.role_of(project_id, actor), Action::UpdateProject)?;
        if let Some(name) = &patch.name {
            let duplicate = state.projects.values().any(|p| {
                p.organization_id == current.organization_id && p.name == *name && p.id != project_id
            });
            if duplicate {
                return Err(StoreError::Conflict(
                    "project name exists in organization".into(),
                ));
            }
        }
        let mut changed: Vec<&str> = Vec::new();
        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| StoreError::NotFound("project".into()))?;
        if let Some(name) = patch.name {
            project.name = name;
            changed.push("name");
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
            changed.push("description");
        }
        if let Some(source_language) = patch.source_language {
            project.source_language = source_language;
            changed.push("source_language");
        }
        if let Some(target_languages) = patch.target_languages {
            project.target_languages = target_languages;
            changed.push("target_languages");
        }
        project.updated_at = Utc::now();
        let updated = project.clone();
        state.record_audit(
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::Project,
            project_id,
            serde_json::json!({ "fields": changed }),
        );
        Ok(updated)
    }

    async fn delete_project(&self, actor: Uuid, project_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.project(project_id)?;
        require(state.role_of(project_id, actor), Action::DeleteProject)?;
        state.projects.remove(&project_id);
        state.members.retain(|_, m| m.project_id != project_id);
        let file_ids: Vec<Uuid> = state
            .files
            .values()
            .filter(|f| f.project_id == project_id)
            .map(|f| f.id)
            .collect();
        for file_id in file_ids {
            state.cascade_file(file_id);
            state.files.remove(&file_id);
        }
        // The project's audit trail goes with it, mirroring the FK cascade.
        state.audit.retain(|a| a.project_id != project_id);
        metrics::gauge!("localehub_projects_total").set(state.projects.len() as f64);
        metrics::gauge!("localehub_files_total").set(state.files.len() as f64);
        metrics::gauge!("localehub_messages_total").set(state.messages.len() as f64);
        Ok(())
    }

    async fn project_stats(&self, project_id: Uuid) -> StoreResult<ProjectStats> {
        let state = self.state.read().await;
        let project = state.project(project_id)?;
        let file_ids: Vec<Uuid> = state
            .files
            .values()
            .filter(|f| f.project_id == project_id)
            .map(|f| f.id)
            .collect();
        let messages = state
            .messages
            .values()
            .filter(|m| file_ids.contains(&m.file_id))
            .count() as u64;
        let members = state
            .members
            .values()
            .filter(|m| m.project_id == project_id)
            .count() as u64;
        Ok(ProjectStats {
            project_id,
            name: project.name.clone(),
            files: file_ids.len() as u64,
            messages,
            members,
        })
    }

    async fn list_audit_log(&self, project_id: Uuid, limit: u32) -> StoreResult<Vec<AuditLog>> {
        let state = self.state.read().await;
        state.project(project_id)?;
        let mut items: Vec<_> = state
            .audit
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        // Newest first; ties broken by append order, which the Vec preserves.
        items.reverse();
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn add_member(
        &self,
        actor: Uuid,
        project_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> StoreResult<ProjectMember> {
        let mut state = self.state.write().await;
        state.project(project_id)?;
        require(state.role_of(project_id, actor), Action::AddMember)?;
        let duplicate = state
            .members
            .values()
            .any(|m| m.project_id == project_id && m.user_id == user_id);
        if duplicate {
            return Err(StoreError::Conflict("membership exists".into()));
        }
        let now = Utc::now();
        let member = ProjectMember {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        };
        state.members.insert(member.id, member.clone());
        state.record_audit(
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::ProjectMember,
            member.id,
            serde_json::json!({ "user_id": user_id, "role": role.to_string() }),
        );
        Ok(member)
    }

    async fn list_members(&self, project_id: Uuid) -> StoreResult<Vec<ProjectMember>> {
        let state = self.state.read().await;
        state.project(project_id)?;
        let mut items: Vec<_> = state
            .members
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        items.sort_by_key(|m| m.created_at);
        Ok(items)
    }

    async fn update_member_role(
        &self,
        actor: Uuid,
        project_id: Uuid,
        member_id: Uuid,
        patch: MemberPatchRequest,
    ) -> StoreResult<ProjectMember> {
        let mut state = self.state.write().await;
        state.project(project_id)?;
        require(state.role_of(project_id, actor), Action::UpdateMember)?;
        let current = state
            .members
            .get(&member_id)
            .filter(|m| m.project_id == project_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("project member".into()))?;
        // Demoting the only lead would leave the project without one.
        if current.role == Role::Lead
            && patch.role != Role::Lead
            && state.lead_count(project_id) == 1
        {
            return Err(StoreError::LastLead);
        }
        let member = state
            .members
            .get_mut(&member_id)
            .ok_or_else(|| StoreError::NotFound("project member".into()))?;
        member.role = patch.role;
        member.updated_at = Utc::now();
        let updated = member.clone();
        state.record_audit(
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::ProjectMember,
            member_id,
            serde_json::json!({ "role": patch.role.to_string() }),
        );
        Ok(updated)
    }

    async fn remove_member(
        &self,
        actor: Uuid,
        project_id: Uuid,
        member_id: Uuid,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.project(project_id)?;
        require(state.role_of(project_id, actor), Action::RemoveMember)?;
        let member = state
            .members
            .get(&member_id)
            .filter(|m| m.project_id == project_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("project member".into()))?;
        if member.role == Role::Lead && state.lead_count(project_id) == 1 {
            return Err(StoreError::LastLead);
        }
        state.members.remove(&member_id);
        state.record_audit(
            actor,
            project_id,
            AuditAction::Delete,
            AuditEntityType::ProjectMember,
            member_id,
            serde_json::json!({ "user_id": member.user_id, "role": member.role.to_string() }),
        );
        Ok(())
    }

    async fn create_file(
        &self,
        actor: Uuid,
        project_id: Uuid,
        language_code: String,
        language_name: String,
    ) -> StoreResult<TranslationFile> {
        let mut state = self.state.write().await;
        let project = state.project(project_id)?;
        let targets = project.target_languages.clone();
        require(state.role_of(project_id, actor), Action::CreateFile)?;
        if !targets.contains(&language_code) {
            return Err(StoreError::Validation(format!(
                "language {language_code} is not among the project's target languages"
            )));
        }
        let duplicate = state
            .files
            .values()
            .any(|f| f.project_id == project_id && f.language_code == language_code);
        if duplicate {
            return Err(StoreError::Conflict("language file exists in project".into()));
        }
        let now = Utc::now();
        let file = TranslationFile {
            id: Uuid::new_v4(),
            project_id,
            created_by: actor,
            language_code: language_code.clone(),
            language_name,
            current_version: 0,
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());
        state.record_audit(
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::TranslationFile,
            file.id,
            serde_json::json!({ "language_code": language_code }),
        );
        metrics::gauge!("localehub_files_total").set(state.files.len() as f64);
        Ok(file)
    }

    async fn get_file(&self, file_id: Uuid) -> StoreResult<TranslationFile> {
        let state = self.state.read().await;
        state.file(file_id).cloned()
    }

    async fn list_files(&self, project_id: Uuid) -> StoreResult<Vec<TranslationFile>> {
        let state = self.state.read().await;
        state.project(project_id)?;
        let mut items: Vec<_> = state
            .files
            .values()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.language_code.cmp(&b.language_code));
        Ok(items)
    }

    async fn update_file(
        &self,
        actor: Uuid,
        file_id: Uuid,
        patch: FilePatchRequest,
    ) -> StoreResult<TranslationFile> {
        let mut state = self.state.write().await;
        let project_id = state.file(file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::UpdateFile)?;
        let file = state
            .files
            .get_mut(&file_id)
            .ok_or_else(|| StoreError::NotFound("translation file".into()))?;
        if let Some(language_name) = patch.language_name {
            file.language_name = language_name;
        }
        file.updated_at = Utc::now();
        let updated = file.clone();
        state.record_audit(
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::TranslationFile,
            file_id,
            serde_json::json!({ "language_name": updated.language_name }),
        );
        Ok(updated)
    }

    async fn delete_file(&self, actor: Uuid, file_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let file = state.file(file_id)?.clone();
        require(state.role_of(file.project_id, actor), Action::DeleteFile)?;
        state.cascade_file(file_id);
        state.files.remove(&file_id);
        state.record_audit(
            actor,
            file.project_id,
            AuditAction::Delete,
            AuditEntityType::TranslationFile,
            file_id,
            serde_json::json!({ "language_code": file.language_code }),
        );
        metrics::gauge!("localehub_files_total").set(state.files.len() as f64);
        metrics::gauge!("localehub_messages_total").set(state.messages.len() as f64);
        Ok(())
    }

    async fn export_file(&self, file_id: Uuid) -> StoreResult<FileExport> {
        let state = self.state.read().await;
        let file = state.file(file_id)?;
        let mut messages: Vec<ExportedMessage> = state
            .messages
            .values()
            .filter(|m| m.file_id == file_id)
            .map(|m| ExportedMessage {
                key: m.key.clone(),
                value: m.value.clone(),
                status: m.status,
                comment: m.comment.clone(),
            })
            .collect();
        messages.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(FileExport {
            language_code: file.language_code.clone(),
            language_name: file.language_name.clone(),
            version: file.current_version,
            messages,
            exported_at: Utc::now(),
        })
    }

    async fn version_history(&self, file_id: Uuid) -> StoreResult<Vec<TranslationVersion>> {
        let state = self.state.read().await;
        state.file(file_id)?;
        let mut items: Vec<_> = state
            .versions
            .values()
            .filter(|v| v.file_id == file_id)
            .cloned()
            .collect();
        items.sort_by_key(|v| v.version_number);
        Ok(items)
    }

    async fn create_message(
        &self,
        actor: Uuid,
        file_id: Uuid,
        key: String,
        value: String,
        comment: Option<String>,
    ) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        let project_id = state.file(file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::CreateMessage)?;
        let duplicate = state
            .messages
            .values()
            .any(|m| m.file_id == file_id && m.key == key);
        if duplicate {
            return Err(StoreError::Conflict("message key exists in file".into()));
        }
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            file_id,
            created_by: actor,
            key: key.clone(),
            value,
            comment,
            status: MessageStatus::Pending,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        };
        state.messages.insert(message.id, message.clone());
        state.record_audit(
            actor,
            project_id,
            AuditAction::Create,
            AuditEntityType::Message,
            message.id,
            serde_json::json!({ "key": key }),
        );
        metrics::gauge!("localehub_messages_total").set(state.messages.len() as f64);
        Ok(message)
    }

    async fn get_message(&self, message_id: Uuid) -> StoreResult<Message> {
        let state = self.state.read().await;
        state.message(message_id).cloned()
    }

    async fn list_messages(
        &self,
        file_id: Uuid,
        status: Option<MessageStatus>,
    ) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        state.file(file_id)?;
        let mut items: Vec<_> = state
            .messages
            .values()
            .filter(|m| m.file_id == file_id)
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }

    /// The versioning core. Under the single write lock the six steps are one
    /// atomic section: mutate the message, audit the edit, bump the file
    /// counter, snapshot every message in the file, insert the version row,
    /// audit the version. Every failure path returns before the first
    /// mutation, so an error leaves no partial state.
    async fn update_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        patch: MessagePatchRequest,
    ) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        let (file_id, key) = {
            let message = state.message(message_id)?;
            (message.file_id, message.key.clone())
        };
        let project_id = state.file(file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::UpdateMessage)?;

        let message = state
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| StoreError::NotFound("message".into()))?;
        message.value = patch.value.clone();
        message.comment = patch.comment.clone();
        message.updated_at = Utc::now();
        let updated = message.clone();

        state.record_audit(
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": key, "value": patch.value }),
        );

        let file = state
            .files
            .get_mut(&file_id)
            .ok_or_else(|| StoreError::NotFound("translation file".into()))?;
        file.current_version += 1;
        file.updated_at = Utc::now();
        let version_number = file.current_version;

        let snapshot = state.snapshot_of(file_id);
        let version = TranslationVersion {
            id: Uuid::new_v4(),
            file_id,
            created_by: actor,
            version_number,
            snapshot,
            created_at: Utc::now(),
        };
        let version_id = version.id;
        state.versions.insert(version_id, version);
        metrics::counter!("localehub_versions_written_total").increment(1);

        state.record_audit(
            actor,
            project_id,
            AuditAction::Update,
            AuditEntityType::TranslationVersion,
            version_id,
            serde_json::json!({ "version_number": version_number }),
        );
        Ok(updated)
    }

    async fn approve_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        let (file_id, status) = {
            let message = state.message(message_id)?;
            (message.file_id, message.status)
        };
        let project_id = state.file(file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::ReviewMessage)?;
        if status != MessageStatus::Pending {
            return Err(StoreError::InvalidStatusTransition {
                from: status,
                to: MessageStatus::Approved,
            });
        }
        let message = state
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| StoreError::NotFound("message".into()))?;
        message.status = MessageStatus::Approved;
        message.reviewed_by = Some(actor);
        message.updated_at = Utc::now();
        let updated = message.clone();
        state.record_audit(
            actor,
            project_id,
            AuditAction::Approve,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": updated.key }),
        );
        Ok(updated)
    }

    async fn reject_message(
        &self,
        actor: Uuid,
        message_id: Uuid,
        reason: Option<String>,
    ) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        let (file_id, status) = {
            let message = state.message(message_id)?;
            (message.file_id, message.status)
        };
        let project_id = state.file(file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::ReviewMessage)?;
        if status != MessageStatus::Pending {
            return Err(StoreError::InvalidStatusTransition {
                from: status,
                to: MessageStatus::Rejected,
            });
        }
        let message = state
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| StoreError::NotFound("message".into()))?;
        message.status = MessageStatus::Rejected;
        message.reviewed_by = Some(actor);
        message.updated_at = Utc::now();
        let updated = message.clone();
        state.record_audit(
            actor,
            project_id,
            AuditAction::Reject,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": updated.key, "reason": reason }),
        );
        Ok(updated)
    }

    async fn delete_message(&self, actor: Uuid, message_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let message = state.message(message_id)?.clone();
        let project_id = state.file(message.file_id)?.project_id;
        require(state.role_of(project_id, actor), Action::DeleteMessage)?;
        state.messages.remove(&message_id);
        // Capture the key so the trail stays meaningful after the row is gone.
        state.record_audit(
            actor,
            project_id,
            AuditAction::Delete,
            AuditEntityType::Message,
            message_id,
            serde_json::json!({ "key": message.key }),
        );
        metrics::gauge!("localehub_messages_total").set(state.messages.len() as f64);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
