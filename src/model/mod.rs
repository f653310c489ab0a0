//! Domain model module.
//!
//! # Purpose
//! Re-exports the organization/project/file/message entities, the review and
//! audit vocabularies, and the patch payloads shared by the API and store
//! layers.
mod audit;
mod file;
mod member;
mod message;
mod organization;
mod project;
mod version;

pub use audit::{AuditAction, AuditEntityType, AuditLog};
pub use file::{ExportedMessage, FileExport, FilePatchRequest, TranslationFile};
pub use member::{MemberPatchRequest, ProjectMember, Role};
pub use message::{Message, MessagePatchRequest, MessageStatus};
pub use organization::Organization;
pub use project::{Project, ProjectPatchRequest, ProjectStats};
pub use version::{MessageSnapshot, TranslationVersion};
