//! Immutable per-file version snapshots.
//!
//! # Purpose
//! A `TranslationVersion` is written whenever a message in the file changes:
//! its `version_number` equals the file counter at snapshot time, and the
//! snapshot is a complete point-in-time copy of every message in the file.
//! A partial snapshot is a correctness violation, not an optimization.
//! Rows are append-only and removed only by file cascade.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::MessageStatus;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    pub value: String,
    pub status: MessageStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TranslationVersion {
    pub id: Uuid,
    pub file_id: Uuid,
    pub created_by: Uuid,
    pub version_number: u32,
    /// Message key → captured value/status/comment, for every message in the
    /// file at the instant the version was written.
    pub snapshot: BTreeMap<String, MessageSnapshot>,
    pub created_at: DateTime<Utc>,
}
