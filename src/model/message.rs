//! Message model and review status state machine.
//!
//! # Purpose
//! Messages are keyed entries within a translation file ((file, key) unique).
//! Status starts at PENDING. APPROVED and REJECTED are terminal: the only
//! legal transitions are PENDING to APPROVED and PENDING to REJECTED.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageStatus::Pending => "PENDING",
            MessageStatus::Approved => "APPROVED",
            MessageStatus::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MessageStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(MessageStatus::Pending),
            "APPROVED" => Ok(MessageStatus::Approved),
            "REJECTED" => Ok(MessageStatus::Rejected),
            other => Err(format!("unknown message status: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Message {
    pub id: Uuid,
    pub file_id: Uuid,
    pub created_by: Uuid,
    pub key: String,
    pub value: String,
    pub comment: Option<String>,
    pub status: MessageStatus,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update payload for the versioning workflow. `value` always replaces the
/// current value; `comment` replaces the current comment (None clears it).
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessagePatchRequest {
    pub value: String,
    pub comment: Option<String>,
}
