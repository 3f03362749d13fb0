use super::TicketId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(Uuid);

impl ReplyId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReplyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the desk wrote a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => f.write_str("STUDENT"),
            Self::Admin => f.write_str("ADMIN"),
        }
    }
}

impl UserRole {
    /// Desk side of a user with `role_id`; only `student_role_id` is a student
    #[must_use]
    pub fn for_role_id(role_id: &str, student_role_id: &str) -> Self {
        if role_id == student_role_id {
            Self::Student
        } else {
            Self::Admin
        }
    }
}

/// A message appended to a ticket. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReply {
    pub id: ReplyId,
    pub ticket_id: TicketId,
    pub user_id: String,
    pub user_name: String,
    pub user_role: UserRole,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
