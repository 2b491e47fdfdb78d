use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Platform;

/// Link between a member and a remote chat agent.
///
/// Created when agent creation succeeds; used to avoid re-provisioning and
/// to support later deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAgent {
    pub id: Uuid,
    pub team_member_id: Uuid,
    /// Remote agent id assigned by the chat platform.
    pub agent_id: i64,
    /// Email the agent was created with.
    pub email: String,
    pub team_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateChatAgent {
    pub team_member_id: Uuid,
    pub agent_id: i64,
    pub email: String,
    pub team_id: Option<i64>,
}

/// Mailbox account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailAccountStatus {
    #[default]
    Active,
    Suspended,
}

impl EmailAccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// Link between a member and a remote mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAccount {
    pub id: Uuid,
    pub team_member_id: Uuid,
    pub email: String,
    pub platform: Platform,
    pub status: EmailAccountStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEmailAccount {
    pub team_member_id: Uuid,
    pub email: String,
    pub platform: Platform,
}
