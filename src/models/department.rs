use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Org-structure department.
///
/// `code` feeds identifier generation; `chatwoot_team_id` maps the
/// department to a remote chat team for agent assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub chatwoot_team_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub chatwoot_team_id: Option<i64>,
}

/// Request to map a department to a remote chat team.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTeamMapping {
    pub chatwoot_team_id: Option<i64>,
}
