use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use super::error::AdminError;
use crate::{
    AppState,
    services::{ProvisionOptions, ProvisionOutcome},
};

/// Which platforms to provision. Every step defaults to on; the admin UI
/// unchecks the ones it wants skipped.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionRequest {
    #[serde(default = "default_true")]
    pub create_mailbox: bool,
    #[serde(default = "default_true")]
    pub create_chatwoot_agent: bool,
    #[serde(default = "default_true")]
    pub assign_to_team: bool,
}

fn default_true() -> bool {
    true
}

/// Run the provisioning sequence for a member. Partial failures come back
/// in the outcome body with a 200; only missing configuration or local
/// persistence failures map to error statuses.
#[tracing::instrument(name = "admin.provision", skip(state, request))]
pub async fn provision(
    State(state): State<AppState>,
    Path(team_member_id): Path<Uuid>,
    Json(request): Json<ProvisionRequest>,
) -> Result<Json<ProvisionOutcome>, AdminError> {
    let (member, department) = state
        .services
        .directory
        .member_with_department(team_member_id)
        .await?
        .ok_or_else(|| {
            AdminError::NotFound(format!("Team member '{team_member_id}' not found"))
        })?;

    let outcome = state
        .services
        .provisioning
        .provision(
            &member,
            department.as_ref(),
            ProvisionOptions {
                create_mailbox: request.create_mailbox,
                create_chat_agent: request.create_chatwoot_agent,
                assign_to_team: request.assign_to_team,
            },
        )
        .await?;

    Ok(Json(outcome))
}
