use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_valid::Valid;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::error::AdminError;
use crate::{AppState, models::EmailAccount, services::HostedAccount};

#[derive(Debug, Serialize)]
pub struct HostedAccountResponse {
    #[serde(flatten)]
    pub account: EmailAccount,
    /// Returned exactly once, never persisted.
    pub password: String,
}

impl From<HostedAccount> for HostedAccountResponse {
    fn from(created: HostedAccount) -> Self {
        Self {
            account: created.account,
            password: created.password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AccountSelector {
    #[validate(email)]
    pub email: String,
}

#[tracing::instrument(name = "admin.hosted_email.create", skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Path(team_member_id): Path<Uuid>,
) -> Result<(StatusCode, Json<HostedAccountResponse>), AdminError> {
    let (member, department) = state
        .services
        .directory
        .member_with_department(team_member_id)
        .await?
        .ok_or_else(|| {
            AdminError::NotFound(format!("Team member '{team_member_id}' not found"))
        })?;

    let created = state
        .services
        .hosted_email
        .create_account(&member, department.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[tracing::instrument(name = "admin.hosted_email.list", skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(team_member_id): Path<Uuid>,
) -> Result<Json<Vec<EmailAccount>>, AdminError> {
    Ok(Json(
        state
            .services
            .hosted_email
            .accounts_for_member(team_member_id)
            .await?,
    ))
}

#[tracing::instrument(name = "admin.hosted_email.suspend", skip(state, input))]
pub async fn suspend(
    State(state): State<AppState>,
    Path(team_member_id): Path<Uuid>,
    Valid(Json(input)): Valid<Json<AccountSelector>>,
) -> Result<StatusCode, AdminError> {
    let account = owned_account(&state, team_member_id, &input.email).await?;
    state
        .services
        .hosted_email
        .suspend_account(account.id, &account.email)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "admin.hosted_email.delete", skip(state, input))]
pub async fn delete(
    State(state): State<AppState>,
    Path(team_member_id): Path<Uuid>,
    Valid(Json(input)): Valid<Json<AccountSelector>>,
) -> Result<StatusCode, AdminError> {
    let account = owned_account(&state, team_member_id, &input.email).await?;
    state
        .services
        .hosted_email
        .delete_account(&account.email)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve an account by address and confirm it belongs to the member in
/// the path, so one member's account cannot be managed through another's
/// URL.
async fn owned_account(
    state: &AppState,
    team_member_id: Uuid,
    email: &str,
) -> Result<EmailAccount, AdminError> {
    state
        .services
        .hosted_email
        .accounts_for_member(team_member_id)
        .await?
        .into_iter()
        .find(|account| account.email == email)
        .ok_or_else(|| {
            AdminError::NotFound(format!(
                "No email account '{email}' for member '{team_member_id}'"
            ))
        })
}
