use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_valid::Valid;
use uuid::Uuid;

use super::error::AdminError;
use crate::{
    AppState,
    models::{CreateTeamMember, TeamMember, UpdateTeamMember},
};

#[tracing::instrument(name = "admin.team_members.create", skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<CreateTeamMember>>,
) -> Result<(StatusCode, Json<TeamMember>), AdminError> {
    let member = state.services.directory.create_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[tracing::instrument(name = "admin.team_members.list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>, AdminError> {
    Ok(Json(state.services.directory.list_members().await?))
}

#[tracing::instrument(name = "admin.team_members.get", skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamMember>, AdminError> {
    let member = state
        .services
        .directory
        .get_member(id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("Team member '{id}' not found")))?;
    Ok(Json(member))
}

#[tracing::instrument(name = "admin.team_members.update", skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Valid(Json(input)): Valid<Json<UpdateTeamMember>>,
) -> Result<Json<TeamMember>, AdminError> {
    let member = state.services.directory.update_member(id, input).await?;
    Ok(Json(member))
}

/// Delete a member. Any linked chat agent is offboarded first; the
/// remaining platform link rows go with the member row.
#[tracing::instrument(name = "admin.team_members.delete", skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminError> {
    state.services.provisioning.offboard_chat_agent(id).await?;
    state.services.directory.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
