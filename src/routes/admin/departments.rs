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
    models::{CreateDepartment, Department, SetTeamMapping},
};

#[tracing::instrument(name = "admin.departments.create", skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Valid(Json(input)): Valid<Json<CreateDepartment>>,
) -> Result<(StatusCode, Json<Department>), AdminError> {
    let department = state.services.directory.create_department(input).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[tracing::instrument(name = "admin.departments.list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>, AdminError> {
    Ok(Json(state.services.directory.list_departments().await?))
}

/// Map (or unmap) a department to a remote chat team.
#[tracing::instrument(name = "admin.departments.set_team_mapping", skip(state, input))]
pub async fn set_team_mapping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetTeamMapping>,
) -> Result<Json<Department>, AdminError> {
    let department = state
        .services
        .directory
        .set_team_mapping(id, input.chatwoot_team_id)
        .await?;
    Ok(Json(department))
}
