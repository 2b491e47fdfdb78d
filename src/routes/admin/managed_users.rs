use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use super::error::AdminError;
use crate::{AppState, models::ManagedUser};

#[tracing::instrument(name = "admin.managed_users.list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ManagedUser>>, AdminError> {
    Ok(Json(state.services.directory.list_managed_users().await?))
}

#[tracing::instrument(name = "admin.managed_users.get", skip(state))]
pub async fn get_by_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<ManagedUser>, AdminError> {
    let user = state
        .services
        .directory
        .managed_user_for_member(member_id)
        .await?
        .ok_or_else(|| {
            AdminError::NotFound(format!("No managed user for member '{member_id}'"))
        })?;
    Ok(Json(user))
}
