//! Admin API surface: directory CRUD plus the integration endpoints.

pub mod departments;
pub mod error;
pub mod hosted_email;
pub mod managed_users;
pub mod provisioning;
pub mod team_members;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/team-members",
            get(team_members::list).post(team_members::create),
        )
        .route(
            "/api/v1/team-members/{id}",
            get(team_members::get)
                .patch(team_members::update)
                .delete(team_members::delete),
        )
        .route(
            "/api/v1/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/api/v1/departments/{id}/team-mapping",
            put(departments::set_team_mapping),
        )
        .route("/api/v1/managed-users", get(managed_users::list))
        .route(
            "/api/v1/managed-users/{member_id}",
            get(managed_users::get_by_member),
        )
        .route(
            "/api/v1/integrations/provision/{team_member_id}",
            post(provisioning::provision),
        )
        .route(
            "/api/v1/integrations/hosted-email/{team_member_id}",
            get(hosted_email::list)
                .post(hosted_email::create)
                .delete(hosted_email::delete),
        )
        .route(
            "/api/v1/integrations/hosted-email/{team_member_id}/suspend",
            post(hosted_email::suspend),
        )
}
