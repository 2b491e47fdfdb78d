use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateTeamMember, TeamMember, UpdateTeamMember},
};

#[async_trait]
pub trait TeamMemberRepo: Send + Sync {
    async fn create(&self, input: CreateTeamMember) -> DbResult<TeamMember>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<TeamMember>>;
    async fn list(&self) -> DbResult<Vec<TeamMember>>;
    async fn update(&self, id: Uuid, input: UpdateTeamMember) -> DbResult<TeamMember>;
    /// Overwrite only the member's email. Used by the provisioning flow so
    /// the change is visible before later steps run.
    async fn set_email(&self, id: Uuid, email: &str) -> DbResult<()>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}
