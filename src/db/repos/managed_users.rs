use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateManagedUser, ManagedUser},
};

#[async_trait]
pub trait ManagedUserRepo: Send + Sync {
    async fn create(&self, input: CreateManagedUser) -> DbResult<ManagedUser>;
    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Option<ManagedUser>>;
    async fn list(&self) -> DbResult<Vec<ManagedUser>>;
    /// Persist a merged aggregate produced by `ManagedUser::merge`.
    async fn update(&self, user: &ManagedUser) -> DbResult<()>;
}
