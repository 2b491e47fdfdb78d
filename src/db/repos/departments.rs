use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateDepartment, Department},
};

#[async_trait]
pub trait DepartmentRepo: Send + Sync {
    async fn create(&self, input: CreateDepartment) -> DbResult<Department>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Department>>;
    async fn list(&self) -> DbResult<Vec<Department>>;
    /// Map (or unmap) the department to a remote chat team.
    async fn set_team_mapping(&self, id: Uuid, chatwoot_team_id: Option<i64>) -> DbResult<Department>;
}
