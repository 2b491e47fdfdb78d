use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{ChatAgent, CreateChatAgent},
};

#[async_trait]
pub trait ChatAgentRepo: Send + Sync {
    async fn create(&self, input: CreateChatAgent) -> DbResult<ChatAgent>;
    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Option<ChatAgent>>;
    async fn set_team(&self, id: Uuid, team_id: i64) -> DbResult<()>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}
