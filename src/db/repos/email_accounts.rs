use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateEmailAccount, EmailAccount, EmailAccountStatus},
};

#[async_trait]
pub trait EmailAccountRepo: Send + Sync {
    async fn create(&self, input: CreateEmailAccount) -> DbResult<EmailAccount>;
    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Vec<EmailAccount>>;
    async fn get_by_email(&self, email: &str) -> DbResult<Option<EmailAccount>>;
    async fn set_status(&self, id: Uuid, status: EmailAccountStatus) -> DbResult<()>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}
