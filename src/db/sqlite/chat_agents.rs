use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ChatAgentRepo,
    },
    models::{ChatAgent, CreateChatAgent},
};

pub struct SqliteChatAgentRepo {
    pool: SqlitePool,
}

impl SqliteChatAgentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> DbResult<ChatAgent> {
        Ok(ChatAgent {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            team_member_id: parse_uuid(&row.get::<String, _>("team_member_id"))?,
            agent_id: row.get("agent_id"),
            email: row.get("email"),
            team_id: row.get("team_id"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl ChatAgentRepo for SqliteChatAgentRepo {
    async fn create(&self, input: CreateChatAgent) -> DbResult<ChatAgent> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO chat_agents (id, team_member_id, agent_id, email, team_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.team_member_id.to_string())
        .bind(input.agent_id)
        .bind(&input.email)
        .bind(input.team_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ChatAgent {
            id,
            team_member_id: input.team_member_id,
            agent_id: input.agent_id,
            email: input.email,
            team_id: input.team_id,
            created_at: now,
        })
    }

    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Option<ChatAgent>> {
        let row = sqlx::query(
            "SELECT id, team_member_id, agent_id, email, team_id, created_at
             FROM chat_agents WHERE team_member_id = ?",
        )
        .bind(team_member_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn set_team(&self, id: Uuid, team_id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE chat_agents SET team_id = ? WHERE id = ?")
            .bind(team_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM chat_agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
