use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::EmailAccountRepo,
    },
    models::{CreateEmailAccount, EmailAccount, EmailAccountStatus, Platform},
};

pub struct SqliteEmailAccountRepo {
    pool: SqlitePool,
}

impl SqliteEmailAccountRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> DbResult<EmailAccount> {
        let platform: String = row.get("platform");
        let status: String = row.get("status");
        Ok(EmailAccount {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            team_member_id: parse_uuid(&row.get::<String, _>("team_member_id"))?,
            email: row.get("email"),
            platform: Platform::from_str(&platform)
                .ok_or_else(|| DbError::Internal(format!("Unknown platform: {platform}")))?,
            status: EmailAccountStatus::from_str(&status)
                .ok_or_else(|| DbError::Internal(format!("Invalid account status: {status}")))?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl EmailAccountRepo for SqliteEmailAccountRepo {
    async fn create(&self, input: CreateEmailAccount) -> DbResult<EmailAccount> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO email_accounts (id, team_member_id, email, platform, status, created_at)
            VALUES (?, ?, ?, ?, 'active', ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.team_member_id.to_string())
        .bind(&input.email)
        .bind(input.platform.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Email account '{}' already exists", input.email),
            ),
            _ => DbError::from(e),
        })?;

        Ok(EmailAccount {
            id,
            team_member_id: input.team_member_id,
            email: input.email,
            platform: input.platform,
            status: EmailAccountStatus::Active,
            created_at: now,
        })
    }

    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Vec<EmailAccount>> {
        let rows = sqlx::query(
            "SELECT id, team_member_id, email, platform, status, created_at
             FROM email_accounts WHERE team_member_id = ? ORDER BY created_at",
        )
        .bind(team_member_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<EmailAccount>> {
        let row = sqlx::query(
            "SELECT id, team_member_id, email, platform, status, created_at
             FROM email_accounts WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn set_status(&self, id: Uuid, status: EmailAccountStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE email_accounts SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM email_accounts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
