use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_opt_uuid, parse_uuid};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::TeamMemberRepo,
    },
    models::{CreateTeamMember, MemberStatus, TeamMember, UpdateTeamMember},
};

pub struct SqliteTeamMemberRepo {
    pool: SqlitePool,
}

impl SqliteTeamMemberRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> DbResult<TeamMember> {
        let status: String = row.get("status");
        Ok(TeamMember {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            phone: row.get("phone"),
            department_id: parse_opt_uuid(row.get("department_id"))?,
            role: row.get("role"),
            status: MemberStatus::from_str(&status)
                .ok_or_else(|| DbError::Internal(format!("Invalid member status: {status}")))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

const COLUMNS: &str =
    "id, first_name, last_name, email, phone, department_id, role, status, created_at, updated_at";

#[async_trait]
impl TeamMemberRepo for SqliteTeamMemberRepo {
    async fn create(&self, input: CreateTeamMember) -> DbResult<TeamMember> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO team_members
                (id, first_name, last_name, email, phone, department_id, role, status,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.department_id.map(|d| d.to_string()))
        .bind(&input.role)
        .bind(MemberStatus::Active.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(TeamMember {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            department_id: input.department_id,
            role: input.role,
            status: MemberStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<TeamMember>> {
        let query = format!("SELECT {COLUMNS} FROM team_members WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self) -> DbResult<Vec<TeamMember>> {
        let query = format!("SELECT {COLUMNS} FROM team_members ORDER BY last_name, first_name");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, id: Uuid, input: UpdateTeamMember) -> DbResult<TeamMember> {
        let existing = self.get_by_id(id).await?.ok_or(DbError::NotFound)?;
        let now = chrono::Utc::now();

        let updated = TeamMember {
            first_name: input.first_name.unwrap_or(existing.first_name),
            last_name: input.last_name.unwrap_or(existing.last_name),
            email: input.email.or(existing.email),
            phone: input.phone.or(existing.phone),
            department_id: input.department_id.or(existing.department_id),
            role: input.role.unwrap_or(existing.role),
            status: input.status.unwrap_or(existing.status),
            updated_at: now,
            ..existing
        };

        sqlx::query(
            r#"
            UPDATE team_members
            SET first_name = ?, last_name = ?, email = ?, phone = ?, department_id = ?,
                role = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.first_name)
        .bind(&updated.last_name)
        .bind(&updated.email)
        .bind(&updated.phone)
        .bind(updated.department_id.map(|d| d.to_string()))
        .bind(&updated.role)
        .bind(updated.status.as_str())
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn set_email(&self, id: Uuid, email: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE team_members SET email = ?, updated_at = ? WHERE id = ?",
        )
        .bind(email)
        .bind(chrono::Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
