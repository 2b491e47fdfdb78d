use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::DepartmentRepo,
    },
    models::{CreateDepartment, Department},
};

pub struct SqliteDepartmentRepo {
    pool: SqlitePool,
}

impl SqliteDepartmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> DbResult<Department> {
        Ok(Department {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            code: row.get("code"),
            name: row.get("name"),
            chatwoot_team_id: row.get("chatwoot_team_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl DepartmentRepo for SqliteDepartmentRepo {
    async fn create(&self, input: CreateDepartment) -> DbResult<Department> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO departments (id, code, name, chatwoot_team_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.chatwoot_team_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                format!("Department with code '{}' already exists", input.code),
            ),
            _ => DbError::from(e),
        })?;

        Ok(Department {
            id,
            code: input.code,
            name: input.name,
            chatwoot_team_id: input.chatwoot_team_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Department>> {
        let row = sqlx::query(
            "SELECT id, code, name, chatwoot_team_id, created_at, updated_at
             FROM departments WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self) -> DbResult<Vec<Department>> {
        let rows = sqlx::query(
            "SELECT id, code, name, chatwoot_team_id, created_at, updated_at
             FROM departments ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn set_team_mapping(
        &self,
        id: Uuid,
        chatwoot_team_id: Option<i64>,
    ) -> DbResult<Department> {
        let result = sqlx::query(
            "UPDATE departments SET chatwoot_team_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(chatwoot_team_id)
        .bind(chrono::Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }
}
