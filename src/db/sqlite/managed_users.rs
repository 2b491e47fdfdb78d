use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::ManagedUserRepo,
    },
    models::{CreateManagedUser, ManagedUser, Platform, PlatformIdentity},
};

pub struct SqliteManagedUserRepo {
    pool: SqlitePool,
}

impl SqliteManagedUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> DbResult<ManagedUser> {
        let platforms: Vec<String> = serde_json::from_str(&row.get::<String, _>("platforms"))?;
        let platforms = platforms
            .iter()
            .map(|p| {
                Platform::from_str(p)
                    .ok_or_else(|| DbError::Internal(format!("Unknown platform: {p}")))
            })
            .collect::<DbResult<Vec<_>>>()?;

        let identities: BTreeMap<String, PlatformIdentity> =
            serde_json::from_str(&row.get::<String, _>("platform_identities"))?;
        let platform_identities = identities
            .into_iter()
            .map(|(k, v)| {
                Platform::from_str(&k)
                    .ok_or_else(|| DbError::Internal(format!("Unknown platform: {k}")))
                    .map(|p| (p, v))
            })
            .collect::<DbResult<BTreeMap<_, _>>>()?;

        Ok(ManagedUser {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            team_member_id: parse_uuid(&row.get::<String, _>("team_member_id"))?,
            full_name: row.get("full_name"),
            email: row.get("email"),
            status: row.get("status"),
            platforms,
            platform_identities,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn encode_platforms(platforms: &[Platform]) -> DbResult<String> {
        let names: Vec<&str> = platforms.iter().map(Platform::as_str).collect();
        Ok(serde_json::to_string(&names)?)
    }

    fn encode_identities(
        identities: &BTreeMap<Platform, PlatformIdentity>,
    ) -> DbResult<String> {
        let keyed: BTreeMap<&str, &PlatformIdentity> = identities
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        Ok(serde_json::to_string(&keyed)?)
    }
}

const COLUMNS: &str = "id, team_member_id, full_name, email, status, platforms, \
                       platform_identities, created_at, updated_at";

#[async_trait]
impl ManagedUserRepo for SqliteManagedUserRepo {
    async fn create(&self, input: CreateManagedUser) -> DbResult<ManagedUser> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let platforms: Vec<Platform> = input
            .identities
            .iter()
            .map(PlatformIdentity::platform)
            .collect();
        let platform_identities: BTreeMap<Platform, PlatformIdentity> = input
            .identities
            .into_iter()
            .map(|i| (i.platform(), i))
            .collect();

        sqlx::query(
            r#"
            INSERT INTO managed_users
                (id, team_member_id, full_name, email, status, platforms,
                 platform_identities, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'active', ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.team_member_id.to_string())
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(Self::encode_platforms(&platforms)?)
        .bind(Self::encode_identities(&platform_identities)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict("Member already has a managed user record".to_string())
            }
            _ => DbError::from(e),
        })?;

        Ok(ManagedUser {
            id,
            team_member_id: input.team_member_id,
            full_name: input.full_name,
            email: input.email,
            status: "active".to_string(),
            platforms,
            platform_identities,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_member(&self, team_member_id: Uuid) -> DbResult<Option<ManagedUser>> {
        let query = format!("SELECT {COLUMNS} FROM managed_users WHERE team_member_id = ?");
        let row = sqlx::query(&query)
            .bind(team_member_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self) -> DbResult<Vec<ManagedUser>> {
        let query = format!("SELECT {COLUMNS} FROM managed_users ORDER BY full_name");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, user: &ManagedUser) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE managed_users
            SET full_name = ?, email = ?, status = ?, platforms = ?,
                platform_identities = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.status)
        .bind(Self::encode_platforms(&user.platforms)?)
        .bind(Self::encode_identities(&user.platform_identities)?)
        .bind(chrono::Utc::now())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
