mod error;
pub mod repos;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    team_members: Arc<dyn TeamMemberRepo>,
    departments: Arc<dyn DepartmentRepo>,
    managed_users: Arc<dyn ManagedUserRepo>,
    chat_agents: Arc<dyn ChatAgentRepo>,
    email_accounts: Arc<dyn EmailAccountRepo>,
}

/// SQLite database pool.
///
/// Repositories are cached at construction time to avoid allocation on
/// each access.
pub struct DbPool {
    pool: sqlx::SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            team_members: Arc::new(sqlite::SqliteTeamMemberRepo::new(pool.clone())),
            departments: Arc::new(sqlite::SqliteDepartmentRepo::new(pool.clone())),
            managed_users: Arc::new(sqlite::SqliteManagedUserRepo::new(pool.clone())),
            chat_agents: Arc::new(sqlite::SqliteChatAgentRepo::new(pool.clone())),
            email_accounts: Arc::new(sqlite::SqliteEmailAccountRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    /// Create a database pool from configuration
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(
                sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&config.path)
                    .create_if_missing(config.create_if_missing)
                    .journal_mode(if config.wal_mode {
                        sqlx::sqlite::SqliteJournalMode::Wal
                    } else {
                        sqlx::sqlite::SqliteJournalMode::Delete
                    })
                    .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms)),
            )
            .await?;

        Ok(Self::from_sqlite(pool))
    }

    /// Run database migrations using sqlx's migration runner
    pub async fn run_migrations(&self) -> DbResult<()> {
        tracing::info!("Running SQLite migrations");
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        tracing::info!("SQLite migrations completed successfully");
        Ok(())
    }

    /// Get team member repository
    pub fn team_members(&self) -> Arc<dyn TeamMemberRepo> {
        Arc::clone(&self.repos.team_members)
    }

    /// Get department repository
    pub fn departments(&self) -> Arc<dyn DepartmentRepo> {
        Arc::clone(&self.repos.departments)
    }

    /// Get managed user repository
    pub fn managed_users(&self) -> Arc<dyn ManagedUserRepo> {
        Arc::clone(&self.repos.managed_users)
    }

    /// Get chat agent link repository
    pub fn chat_agents(&self) -> Arc<dyn ChatAgentRepo> {
        Arc::clone(&self.repos.chat_agents)
    }

    /// Get email account link repository
    pub fn email_accounts(&self) -> Arc<dyn EmailAccountRepo> {
        Arc::clone(&self.repos.email_accounts)
    }

    /// Health check for database connectivity
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
