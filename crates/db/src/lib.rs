use std::time::Duration;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

pub mod models;
mod repository;
mod service;
mod uow;
mod user;

#[cfg(test)]
mod tests;

pub use repository::Repository;
pub use service::{Spend, UserService};
pub use uow::{BoxFuture, Session, UnitOfWork};
pub use user::UserRepository;

const USER_TABLE: &str = "users";
/// How long a session waits for another one to release the write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run query: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone)]
pub struct DB {
    pool: SqlitePool,
}

impl DB {
    /// Open pool to sqlite database at `path`, creating file if missing.
    /// At most `max_connections` are opened at once, others wait for a free one
    pub async fn init(path: &str, max_connections: u32) -> Result<Self> {
        log::debug!("opening db at {path}");
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
    /// Create tables. With `drop_existing` all tables are dropped first
    pub async fn build(&self, drop_existing: bool) -> Result<()> {
        if drop_existing {
            log::warn!("dropping existing tables");
            sqlx::query(&format!("drop table if exists {USER_TABLE}"))
                .execute(&self.pool)
                .await?;
            sqlx::query("drop table if exists _sqlx_migrations")
                .execute(&self.pool)
                .await?;
        }
        MIGRATOR.run(&self.pool).await?;
        log::info!("tables created");
        Ok(())
    }
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.pool.clone())
    }
    pub async fn shutdown(&self) {
        log::info!("closing db connections");
        self.pool.close().await;
    }
}
