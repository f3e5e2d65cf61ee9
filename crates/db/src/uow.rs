use std::{future::Future, pin::Pin};

use sqlx::{Sqlite, SqlitePool, Transaction};

use common::LogError;

use crate::{Error, Result, UserRepository};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle for opening transactional sessions. Cheap to clone, every event
/// gets its own copy
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    pool: SqlitePool,
}

impl UnitOfWork {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
    /// Start a transaction. Dropping the session without
    /// [`Session::commit`] rolls it back and releases the connection.
    ///
    /// Write lock is taken right away, concurrent sessions wait for it up to
    /// the busy timeout
    pub async fn begin(&self) -> Result<Session> {
        Ok(Session {
            tx: self.pool.begin_with("BEGIN IMMEDIATE").await?,
        })
    }
    /// Run `f` inside a session: commit when it returns `Ok`, rollback
    /// otherwise. Commit errors are returned as is, without retry
    ///
    /// ```ignore
    /// let added = uow
    ///     .run(|s| Box::pin(async move { s.users().add_one(&user).await }))
    ///     .await?;
    /// ```
    pub async fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, E>>,
        E: From<Error>,
    {
        let mut session = self.begin().await?;
        match f(&mut session).await {
            Ok(value) => {
                session.commit().await?;
                Ok(value)
            }
            Err(e) => {
                session
                    .rollback()
                    .await
                    .log_error_msg("failed to rollback transaction");
                Err(e)
            }
        }
    }
}

pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    pub fn users(&mut self) -> UserRepository<'_> {
        UserRepository::new(&mut self.tx)
    }
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        log::debug!("transaction committed");
        Ok(())
    }
    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        log::debug!("transaction rolled back");
        Ok(())
    }
}
