use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use common::types::Id;

use crate::{
    models::{User, UserChanges, UserFilter, DEFAULT_BALANCE},
    Repository, Result, USER_TABLE,
};

pub struct UserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepository<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

fn select_filtered(filter: &UserFilter) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::new(format!("select * from {USER_TABLE} where 1 = 1"));
    if let Some(user_id) = filter.user_id() {
        query.push(" and user_id = ").push_bind(user_id);
    }
    if let Some(username) = filter.username() {
        query.push(" and username = ").push_bind(username.to_owned());
    }
    query.push(" order by id");
    query
}

#[async_trait]
impl<'c> Repository for UserRepository<'c> {
    type Entity = User;
    type Filter = UserFilter;
    type Changes = UserChanges;

    async fn get_by_id(&mut self, id: Id) -> Result<Option<User>> {
        log::debug!("select user by id {id}");
        Ok(
            sqlx::query_as::<_, User>(&format!("select * from {USER_TABLE} where id = ?"))
                .bind(id)
                .fetch_optional(&mut *self.conn)
                .await?,
        )
    }
    async fn get_by_filter(&mut self, filter: &UserFilter) -> Result<Option<User>> {
        log::debug!("select user by {filter:?}");
        let mut query = select_filtered(filter);
        query.push(" limit 1");
        Ok(query
            .build_query_as::<User>()
            .fetch_optional(&mut *self.conn)
            .await?)
    }
    async fn get_all(&mut self, filter: &UserFilter) -> Result<Vec<User>> {
        log::debug!("select all users by {filter:?}");
        let mut query = select_filtered(filter);
        Ok(query
            .build_query_as::<User>()
            .fetch_all(&mut *self.conn)
            .await?)
    }
    async fn add_one(&mut self, user: &User) -> Result<Id> {
        log::debug!("saving user {}", user.user_id());
        let res = sqlx::query(&format!(
            "insert into {USER_TABLE} (user_id, username, balance) values (?, ?, ?)"
        ))
        .bind(user.user_id())
        .bind(user.username())
        .bind(user.balance().unwrap_or(DEFAULT_BALANCE))
        .execute(&mut *self.conn)
        .await?;

        Ok(res.last_insert_rowid())
    }
    async fn edit_one(&mut self, id: Id, changes: UserChanges) -> Result<()> {
        if changes.is_empty() {
            log::debug!("nothing to update for user row {id}");
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!("update {USER_TABLE} set "));
        {
            let mut fields = query.separated(", ");
            if let Some(username) = changes.username() {
                fields.push("username = ").push_bind_unseparated(username.to_owned());
            }
            if let Some(balance) = changes.balance() {
                fields.push("balance = ").push_bind_unseparated(balance);
            }
        }
        query.push(" where id = ").push_bind(id);
        query.build().execute(&mut *self.conn).await?;

        log::debug!("user row {id} updated");
        Ok(())
    }
}
