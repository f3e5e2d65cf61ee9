use common::types::Id;

use crate::{
    models::{User, UserChanges, UserFilter, DEFAULT_BALANCE},
    Error, Repository, Result, UnitOfWork,
};

pub struct UserService;

/// Outcome of [`UserService::spend`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spend {
    NotRegistered,
    /// Balance is lower than amount, nothing was changed
    NotEnough { balance: f64 },
    Done { balance: f64 },
}

impl UserService {
    /// Save user on first contact. Returns `false` if user with the same
    /// telegram id is already saved
    pub async fn add_user(uow: &UnitOfWork, user: User) -> Result<bool> {
        uow.run(|s| {
            Box::pin(async move {
                let mut users = s.users();
                let filter = UserFilter::by_user_id(user.user_id());
                if users.get_by_filter(&filter).await?.is_some() {
                    log::debug!("user {} already saved", user.user_id());
                    return Ok(false);
                }
                users.add_one(&user).await?;
                Ok::<_, Error>(true)
            })
        })
        .await
    }
    pub async fn get_user(uow: &UnitOfWork, user_id: Id) -> Result<Option<User>> {
        uow.run(|s| {
            Box::pin(async move {
                s.users()
                    .get_by_filter(&UserFilter::by_user_id(user_id))
                    .await
            })
        })
        .await
    }
    /// Add `delta` to user balance, returns new balance or `None` if user is
    /// not saved yet
    pub async fn change_balance(uow: &UnitOfWork, user_id: Id, delta: f64) -> Result<Option<f64>> {
        uow.run(|s| {
            Box::pin(async move {
                let mut users = s.users();
                let Some(user) = users.get_by_filter(&UserFilter::by_user_id(user_id)).await? else {
                    return Ok(None);
                };
                let balance = user.balance().unwrap_or(DEFAULT_BALANCE) + delta;
                users
                    .edit_one(user.id(), UserChanges::builder().balance(balance).build())
                    .await?;
                Ok::<_, Error>(Some(balance))
            })
        })
        .await
    }
    /// Take `amount` from user balance if there is enough. Check and debit
    /// run in one transaction
    pub async fn spend(uow: &UnitOfWork, user_id: Id, amount: f64) -> Result<Spend> {
        uow.run(|s| {
            Box::pin(async move {
                let mut users = s.users();
                let Some(user) = users.get_by_filter(&UserFilter::by_user_id(user_id)).await? else {
                    return Ok(Spend::NotRegistered);
                };
                let balance = user.balance().unwrap_or(DEFAULT_BALANCE);
                if balance < amount {
                    return Ok(Spend::NotEnough { balance });
                }
                let balance = balance - amount;
                users
                    .edit_one(user.id(), UserChanges::builder().balance(balance).build())
                    .await?;
                Ok::<_, Error>(Spend::Done { balance })
            })
        })
        .await
    }
}
