use teloxide::prelude::*;

use common::types::{Id, UserId as DbUserId};
use db::{models::DEFAULT_BALANCE, Spend, UnitOfWork, UserService};
use sender::{params, ChatApi, PayloadData, Sender};

use crate::{
    bot_messages::add_balance_window,
    callback::Callback,
    windows::{find_tariff, tariffs_config, tariffs_list, NotRegisteredWindow, TariffsWindow},
    HandlerError,
};

const SOMETHING_WRONG: &str = "Something went wrong, try again";

pub(crate) async fn callback_handler(
    mut sender: Sender,
    uow: UnitOfWork,
    q: CallbackQuery,
) -> Result<(), HandlerError> {
    let user_id: Id = DbUserId::from(q.from.id).into();

    let Some(data) = q.data.as_deref() else {
        log::error!("got empty callback {} from user {}", q.id, q.from.id);
        sender.api().answer_callback(&q.id, Some(SOMETHING_WRONG)).await?;
        return Ok(());
    };
    let callback = match Callback::try_from_payload(data) {
        Ok(callback) => callback,
        Err(e) => {
            log::error!("invalid callback {data:?}: {e}");
            sender.api().answer_callback(&q.id, Some(SOMETHING_WRONG)).await?;
            return Ok(());
        }
    };
    log::debug!("got callback: {callback:?}");

    let alert = match callback {
        Callback::Balance | Callback::Back => {
            add_balance_window(&mut sender, &uow, user_id).await?;
            None
        }
        Callback::TopUp { amount } => {
            match UserService::change_balance(&uow, user_id, amount).await? {
                Some(balance) => log::info!("user {user_id} topped up {amount}, balance {balance}"),
                None => log::debug!("user {user_id} is not registered, skip top up"),
            }
            add_balance_window(&mut sender, &uow, user_id).await?;
            None
        }
        Callback::Tariffs => {
            add_tariffs_window(&mut sender, &uow, user_id).await?;
            None
        }
        Callback::Tariff { name } => buy_tariff(&mut sender, &uow, user_id, &name).await?,
    };

    match alert {
        Some(alert) => sender.send_with_alert(&alert).await?,
        None => sender.send().await?,
    };
    Ok(())
}

async fn add_tariffs_window(sender: &mut Sender, uow: &UnitOfWork, user_id: Id) -> Result<(), HandlerError> {
    let Some(user) = UserService::get_user(uow, user_id).await? else {
        sender.add_window(&NotRegisteredWindow, &params! {})?;
        return Ok(());
    };

    let balance = user.balance().unwrap_or(DEFAULT_BALANCE);
    sender
        .keyboard_config(tariffs_config())
        .add_window(&TariffsWindow, &params! { "balance" => balance, "list" => tariffs_list() })?;
    Ok(())
}

/// Returns alert text for callback answer
async fn buy_tariff(
    sender: &mut Sender,
    uow: &UnitOfWork,
    user_id: Id,
    name: &str,
) -> Result<Option<String>, HandlerError> {
    let Some(tariff) = find_tariff(name) else {
        log::error!("unknown tariff {name:?}");
        add_tariffs_window(sender, uow, user_id).await?;
        return Ok(Some(SOMETHING_WRONG.to_string()));
    };

    let alert = match UserService::spend(uow, user_id, tariff.price).await? {
        Spend::NotRegistered => None,
        Spend::NotEnough { balance } => Some(format!(
            "Not enough money: tariff costs {}, you have {balance}",
            tariff.price
        )),
        Spend::Done { balance } => {
            log::info!("user {user_id} bought tariff {}, balance {balance}", tariff.name);
            Some(format!("Tariff {} activated", tariff.name))
        }
    };

    add_tariffs_window(sender, uow, user_id).await?;
    Ok(alert)
}
