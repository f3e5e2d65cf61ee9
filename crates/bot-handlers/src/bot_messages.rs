use teloxide::{prelude::*, utils::command::BotCommands, utils::html};

use common::types::{Id, UserId as DbUserId};
use db::{models::User, UnitOfWork, UserService};
use sender::{params, Params, Sender};

use crate::{
    windows::{BalanceWindow, NotRegisteredWindow, StartWindow},
    Command, HandlerError,
};

pub(crate) async fn command_handler(
    mut sender: Sender,
    uow: UnitOfWork,
    msg: Message,
    cmd: Command,
) -> Result<(), HandlerError> {
    let Some(from) = msg.from.as_ref() else {
        log::debug!("command {cmd:?} without sender in {}", msg.chat.id);
        return Ok(());
    };
    let user_id: Id = DbUserId::from(from.id).into();

    match cmd {
        Command::Start => {
            let user = User::builder()
                .user_id(user_id)
                .maybe_username(from.username.clone())
                .build();
            if UserService::add_user(&uow, user).await? {
                log::info!("new user {}", from.id);
            }
            sender.add_window(&StartWindow, &params! { "name" => html::escape(&from.full_name()) })?;
        }
        Command::Balance => add_balance_window(&mut sender, &uow, user_id).await?,
        Command::Help => {
            sender.add_text(Command::descriptions().to_string());
        }
    }

    sender.send().await?;
    Ok(())
}

pub(crate) async fn message_handler(mut sender: Sender) -> Result<(), HandlerError> {
    sender.add_text("Unknown command, see /help");
    sender.send().await?;
    Ok(())
}

/// Balance screen, or hint to register when user is not saved
pub(crate) async fn add_balance_window(
    sender: &mut Sender,
    uow: &UnitOfWork,
    user_id: Id,
) -> Result<(), HandlerError> {
    match UserService::get_user(uow, user_id).await? {
        Some(user) => {
            let balance = user.balance().unwrap_or(db::models::DEFAULT_BALANCE);
            sender.add_window(&BalanceWindow, &params! { "balance" => balance })?;
        }
        None => {
            sender.add_window(&NotRegisteredWindow, &Params::new())?;
        }
    }
    Ok(())
}
