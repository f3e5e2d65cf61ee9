use teloxide::{dispatching::UpdateHandler, prelude::*};

mod bot_callback;
mod bot_messages;
mod callback;
mod commands;
mod error;
mod windows;

pub use commands::Command;
pub use error::HandlerError;

use bot_callback::callback_handler;
use bot_messages::{command_handler, message_handler};

/// Commands first, any other message gets a hint
pub fn messages_router() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .endpoint(message_handler)
}

pub fn callbacks_router() -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(callback_handler)
}
