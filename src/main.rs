use anyhow::Result;
use teloxide::utils::command::BotCommands;
use tokio::{signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

use bot_handlers::{callbacks_router, messages_router, Command};
use common::{settings, spawn_with_token, LogError, Settings};
use db::DB;
use sender::WindowMiddleware;

use crate::{bot::BotDefault, logger::ErrorFileLogger};

mod bot;
mod logger;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings()?;
    init_logger(settings)?;

    let db = DB::init(&settings.db_path, settings.db_max_connections).await?;
    db.build(settings.db_recreate).await?;

    let mut bot = BotDefault::new(&settings.bot_token, db.clone())?;
    if let Some(url) = &settings.bot_api_url {
        bot.api_url(url.clone());
    }
    bot.window_middleware(WindowMiddleware::new().private_only())
        .add_router(messages_router())
        .add_router(callbacks_router());
    bot.set_commands(Command::bot_commands())
        .await
        .log_error_msg("failed to set bot commands");

    let cancel_token = CancellationToken::new();
    let mut jobs = JoinSet::new();

    let token = cancel_token.clone();
    let run_mode = settings.run_mode.clone();
    jobs.spawn(async move {
        bot.start(run_mode, token.clone())
            .await
            .log_error_msg("bot stopped with error");
        token.cancel();
    });

    let token = cancel_token.clone();
    jobs.spawn(async move {
        if let Some(res) = spawn_with_token(token.clone(), signal::ctrl_c()).await {
            res.log_error_msg("failed to listen for SIGINT");
            log::info!("got SIGINT, stopping");
            token.cancel();
        }
    });

    while (jobs.join_next().await).is_some() {}

    db.shutdown().await;
    Ok(())
}

fn init_logger(settings: &Settings) -> Result<()> {
    use simplelog::*;

    let term_config = ConfigBuilder::new()
        .add_filter_ignore_str("h2")
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("rustls")
        .add_filter_ignore_str("sqlx")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(
            settings.log_level,
            term_config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        ErrorFileLogger::new(&settings.log_error_file),
    ])?;
    Ok(())
}
