use std::{convert::Infallible, time::Duration};

use anyhow::Result;
use reqwest::Url;
use teloxide::{
    dispatching::{DefaultKey, ShutdownToken, UpdateHandler},
    prelude::*,
    types::BotCommand,
    update_listeners::{self, webhooks, UpdateListener},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use bot_handlers::HandlerError;
use common::{RunMode, WebhookSettings};
use db::DB;
use sender::WindowMiddleware;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Dispatcher can't be stopped until it starts, retry with this interval
const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

/// Owns bot client and handler tree, runs it with polling or webhook
pub(crate) struct BotDefault {
    bot: Bot,
    db: DB,
    middleware: WindowMiddleware,
    routers: Vec<UpdateHandler<HandlerError>>,
}

impl BotDefault {
    pub(crate) fn new(token: &str, db: DB) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            bot: Bot::with_client(token, client),
            db,
            middleware: WindowMiddleware::new(),
            routers: Vec::new(),
        })
    }
    pub(crate) fn api_url(&mut self, url: Url) -> &mut Self {
        self.bot = self.bot.clone().set_api_url(url);
        self
    }
    pub(crate) fn add_router(&mut self, router: UpdateHandler<HandlerError>) -> &mut Self {
        self.routers.push(router);
        self
    }
    pub(crate) fn window_middleware(&mut self, middleware: WindowMiddleware) -> &mut Self {
        self.middleware = middleware;
        self
    }
    pub(crate) async fn set_commands(&self, commands: Vec<BotCommand>) -> Result<()> {
        self.bot.set_my_commands(commands).await?;
        Ok(())
    }

    /// Every event gets its own sender and unit of work, then goes to
    /// routers in order of adding
    fn handler(middleware: WindowMiddleware, routers: Vec<UpdateHandler<HandlerError>>) -> UpdateHandler<HandlerError> {
        let routers: UpdateHandler<HandlerError> = routers
            .into_iter()
            .fold(dptree::entry(), |tree, router| tree.branch(router));

        middleware
            .handler()
            .map(|db: DB| db.unit_of_work())
            .chain(routers)
    }

    /// Run until `cancel` is cancelled. Webhook is removed after dispatcher
    /// stops
    pub(crate) async fn start(self, mode: RunMode, cancel: CancellationToken) -> Result<()> {
        let Self {
            bot,
            db,
            middleware,
            routers,
        } = self;

        let mut dispatcher = Dispatcher::builder(bot.clone(), Self::handler(middleware, routers))
            .dependencies(dptree::deps![db])
            .default_handler(|update| async move { log::debug!("unhandled update {:?}", update.id) })
            .error_handler(LoggingErrorHandler::with_custom_text("error in dispatcher"))
            .build();

        let res = match &mode {
            RunMode::Polling => {
                bot.delete_webhook().drop_pending_updates(true).await?;
                let listener = update_listeners::polling_default(bot.clone()).await;
                log::info!("bot started with long polling");
                dispatch(&mut dispatcher, listener, cancel).await
            }
            RunMode::Webhook(webhook) => {
                let listener = setup_webhook(&bot, webhook).await?;
                log::info!("bot started with webhook at {}", webhook.public_url());
                let res = dispatch(&mut dispatcher, listener, cancel).await;
                shutdown_webhook(&bot).await;
                res
            }
        };

        log::info!("bot stopped");
        res
    }
}

async fn dispatch<L>(
    dispatcher: &mut Dispatcher<Bot, HandlerError, DefaultKey>,
    listener: L,
    cancel: CancellationToken,
) -> Result<()>
where
    L: UpdateListener,
    L::Err: std::fmt::Debug,
{
    let stop = stop_on_cancel(cancel, dispatcher.shutdown_token());
    let res = dispatcher
        .try_dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("error in update listener"),
        )
        .await;
    stop.abort();
    Ok(res?)
}

fn stop_on_cancel(cancel: CancellationToken, shutdown: ShutdownToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        cancel.cancelled().await;
        loop {
            match shutdown.shutdown() {
                Ok(stopped) => {
                    stopped.await;
                    return;
                }
                Err(_) => tokio::time::sleep(SHUTDOWN_RETRY).await,
            }
        }
    })
}

async fn setup_webhook(
    bot: &Bot,
    webhook: &WebhookSettings,
) -> Result<impl UpdateListener<Err = Infallible>> {
    let url = webhook.public_url();
    let info = bot.get_webhook_info().await?;
    if info.url.as_ref() == Some(&url) {
        log::info!("webhook is already set to {url}");
    } else {
        log::info!("setting webhook to {url}");
    }

    let options = webhooks::Options::new(webhook.address(), url);
    Ok(webhooks::axum(bot.clone(), options).await?)
}

async fn shutdown_webhook(bot: &Bot) {
    match bot.get_webhook_info().await {
        Ok(info) if info.url.is_some() => match bot.delete_webhook().await {
            Ok(_) => log::info!("webhook deleted"),
            Err(e) => log::error!("failed to delete webhook: {e}"),
        },
        Ok(_) => {}
        Err(e) => log::error!("failed to get webhook info: {e}"),
    }
}
