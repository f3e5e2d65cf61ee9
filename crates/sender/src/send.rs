use std::path::PathBuf;

use reqwest::Url;
use teloxide::{
    types::{ChatId, InlineKeyboardMarkup, MessageId, ReplyMarkup},
    ApiError, Bot, RequestError,
};

use common::LogError;

use crate::{
    event::{CallbackMessage, EventKind},
    ChatApi, ChatEvent, KeyboardConfig, Params, PhotoSource, SendError, Window,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Photo {
    /// Local file, skipped if it can't be read
    Path(PathBuf),
    FileId(String),
    Url(Url),
    /// Latest profile photo of the user who sent the event, skipped if
    /// there is none
    UserProfile,
}

/// Outcome of [`Sender::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// New message was sent
    Sent(MessageId),
    /// Message with pressed button was edited in place
    Edited(MessageId),
    /// Edit changed nothing
    Unchanged,
    /// Every way to deliver failed, errors are logged
    Failed,
}

/// Answers one event with a window: sends new message for messages, edits
/// the message for callbacks
///
/// ```ignore
/// sender
///     .add_window(&BalanceWindow, &params! { "balance" => balance })?
///     .send()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Sender<A = Bot> {
    api: A,
    event: ChatEvent,
    config: KeyboardConfig,
    photo: Option<Photo>,
    text: Option<String>,
    markup: Option<ReplyMarkup>,
}

impl<A: ChatApi> Sender<A> {
    pub fn new(api: A, event: ChatEvent) -> Self {
        Self {
            api,
            event,
            config: KeyboardConfig::default(),
            photo: None,
            text: None,
            markup: None,
        }
    }
    pub fn api(&self) -> &A {
        &self.api
    }
    pub fn event(&self) -> &ChatEvent {
        &self.event
    }
    /// Should be set before [`Sender::add_window`]
    pub fn keyboard_config(&mut self, config: KeyboardConfig) -> &mut Self {
        self.config = config;
        self
    }
    pub fn photo(&mut self, photo: Photo) -> &mut Self {
        self.photo = Some(photo);
        self
    }
    pub fn add_window<W>(&mut self, window: &W, params: &Params) -> Result<&mut Self, SendError>
    where
        W: Window + ?Sized,
    {
        let (text, markup) = window.render(params, &self.config)?;
        self.text = Some(text);
        self.markup = markup;
        Ok(self)
    }
    /// Set text as is, without placeholders and keyboard
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self.markup = None;
        self
    }
    pub async fn send(&self) -> Result<Delivery, SendError> {
        self.deliver(None).await
    }
    /// Same as [`Sender::send`], but callback is answered with alert
    pub async fn send_with_alert(&self, alert: &str) -> Result<Delivery, SendError> {
        self.deliver(Some(alert)).await
    }

    async fn deliver(&self, alert: Option<&str>) -> Result<Delivery, SendError> {
        let text = match &self.text {
            Some(text) if !text.trim().is_empty() => text.as_str(),
            _ => return Err(SendError::EmptyText),
        };
        let chat_id = self.event.chat_id();

        let delivery = match self.event.kind() {
            EventKind::Message => self.send_new(chat_id, text).await,
            EventKind::Callback { query_id, message } => {
                self.api
                    .answer_callback(query_id, alert)
                    .await
                    .log_error_msg("failed to answer callback query");

                match message {
                    Some(message) => self.edit(chat_id, *message, text).await,
                    None => {
                        log::debug!("message in {chat_id} is inaccessible, sending new one");
                        self.send_new(chat_id, text).await
                    }
                }
            }
        };
        log::debug!("delivery to {chat_id}: {delivery:?}");
        Ok(delivery)
    }

    async fn send_new(&self, chat_id: ChatId, text: &str) -> Delivery {
        if let Some(photo) = self.resolve_photo().await {
            match self.api.answer_photo(chat_id, photo, text, self.markup.clone()).await {
                Ok(id) => return Delivery::Sent(id),
                Err(e) => log::warn!("failed to send photo to {chat_id}, sending text only: {e}"),
            }
        }

        match self.api.answer_text(chat_id, text, self.markup.clone()).await {
            Ok(id) => Delivery::Sent(id),
            Err(e) => {
                log::error!("failed to send message to {chat_id}: {e}");
                Delivery::Failed
            }
        }
    }

    async fn edit(&self, chat_id: ChatId, message: CallbackMessage, text: &str) -> Delivery {
        let markup = match &self.markup {
            None => Some(None),
            Some(ReplyMarkup::InlineKeyboard(markup)) => Some(Some(markup.clone())),
            Some(_) => None,
        };

        match markup {
            Some(_) if self.photo.is_some() && !message.has_caption => {
                log::debug!("text message can't get photo by editing, resending");
            }
            Some(markup) => {
                if let Some(delivery) = self.try_edit(chat_id, message.id, text, markup).await {
                    return delivery;
                }
            }
            None => log::debug!("only inline keyboard can be attached by editing, resending"),
        }

        self.api
            .delete(chat_id, message.id)
            .await
            .log_error_msg_with(|| format!("failed to delete message {} in {chat_id}", message.id.0));
        self.send_new(chat_id, text).await
    }

    async fn try_edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Option<Delivery> {
        match self.api.edit_caption(chat_id, message_id, text, markup.clone()).await {
            Ok(()) => return Some(Delivery::Edited(message_id)),
            Err(e) if is_not_modified(&e) => return Some(Delivery::Unchanged),
            Err(e) => log::debug!("failed to edit caption of {} in {chat_id}: {e}", message_id.0),
        }

        match self.api.edit_text(chat_id, message_id, text, markup).await {
            Ok(()) => Some(Delivery::Edited(message_id)),
            Err(e) if is_not_modified(&e) => Some(Delivery::Unchanged),
            Err(e) => {
                log::debug!("failed to edit text of {} in {chat_id}: {e}", message_id.0);
                None
            }
        }
    }

    async fn resolve_photo(&self) -> Option<PhotoSource> {
        match self.photo.as_ref()? {
            Photo::Path(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Some(PhotoSource::Bytes {
                    name: path
                        .file_name()
                        .map_or_else(|| "photo".to_string(), |n| n.to_string_lossy().into_owned()),
                    bytes,
                }),
                Err(e) => {
                    log::warn!("skipping photo {}: {e}", path.display());
                    None
                }
            },
            Photo::FileId(id) => Some(PhotoSource::FileId(id.clone())),
            Photo::Url(url) => Some(PhotoSource::Url(url.clone())),
            Photo::UserProfile => {
                let user_id = self.event.user_id()?;
                match self.api.profile_photo(user_id).await {
                    Ok(Some(id)) => Some(PhotoSource::FileId(id)),
                    Ok(None) => {
                        log::debug!("user {user_id} has no profile photo");
                        None
                    }
                    Err(e) => {
                        log::warn!("failed to get profile photo of {user_id}: {e}");
                        None
                    }
                }
            }
        }
    }
}

fn is_not_modified(e: &RequestError) -> bool {
    matches!(e, RequestError::Api(ApiError::MessageNotModified))
}
