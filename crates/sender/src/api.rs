use async_trait::async_trait;
use reqwest::Url;
use teloxide::{
    payloads::{
        AnswerCallbackQuerySetters, EditMessageCaptionSetters, EditMessageTextSetters,
        GetUserProfilePhotosSetters, SendMessageSetters, SendPhotoSetters,
    },
    prelude::Requester,
    types::{ChatId, InlineKeyboardMarkup, InputFile, MessageId, ParseMode, ReplyMarkup, UserId},
    Bot, RequestError,
};

type Result<T> = std::result::Result<T, RequestError>;

/// Where to take photo from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    FileId(String),
    Url(Url),
    Bytes { name: String, bytes: Vec<u8> },
}

impl From<PhotoSource> for InputFile {
    fn from(value: PhotoSource) -> Self {
        match value {
            PhotoSource::FileId(id) => InputFile::file_id(id),
            PhotoSource::Url(url) => InputFile::url(url),
            PhotoSource::Bytes { name, bytes } => InputFile::memory(bytes).file_name(name),
        }
    }
}

/// Telegram methods used by [`crate::Sender`]. All texts are sent as HTML
#[async_trait]
pub trait ChatApi: Clone + Send + Sync + 'static {
    async fn answer_text(&self, chat_id: ChatId, text: &str, markup: Option<ReplyMarkup>) -> Result<MessageId>;
    async fn answer_photo(
        &self,
        chat_id: ChatId,
        photo: PhotoSource,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId>;
    async fn edit_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;
    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
    /// Acknowledge callback query, optionally showing alert to the user
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> Result<()>;
    /// File id of the latest user profile photo
    async fn profile_photo(&self, user_id: UserId) -> Result<Option<String>>;
}

#[async_trait]
impl ChatApi for Bot {
    async fn answer_text(&self, chat_id: ChatId, text: &str, markup: Option<ReplyMarkup>) -> Result<MessageId> {
        let mut req = self.send_message(chat_id, text).parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            req = req.reply_markup(markup);
        }
        Ok(req.await?.id)
    }
    async fn answer_photo(
        &self,
        chat_id: ChatId,
        photo: PhotoSource,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<MessageId> {
        let mut req = self
            .send_photo(chat_id, photo.into())
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            req = req.reply_markup(markup);
        }
        Ok(req.await?.id)
    }
    async fn edit_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut req = self
            .edit_message_caption(chat_id, message_id)
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            req = req.reply_markup(markup);
        }
        req.await?;
        Ok(())
    }
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut req = self
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup {
            req = req.reply_markup(markup);
        }
        req.await?;
        Ok(())
    }
    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.delete_message(chat_id, message_id).await?;
        Ok(())
    }
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> Result<()> {
        let mut req = self.answer_callback_query(query_id);
        if let Some(alert) = alert {
            req = req.text(alert).show_alert(true);
        }
        req.await?;
        Ok(())
    }
    async fn profile_photo(&self, user_id: UserId) -> Result<Option<String>> {
        let photos = self.get_user_profile_photos(user_id).limit(1).await?;
        Ok(photos
            .photos
            .first()
            .and_then(|sizes| sizes.last())
            .map(|photo| photo.file.id.clone()))
    }
}
