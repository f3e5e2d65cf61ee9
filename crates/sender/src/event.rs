use teloxide::types::{CallbackQuery, ChatId, Message, MessageId, Update, UpdateKind, UserId};

/// Incoming event, as much of it as needed to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    chat_id: ChatId,
    user_id: Option<UserId>,
    private: bool,
    kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Callback {
        query_id: String,
        /// Message with the pressed button, `None` when it's too old to be
        /// accessed
        message: Option<CallbackMessage>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackMessage {
    pub id: MessageId,
    pub has_caption: bool,
}

impl ChatEvent {
    pub fn message(chat_id: ChatId, user_id: Option<UserId>) -> Self {
        Self {
            chat_id,
            user_id,
            private: chat_id.is_user(),
            kind: EventKind::Message,
        }
    }
    pub fn callback(
        query_id: impl Into<String>,
        chat_id: ChatId,
        user_id: UserId,
        message: Option<CallbackMessage>,
    ) -> Self {
        Self {
            chat_id,
            user_id: Some(user_id),
            private: chat_id.is_user(),
            kind: EventKind::Callback {
                query_id: query_id.into(),
                message,
            },
        }
    }
    pub fn from_message(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id,
            user_id: msg.from.as_ref().map(|u| u.id),
            private: msg.chat.is_private(),
            kind: EventKind::Message,
        }
    }
    pub fn from_callback(q: &CallbackQuery) -> Self {
        let message = q.regular_message();
        Self {
            chat_id: message.map_or_else(|| q.from.id.into(), |m| m.chat.id),
            user_id: Some(q.from.id),
            private: message.map_or(true, |m| m.chat.is_private()),
            kind: EventKind::Callback {
                query_id: q.id.clone(),
                message: message.map(|m| CallbackMessage {
                    id: m.id,
                    has_caption: m.caption().is_some(),
                }),
            },
        }
    }
    /// Only messages and callback queries are events
    pub fn from_update(update: &Update) -> Option<Self> {
        match &update.kind {
            UpdateKind::Message(msg) => Some(Self::from_message(msg)),
            UpdateKind::CallbackQuery(q) => Some(Self::from_callback(q)),
            _ => None,
        }
    }
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
    pub fn is_private(&self) -> bool {
        self.private
    }
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
    pub fn is_callback(&self) -> bool {
        matches!(self.kind, EventKind::Callback { .. })
    }
}
