use teloxide::{
    dispatching::UpdateHandler,
    dptree,
    types::{Update, UserId},
    Bot,
};

use crate::{ChatEvent, Sender};

/// Puts [`ChatEvent`] and [`Sender`] into handler dependencies. Events from
/// other chats or users, when restricted, don't reach handlers
#[derive(Debug, Clone, Default)]
pub struct WindowMiddleware {
    private_only: bool,
    admins: Option<Vec<UserId>>,
}

impl WindowMiddleware {
    pub fn new() -> Self {
        Self::default()
    }
    /// Skip events from groups and channels
    pub fn private_only(mut self) -> Self {
        self.private_only = true;
        self
    }
    /// Skip events from everyone except `admins`
    pub fn admins(mut self, admins: impl IntoIterator<Item = UserId>) -> Self {
        self.admins = Some(admins.into_iter().collect());
        self
    }
    pub fn allows(&self, event: &ChatEvent) -> bool {
        if self.private_only && !event.is_private() {
            log::debug!("skipping event from non-private chat {}", event.chat_id());
            return false;
        }
        if let Some(admins) = &self.admins {
            if !event.user_id().is_some_and(|id| admins.contains(&id)) {
                log::debug!("skipping event from non-admin {:?}", event.user_id());
                return false;
            }
        }
        true
    }
    /// Handler to chain routers after
    pub fn handler<E>(self) -> UpdateHandler<E>
    where
        E: Send + Sync + 'static,
    {
        dptree::filter_map(|update: Update| ChatEvent::from_update(&update))
            .filter(move |event: ChatEvent| self.allows(&event))
            .map(|bot: Bot, event: ChatEvent| Sender::new(bot, event))
    }
}
