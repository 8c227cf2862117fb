//! The handle state actions and command handlers use to talk back.

use std::sync::Arc;

use crate::message::{BotIdentity, ChannelId, UserId};
use crate::presenter::Presenter;

/// What user-supplied actions and handlers see of the bot: its
/// announced identity and a way to send replies.
pub struct Bot {
    identity: Option<BotIdentity>,
    presenter: Arc<dyn Presenter>,
}

impl Bot {
    pub(crate) fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            identity: None,
            presenter,
        }
    }

    pub(crate) fn set_identity(&mut self, identity: BotIdentity) {
        self.identity = Some(identity);
    }

    /// The bot's own identity, once the transport has announced it.
    pub fn identity(&self) -> Option<&BotIdentity> {
        self.identity.as_ref()
    }

    /// The bot's own user id, once announced.
    pub fn user_id(&self) -> Option<&UserId> {
        self.identity.as_ref().map(|i| &i.user_id)
    }

    /// Send a plain text reply to a channel.
    pub fn say(&self, channel: &ChannelId, text: &str) {
        self.presenter.send_message(channel, text);
    }
}
