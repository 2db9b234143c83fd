//! Messages.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tgkit_core::datetime::{timestamp, timestamp_option};
use tgkit_core::object::list;
use tgkit_core::{bind_all, ApiObject, Bot, BotError, Structured};

use crate::chat::Chat;
use crate::chat_id::ChatId;
use crate::methods::BotMethods;
use crate::photo::PhotoSize;
use crate::reaction::ReactionType;
use crate::user::User;

/// A message in a chat.
///
/// `from` is a reserved word in most client languages; the sender is exposed as
/// `from_user` and accepted under both names on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub chat: Structured<Chat>,
    #[serde(rename = "from", default)]
    pub from_user: Option<Structured<User>>,
    #[serde(default)]
    pub sender_chat: Option<Structured<Chat>>,
    #[serde(default, with = "timestamp_option")]
    pub edit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "list::deserialize")]
    pub photo: Vec<Structured<PhotoSize>>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Structured<Message>>>,
}

impl Message {
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    /// Text of a text message, caption of a media message.
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

impl ApiObject for Message {
    const TYPE_NAME: &'static str = "Message";
    const ALIASES: &'static [(&'static str, &'static str)] = &[("from", "from_user")];
    type Id = (i64, i64);

    fn identity(&self) -> Option<(i64, i64)> {
        Some((self.message_id, self.chat.id))
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.chat.set_bot(bot);
        if let Some(user) = &mut self.from_user {
            user.set_bot(bot);
        }
        if let Some(chat) = &mut self.sender_chat {
            chat.set_bot(bot);
        }
        bind_all(&mut self.photo, bot);
        if let Some(reply) = &mut self.reply_to_message {
            reply.set_bot(bot);
        }
    }
}

/// Shortcuts available on a message produced by a bot.
#[async_trait]
pub trait MessageExt {
    /// Answer in the same chat, quoting this message.
    async fn reply_text(&self, text: &str) -> Result<Structured<Message>, BotError>;

    /// Forward this message to another chat. Returns the forwarded copy.
    async fn forward(&self, to: ChatId) -> Result<Structured<Message>, BotError>;

    async fn delete(&self) -> Result<bool, BotError>;

    /// Replace the bot's reactions on this message. An empty list removes them.
    async fn set_reaction(&self, reaction: Vec<ReactionType>, is_big: bool) -> Result<bool, BotError>;
}

#[async_trait]
impl MessageExt for Structured<Message> {
    async fn reply_text(&self, text: &str) -> Result<Structured<Message>, BotError> {
        let bot = self.get_bot()?;
        bot.send_message(ChatId::Id(self.chat_id()), text, Some(self.message_id))
            .await
    }

    async fn forward(&self, to: ChatId) -> Result<Structured<Message>, BotError> {
        let bot = self.get_bot()?;
        bot.forward_message(to, ChatId::Id(self.chat_id()), self.message_id)
            .await
    }

    async fn delete(&self) -> Result<bool, BotError> {
        let bot = self.get_bot()?;
        bot.delete_message(ChatId::Id(self.chat_id()), self.message_id)
            .await
    }

    async fn set_reaction(&self, reaction: Vec<ReactionType>, is_big: bool) -> Result<bool, BotError> {
        let bot = self.get_bot()?;
        bot.set_message_reaction(ChatId::Id(self.chat_id()), self.message_id, reaction, is_big)
            .await
    }
}
