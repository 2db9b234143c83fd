//! Chats.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tgkit_core::{ApiObject, BotError, Structured};

use crate::chat_id::ChatId;
use crate::chat_member::ChatMember;
use crate::message::Message;
use crate::methods::BotMethods;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub r#type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_forum: Option<bool>,
}

impl Chat {
    pub const SENDER: &'static str = "sender";
    pub const PRIVATE: &'static str = "private";
    pub const GROUP: &'static str = "group";
    pub const SUPERGROUP: &'static str = "supergroup";
    pub const CHANNEL: &'static str = "channel";

    pub fn is_private(&self) -> bool {
        self.r#type == Self::PRIVATE
    }

    /// Title for groups and channels, the other party's name for private chats.
    pub fn effective_name(&self) -> Option<String> {
        if let Some(title) = &self.title {
            return Some(title.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }
}

impl ApiObject for Chat {
    const TYPE_NAME: &'static str = "Chat";
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        Some(self.id)
    }
}

#[async_trait]
pub trait ChatExt {
    async fn send_message(&self, text: &str) -> Result<Structured<Message>, BotError>;

    /// Membership of `user_id` in this chat.
    async fn get_member(&self, user_id: i64) -> Result<ChatMember, BotError>;
}

#[async_trait]
impl ChatExt for Structured<Chat> {
    async fn send_message(&self, text: &str) -> Result<Structured<Message>, BotError> {
        let bot = self.get_bot()?;
        bot.send_message(ChatId::Id(self.id), text, None).await
    }

    async fn get_member(&self, user_id: i64) -> Result<ChatMember, BotError> {
        let bot = self.get_bot()?;
        bot.get_chat_member(ChatId::Id(self.id), user_id).await
    }
}
