//! Users and bots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tgkit_core::{ApiObject, BotError, Structured};

use crate::chat_id::ChatId;
use crate::message::Message;
use crate::methods::BotMethods;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

impl User {
    /// `first_name`, followed by `last_name` when set.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }

    /// `@username` if the user has one, otherwise the full name.
    pub fn name(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None => self.full_name(),
        }
    }
}

impl ApiObject for User {
    const TYPE_NAME: &'static str = "User";
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        Some(self.id)
    }
}

/// Shortcuts available on a user produced by a bot.
#[async_trait]
pub trait UserExt {
    /// Send a private message to this user.
    async fn send_message(&self, text: &str) -> Result<Structured<Message>, BotError>;
}

#[async_trait]
impl UserExt for Structured<User> {
    async fn send_message(&self, text: &str) -> Result<Structured<Message>, BotError> {
        let bot = self.get_bot()?;
        bot.send_message(ChatId::Id(self.id), text, None).await
    }
}
