//! Inline keyboard callbacks.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tgkit_core::{ApiObject, Bot, BotError, Structured};

use crate::message::Message;
use crate::methods::BotMethods;
use crate::user::User;

/// Press of a callback button on an inline keyboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(rename = "from")]
    pub from_user: Structured<User>,
    pub chat_instance: String,
    #[serde(default)]
    pub message: Option<Structured<Message>>,
    #[serde(default)]
    pub inline_message_id: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub game_short_name: Option<String>,
}

impl ApiObject for CallbackQuery {
    const TYPE_NAME: &'static str = "CallbackQuery";
    const ALIASES: &'static [(&'static str, &'static str)] = &[("from", "from_user")];
    type Id = String;

    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.from_user.set_bot(bot);
        if let Some(message) = &mut self.message {
            message.set_bot(bot);
        }
    }
}

#[async_trait]
pub trait CallbackQueryExt {
    /// Acknowledge the press, optionally showing `text` as a notification or alert.
    async fn answer(&self, text: Option<&str>, show_alert: bool) -> Result<bool, BotError>;
}

#[async_trait]
impl CallbackQueryExt for Structured<CallbackQuery> {
    async fn answer(&self, text: Option<&str>, show_alert: bool) -> Result<bool, BotError> {
        let bot = self.get_bot()?;
        bot.answer_callback_query(&self.id, text, show_alert).await
    }
}
