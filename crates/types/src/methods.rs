//! Typed API calls over the [`Bot`] seam.
//!
//! The object model only knows `Bot::call(method, params)`. [`BotMethods`] adds typed
//! wrappers for the calls the entity shortcuts need and decodes their results with the
//! calling bot attached, so the returned objects can use shortcuts in turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tgkit_core::{ApiObject, Bot, BotError, ObjectMap, Structured};

use crate::boost::UserChatBoosts;
use crate::chat_id::ChatId;
use crate::chat_member::ChatMember;
use crate::message::Message;
use crate::reaction::ReactionType;

#[async_trait]
pub trait BotMethods {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<Structured<Message>, BotError>;

    async fn forward_message(
        &self,
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: i64,
    ) -> Result<Structured<Message>, BotError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: i64) -> Result<bool, BotError>;

    async fn set_message_reaction(
        &self,
        chat_id: ChatId,
        message_id: i64,
        reaction: Vec<ReactionType>,
        is_big: bool,
    ) -> Result<bool, BotError>;

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool, BotError>;

    async fn get_chat_member(&self, chat_id: ChatId, user_id: i64) -> Result<ChatMember, BotError>;

    async fn get_user_chat_boosts(
        &self,
        chat_id: ChatId,
        user_id: i64,
    ) -> Result<Structured<UserChatBoosts>, BotError>;
}

#[async_trait]
impl BotMethods for Arc<dyn Bot> {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<Structured<Message>, BotError> {
        let params = params(json!({
            "chat_id": chat_id,
            "text": text,
            "reply_to_message_id": reply_to_message_id,
        }));
        let result = invoke(self, "sendMessage", params).await?;
        decode_object(self, "sendMessage", result)
    }

    async fn forward_message(
        &self,
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: i64,
    ) -> Result<Structured<Message>, BotError> {
        let params = params(json!({
            "chat_id": chat_id,
            "from_chat_id": from_chat_id,
            "message_id": message_id,
        }));
        let result = invoke(self, "forwardMessage", params).await?;
        decode_object(self, "forwardMessage", result)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: i64) -> Result<bool, BotError> {
        let params = params(json!({"chat_id": chat_id, "message_id": message_id}));
        let result = invoke(self, "deleteMessage", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn set_message_reaction(
        &self,
        chat_id: ChatId,
        message_id: i64,
        reaction: Vec<ReactionType>,
        is_big: bool,
    ) -> Result<bool, BotError> {
        let params = params(json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reaction": serde_json::to_value(&reaction)?,
            "is_big": is_big,
        }));
        let result = invoke(self, "setMessageReaction", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool, BotError> {
        let params = params(json!({
            "callback_query_id": callback_query_id,
            "text": text,
            "show_alert": show_alert,
        }));
        let result = invoke(self, "answerCallbackQuery", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn get_chat_member(&self, chat_id: ChatId, user_id: i64) -> Result<ChatMember, BotError> {
        let params = params(json!({"chat_id": chat_id, "user_id": user_id}));
        let result = invoke(self, "getChatMember", params).await?;
        ChatMember::from_value(result, Some(self))?
            .ok_or_else(|| BotError::request("getChatMember", "empty result"))
    }

    async fn get_user_chat_boosts(
        &self,
        chat_id: ChatId,
        user_id: i64,
    ) -> Result<Structured<UserChatBoosts>, BotError> {
        let params = params(json!({"chat_id": chat_id, "user_id": user_id}));
        let result = invoke(self, "getUserChatBoosts", params).await?;
        decode_object(self, "getUserChatBoosts", result)
    }
}

async fn invoke(bot: &Arc<dyn Bot>, method: &str, params: ObjectMap) -> Result<Value, BotError> {
    tracing::debug!(method, params = params.len(), "calling bot");
    bot.call(method, params).await
}

/// Parameters with unset (`null`) values left out.
fn params(value: Value) -> ObjectMap {
    match value {
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => ObjectMap::new(),
    }
}

fn decode_object<T: ApiObject>(
    bot: &Arc<dyn Bot>,
    method: &'static str,
    result: Value,
) -> Result<Structured<T>, BotError> {
    Structured::from_value(result, Some(bot))?.ok_or_else(|| BotError::request(method, "empty result"))
}
