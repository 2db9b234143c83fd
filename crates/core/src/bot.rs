//! The client seam objects forward their shortcuts to.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BotError;
use crate::object::ObjectMap;

/// Client handle ("bot") that performs API calls.
///
/// The object model never calls this itself. Entities hold a weak reference to the bot
/// that produced them, and their shortcut methods retrieve it and call one of its
/// operations with the entity's own identifying fields filled in.
///
/// Transport, retries and rate limiting are all the implementor's business.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Invoke an API method by name with a JSON parameter object.
    async fn call(&self, method: &str, params: ObjectMap) -> Result<Value, BotError>;
}

#[async_trait]
impl<B> Bot for Arc<B>
where
    B: Bot + ?Sized,
{
    async fn call(&self, method: &str, params: ObjectMap) -> Result<Value, BotError> {
        (**self).call(method, params).await
    }
}
