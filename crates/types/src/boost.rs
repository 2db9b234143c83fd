//! Chat boosts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tgkit_core::datetime::timestamp;
use tgkit_core::object::list;
use tgkit_core::{api_union, bind_all, ApiObject, Bot, Structured};

use crate::user::User;

/// Boost obtained by subscribing to Telegram Premium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourcePremium {
    pub user: Structured<User>,
}

impl ApiObject for ChatBoostSourcePremium {
    const TYPE_NAME: &'static str = "ChatBoostSourcePremium";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> =
        Some(("source", ChatBoostSource::PREMIUM));
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        Some(self.user.id)
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.user.set_bot(bot);
    }
}

/// Boost obtained through a gift code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourceGiftCode {
    pub user: Structured<User>,
}

impl ApiObject for ChatBoostSourceGiftCode {
    const TYPE_NAME: &'static str = "ChatBoostSourceGiftCode";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> =
        Some(("source", ChatBoostSource::GIFT_CODE));
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        Some(self.user.id)
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.user.set_bot(bot);
    }
}

/// Boost obtained through a giveaway. `user` is absent while the prize is unclaimed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourceGiveaway {
    pub giveaway_message_id: i64,
    #[serde(default)]
    pub user: Option<Structured<User>>,
    #[serde(default)]
    pub prize_star_count: Option<u32>,
    #[serde(default)]
    pub is_unclaimed: Option<bool>,
}

impl ApiObject for ChatBoostSourceGiveaway {
    const TYPE_NAME: &'static str = "ChatBoostSourceGiveaway";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> =
        Some(("source", ChatBoostSource::GIVEAWAY));
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        Some(self.giveaway_message_id)
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        if let Some(user) = &mut self.user {
            user.set_bot(bot);
        }
    }
}

api_union! {
    /// Where a boost came from, keyed on `source`.
    pub enum ChatBoostSource: "source" {
        Premium(ChatBoostSourcePremium) = PREMIUM => "premium",
        GiftCode(ChatBoostSourceGiftCode) = GIFT_CODE => "gift_code",
        Giveaway(ChatBoostSourceGiveaway) = GIVEAWAY => "giveaway",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoost {
    pub boost_id: String,
    #[serde(with = "timestamp")]
    pub add_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub expiration_date: DateTime<Utc>,
    pub source: ChatBoostSource,
}

impl ApiObject for ChatBoost {
    const TYPE_NAME: &'static str = "ChatBoost";
    type Id = (String, DateTime<Utc>, DateTime<Utc>, ChatBoostSource);

    fn identity(&self) -> Option<Self::Id> {
        Some((
            self.boost_id.clone(),
            self.add_date,
            self.expiration_date,
            self.source.clone(),
        ))
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        self.source.set_bot(bot);
    }
}

/// Boosts a user added to a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChatBoosts {
    #[serde(default, deserialize_with = "list::deserialize")]
    pub boosts: Vec<Structured<ChatBoost>>,
}

impl ApiObject for UserChatBoosts {
    const TYPE_NAME: &'static str = "UserChatBoosts";
    type Id = Vec<Structured<ChatBoost>>;

    fn identity(&self) -> Option<Self::Id> {
        Some(self.boosts.clone())
    }

    fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
        bind_all(&mut self.boosts, bot);
    }
}
