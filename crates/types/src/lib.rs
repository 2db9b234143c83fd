//! `tgkit-types` — Bot API entities built on `tgkit-core`.
//!
//! A representative set of entities (users, chats, messages, callback queries,
//! reactions, boosts, chat members) and the shortcut methods that forward to the bot
//! which produced them.

pub mod boost;
pub mod callback_query;
pub mod chat;
pub mod chat_id;
pub mod chat_member;
pub mod message;
pub mod methods;
pub mod photo;
pub mod reaction;
pub mod user;

pub use boost::{
    ChatBoost, ChatBoostSource, ChatBoostSourceGiftCode, ChatBoostSourceGiveaway,
    ChatBoostSourcePremium, UserChatBoosts,
};
pub use callback_query::{CallbackQuery, CallbackQueryExt};
pub use chat::{Chat, ChatExt};
pub use chat_id::{ChatId, InvalidChatId};
pub use chat_member::{
    ChatMember, ChatMemberAdministrator, ChatMemberBanned, ChatMemberLeft, ChatMemberMember,
    ChatMemberOwner, ChatMemberRestricted,
};
pub use message::{Message, MessageExt};
pub use methods::BotMethods;
pub use photo::PhotoSize;
pub use reaction::{ReactionType, ReactionTypeCustomEmoji, ReactionTypeEmoji, ReactionTypePaid};
pub use user::{User, UserExt};
