//! Chat membership, keyed on `status`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tgkit_core::datetime::{timestamp, timestamp_option};
use tgkit_core::{api_union, ApiObject, Bot, Structured};

use crate::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberOwner {
    pub user: Structured<User>,
    pub is_anonymous: bool,
    #[serde(default)]
    pub custom_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberAdministrator {
    pub user: Structured<User>,
    pub can_be_edited: bool,
    pub is_anonymous: bool,
    pub can_manage_chat: bool,
    pub can_delete_messages: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    #[serde(default)]
    pub can_pin_messages: Option<bool>,
    #[serde(default)]
    pub custom_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberMember {
    pub user: Structured<User>,
    #[serde(default, with = "timestamp_option")]
    pub until_date: Option<DateTime<Utc>>,
}

/// Member under restrictions. An `until_date` of 0 means restricted forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberRestricted {
    pub user: Structured<User>,
    pub is_member: bool,
    pub can_send_messages: bool,
    #[serde(default)]
    pub can_send_photos: Option<bool>,
    #[serde(with = "timestamp")]
    pub until_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberLeft {
    pub user: Structured<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberBanned {
    pub user: Structured<User>,
    #[serde(with = "timestamp")]
    pub until_date: DateTime<Utc>,
}

macro_rules! member_object {
    ($($ty:ident => $status:ident),+ $(,)?) => {
        $(
            impl ApiObject for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const DISCRIMINATOR: Option<(&'static str, &'static str)> =
                    Some(("status", ChatMember::$status));
                type Id = i64;

                fn identity(&self) -> Option<i64> {
                    Some(self.user.id)
                }

                fn bind_children(&mut self, bot: Option<&Arc<dyn Bot>>) {
                    self.user.set_bot(bot);
                }
            }
        )+
    };
}

member_object! {
    ChatMemberOwner => OWNER,
    ChatMemberAdministrator => ADMINISTRATOR,
    ChatMemberMember => MEMBER,
    ChatMemberRestricted => RESTRICTED,
    ChatMemberLeft => LEFT,
    ChatMemberBanned => BANNED,
}

api_union! {
    /// A user's membership in a chat.
    pub enum ChatMember: "status" {
        Owner(ChatMemberOwner) = OWNER => "creator",
        Administrator(ChatMemberAdministrator) = ADMINISTRATOR => "administrator",
        Member(ChatMemberMember) = MEMBER => "member",
        Restricted(ChatMemberRestricted) = RESTRICTED => "restricted",
        Left(ChatMemberLeft) = LEFT => "left",
        Banned(ChatMemberBanned) = BANNED => "kicked",
    }
}

impl ChatMember {
    /// The member, unless the status is one this version does not know.
    pub fn user(&self) -> Option<&Structured<User>> {
        match self {
            Self::Owner(m) => Some(&m.user),
            Self::Administrator(m) => Some(&m.user),
            Self::Member(m) => Some(&m.user),
            Self::Restricted(m) => Some(&m.user),
            Self::Left(m) => Some(&m.user),
            Self::Banned(m) => Some(&m.user),
            Self::Unknown(_) => None,
        }
    }

    /// Whether the user currently belongs to the chat.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Owner(_) | Self::Administrator(_) | Self::Member(_) => true,
            Self::Restricted(m) => m.is_member,
            Self::Left(_) | Self::Banned(_) | Self::Unknown(_) => false,
        }
    }
}
