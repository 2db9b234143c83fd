//! Chat addressing for outgoing calls.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target of a call: a numeric chat id or a public `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid chat id `{0}`: expected an integer or an @username")]
pub struct InvalidChatId(String);

impl core::fmt::Display for ChatId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChatId::Id(id) => core::fmt::Display::fmt(id, f),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl FromStr for ChatId {
    type Err = InvalidChatId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if s.len() > 1 && s.starts_with('@') {
            return Ok(Self::Username(s.to_owned()));
        }
        Err(InvalidChatId(s.to_owned()))
    }
}
