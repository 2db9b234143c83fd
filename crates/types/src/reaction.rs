//! Message reactions.

use serde::{Deserialize, Serialize};
use tgkit_core::{api_union, ApiObject, Structured};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionTypeEmoji {
    pub emoji: String,
}

impl ApiObject for ReactionTypeEmoji {
    const TYPE_NAME: &'static str = "ReactionTypeEmoji";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = Some(("type", ReactionType::EMOJI));
    type Id = String;

    fn identity(&self) -> Option<String> {
        Some(self.emoji.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionTypeCustomEmoji {
    pub custom_emoji_id: String,
}

impl ApiObject for ReactionTypeCustomEmoji {
    const TYPE_NAME: &'static str = "ReactionTypeCustomEmoji";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> =
        Some(("type", ReactionType::CUSTOM_EMOJI));
    type Id = String;

    fn identity(&self) -> Option<String> {
        Some(self.custom_emoji_id.clone())
    }
}

/// Paid (star) reaction. Carries nothing but its type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionTypePaid {}

impl ApiObject for ReactionTypePaid {
    const TYPE_NAME: &'static str = "ReactionTypePaid";
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = Some(("type", ReactionType::PAID));
    type Id = ();

    fn identity(&self) -> Option<()> {
        Some(())
    }
}

api_union! {
    /// Reaction on a message, keyed on `type`.
    pub enum ReactionType: "type" {
        Emoji(ReactionTypeEmoji) = EMOJI => "emoji",
        CustomEmoji(ReactionTypeCustomEmoji) = CUSTOM_EMOJI => "custom_emoji",
        Paid(ReactionTypePaid) = PAID => "paid",
    }
}

impl ReactionType {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self::Emoji(Structured::new(ReactionTypeEmoji { emoji: emoji.into() }))
    }

    pub fn custom_emoji(custom_emoji_id: impl Into<String>) -> Self {
        Self::CustomEmoji(Structured::new(ReactionTypeCustomEmoji {
            custom_emoji_id: custom_emoji_id.into(),
        }))
    }

    pub fn paid() -> Self {
        Self::Paid(Structured::new(ReactionTypePaid {}))
    }
}
