//! `tgkit-core` — structured object base for Bot API entities.
//!
//! Every entity of the API is a serde struct implementing [`ApiObject`]; wrapping it in
//! [`Structured`] gives it freezing, identity-based equality and hashing,
//! forward-compatible JSON round-tripping, persisted state and a weak handle to the
//! [`Bot`] that produced it. Families selected by a discriminator field are declared
//! with [`api_union!`].
//!
//! This crate does no IO; the bot is an injected collaborator.

pub mod bot;
pub mod datetime;
pub mod error;
pub mod fields;
pub mod object;
pub mod state;
pub mod union;

pub use bot::Bot;
pub use error::{BotError, ObjectError, ObjectResult};
pub use fields::KnownFields;
pub use object::{bind_all, AnyObject, ApiObject, Draft, ObjectMap, Structured, Unfrozen};
pub use state::ObjectState;
pub use union::ApiUnion;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
