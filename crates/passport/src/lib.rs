//! `tgkit-passport` — symmetric decryption of Telegram Passport payloads.
//!
//! Unwrapping the per-payload secret (RSA-OAEP with the bot's private key) is left to
//! the caller; everything here starts from the already decrypted secret.

pub mod credentials;
pub mod crypto;
pub mod error;

pub use credentials::{DataCredentials, EncryptedCredentials, FileCredentials};
pub use crypto::{decrypt, decrypt_json};
pub use error::{DecryptionError, DecryptionResult};
