//! Passport credential objects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tgkit_core::ApiObject;

use crate::crypto::{decrypt, decrypt_json};
use crate::error::DecryptionResult;

/// Encrypted credentials shipped with passport data. All fields are base64.
///
/// `secret` is itself encrypted with the bot's public RSA key; decryption takes the
/// already unwrapped secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedCredentials {
    pub data: String,
    pub hash: String,
    pub secret: String,
}

impl EncryptedCredentials {
    /// Decrypt the credentials JSON with the unwrapped `secret`.
    pub fn decrypt_with_secret(&self, secret: &[u8]) -> DecryptionResult<Value> {
        let data = STANDARD.decode(&self.data)?;
        let hash = STANDARD.decode(&self.hash)?;
        decrypt_json(secret, &hash, &data)
    }
}

impl ApiObject for EncryptedCredentials {
    const TYPE_NAME: &'static str = "EncryptedCredentials";
    type Id = (String, String, String);

    fn identity(&self) -> Option<Self::Id> {
        Some((self.data.clone(), self.hash.clone(), self.secret.clone()))
    }
}

/// Key material for one encrypted data field, found inside decrypted credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataCredentials {
    pub data_hash: String,
    pub secret: String,
}

impl DataCredentials {
    /// Decrypt an element's base64 `data` field to JSON.
    pub fn decrypt(&self, data: &str) -> DecryptionResult<Value> {
        decrypt_json(
            &STANDARD.decode(&self.secret)?,
            &STANDARD.decode(&self.data_hash)?,
            &STANDARD.decode(data)?,
        )
    }
}

impl ApiObject for DataCredentials {
    const TYPE_NAME: &'static str = "DataCredentials";
    type Id = (String, String);

    fn identity(&self) -> Option<Self::Id> {
        Some((self.data_hash.clone(), self.secret.clone()))
    }
}

/// Key material for one encrypted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCredentials {
    pub file_hash: String,
    pub secret: String,
}

impl FileCredentials {
    /// Decrypt downloaded file bytes.
    pub fn decrypt(&self, file: &[u8]) -> DecryptionResult<Vec<u8>> {
        decrypt(
            &STANDARD.decode(&self.secret)?,
            &STANDARD.decode(&self.file_hash)?,
            file,
        )
    }
}

impl ApiObject for FileCredentials {
    const TYPE_NAME: &'static str = "FileCredentials";
    type Id = (String, String);

    fn identity(&self) -> Option<Self::Id> {
        Some((self.file_hash.clone(), self.secret.clone()))
    }
}
