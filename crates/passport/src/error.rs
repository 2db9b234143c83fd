use thiserror::Error;

pub type DecryptionResult<T> = Result<T, DecryptionError>;

/// Failure to decrypt a passport payload.
#[derive(Debug, Error)]
pub enum DecryptionError {
    /// Ciphertext that is empty or not a whole number of AES blocks.
    #[error("ciphertext of {len} bytes is not a positive multiple of the block size")]
    InvalidLength { len: usize },

    /// The plaintext does not hash to the expected value: wrong secret or tampered data.
    #[error("decrypted data does not match its hash")]
    ChecksumMismatch,

    /// The leading padding length points past the end of the plaintext.
    #[error("padding length {padding} exceeds plaintext length {len}")]
    Padding { padding: usize, len: usize },

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decrypted data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
