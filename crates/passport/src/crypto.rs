//! Payload decryption.
//!
//! Key and IV are derived as `SHA-512(secret ‖ hash)`: the first 32 bytes are the
//! AES-256 key, the next 16 the CBC IV. The data carries no cipher padding; instead
//! its first byte gives the number of leading random bytes to discard. `hash` is the
//! SHA-256 of the padded plaintext and doubles as the integrity check.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use serde_json::Value;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{DecryptionError, DecryptionResult};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_SIZE: usize = 16;

/// Decrypt `data` and strip its random prefix.
pub fn decrypt(secret: &[u8], hash: &[u8], data: &[u8]) -> DecryptionResult<Vec<u8>> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(DecryptionError::InvalidLength { len: data.len() });
    }

    let digest = Sha512::new().chain_update(secret).chain_update(hash).finalize();
    let (key, iv) = (&digest[..32], &digest[32..48]);

    let mut buf = data.to_vec();
    let plain = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| DecryptionError::InvalidLength { len: data.len() })?
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| DecryptionError::InvalidLength { len: data.len() })?;

    if Sha256::digest(plain).as_slice() != hash {
        tracing::debug!(len = data.len(), "passport payload failed its checksum");
        return Err(DecryptionError::ChecksumMismatch);
    }

    let padding = usize::from(plain[0]);
    if padding > plain.len() {
        return Err(DecryptionError::Padding {
            padding,
            len: plain.len(),
        });
    }
    Ok(plain[padding..].to_vec())
}

/// [`decrypt`], then parse the payload as JSON.
pub fn decrypt_json(secret: &[u8], hash: &[u8], data: &[u8]) -> DecryptionResult<Value> {
    let plain = decrypt(secret, hash, data)?;
    Ok(serde_json::from_slice(&plain)?)
}

#[cfg(test)]
pub(crate) mod testing {
    use aes::cipher::block_padding::NoPadding;
    use aes::cipher::{BlockEncryptMut, KeyIvInit};
    use sha2::{Digest, Sha256, Sha512};

    type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

    /// Encrypt `payload` the way the server does. Returns `(hash, data)`.
    pub fn encrypt(secret: &[u8], payload: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut padding = 32;
        while (padding + payload.len()) % 16 != 0 {
            padding += 1;
        }
        let mut plain = vec![0xA5u8; padding];
        plain[0] = padding as u8;
        plain.extend_from_slice(payload);

        let hash = Sha256::digest(&plain).to_vec();
        let digest = Sha512::new().chain_update(secret).chain_update(&hash).finalize();
        let len = plain.len();
        let data = Aes256CbcEnc::new_from_slices(&digest[..32], &digest[32..48])
            .unwrap()
            .encrypt_padded_mut::<NoPadding>(&mut plain, len)
            .unwrap()
            .to_vec();
        (hash, data)
    }
}
