//! Family chat message encryption
//!
//! Messages are encrypted with a passphrase derived from the family's owner
//! id. The chat history predates encryption, so decryption has to cope with
//! legacy plaintext rows: anything that does not decrypt cleanly is handed
//! back unchanged. Neither direction ever fails observably; a cryptographic
//! fault degrades to storing or showing the text as-is and is only reported
//! through `tracing`.

use crate::config::settings::CryptoSettings;
use crate::error::{HearthError, HearthResult};

use super::encryption::{
    decrypt_with_passphrase, encrypt_with_salt_source, looks_salted, random_salt, SaltSource,
};
use super::{KeyCache, KeyDerivation};

/// Outcome of encrypting a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEncryption {
    /// The message was encrypted into a salted blob
    Encrypted(String),
    /// Encryption could not run; this is the original message
    SoftFailure(String),
    /// The message was empty and there was nothing to encrypt
    Empty,
}

impl MessageEncryption {
    /// Collapse to the text that should be stored
    pub fn into_inner(self) -> String {
        match self {
            Self::Encrypted(text) | Self::SoftFailure(text) => text,
            Self::Empty => String::new(),
        }
    }

    /// Whether the message was actually encrypted
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

/// Outcome of decrypting a stored message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDecryption {
    /// The input was a blob for this family and decrypted to this text
    Decrypted(String),
    /// The input could not be decrypted and is returned unchanged
    /// (legacy plaintext, another family's blob, or corrupt data)
    PassThrough(String),
}

impl MessageDecryption {
    /// Collapse to the text that should be displayed
    pub fn into_inner(self) -> String {
        match self {
            Self::Decrypted(text) | Self::PassThrough(text) => text,
        }
    }

    /// Whether the input was decrypted
    pub fn is_decrypted(&self) -> bool {
        matches!(self, Self::Decrypted(_))
    }
}

/// Encrypts and decrypts chat messages with per-family derived keys
#[derive(Debug)]
pub struct MessageCipher {
    kdf: KeyDerivation,
    cache: KeyCache,
    salt_source: SaltSource,
}

impl Default for MessageCipher {
    fn default() -> Self {
        Self::new(KeyDerivation::default(), KeyCache::default())
    }
}

impl MessageCipher {
    /// Create a message cipher
    pub fn new(kdf: KeyDerivation, cache: KeyCache) -> Self {
        Self {
            kdf,
            cache,
            salt_source: random_salt,
        }
    }

    /// Replace the source of per-message salts (the OS RNG by default)
    pub fn with_salt_source(mut self, salt_source: SaltSource) -> Self {
        self.salt_source = salt_source;
        self
    }

    /// Create a message cipher from the crypto configuration
    pub fn from_settings(settings: &CryptoSettings) -> Self {
        Self::new(
            KeyDerivation::new(settings.app_salt.as_str()),
            KeyCache::new(settings.key_cache_capacity),
        )
    }

    /// The cache of derived family keys
    pub fn key_cache(&self) -> &KeyCache {
        &self.cache
    }

    /// Encrypt a message for a family
    ///
    /// Returns the original message if encryption fails.
    pub fn encrypt(&self, message: &str, owner_id: &str) -> String {
        self.encrypt_tagged(message, owner_id).into_inner()
    }

    /// Decrypt a stored message for a family
    ///
    /// Returns the input unchanged if it isn't a blob this family can read.
    pub fn decrypt(&self, input: &str, owner_id: &str) -> String {
        self.decrypt_tagged(input, owner_id).into_inner()
    }

    /// Encrypt a message, keeping track of whether encryption happened
    pub fn encrypt_tagged(&self, message: &str, owner_id: &str) -> MessageEncryption {
        // An empty blob would later be indistinguishable from legacy plaintext
        if message.is_empty() {
            return MessageEncryption::Empty;
        }

        match self.try_encrypt(message, owner_id) {
            Ok(blob) => MessageEncryption::Encrypted(blob),
            Err(e) => {
                tracing::warn!(
                    owner_id,
                    error = %e,
                    "message encryption failed, storing plaintext"
                );
                MessageEncryption::SoftFailure(message.to_string())
            }
        }
    }

    /// Decrypt a stored message, keeping track of whether decryption happened
    pub fn decrypt_tagged(&self, input: &str, owner_id: &str) -> MessageDecryption {
        if input.is_empty() {
            return MessageDecryption::PassThrough(String::new());
        }

        match self.try_decrypt(input, owner_id) {
            Ok(text) if !text.is_empty() => MessageDecryption::Decrypted(text),
            Ok(_) => {
                tracing::debug!(owner_id, "message decrypted to nothing, treating as plaintext");
                MessageDecryption::PassThrough(input.to_string())
            }
            Err(e) => {
                if looks_salted(input) {
                    tracing::debug!(
                        owner_id,
                        error = %e,
                        "encrypted message did not decrypt for this family"
                    );
                } else {
                    tracing::debug!(owner_id, "message is legacy plaintext");
                }
                MessageDecryption::PassThrough(input.to_string())
            }
        }
    }

    fn try_encrypt(&self, message: &str, owner_id: &str) -> HearthResult<String> {
        let key = self.cache.get_or_derive(owner_id, &self.kdf)?;
        encrypt_with_salt_source(message.as_bytes(), key.as_str(), self.salt_source)
    }

    fn try_decrypt(&self, input: &str, owner_id: &str) -> HearthResult<String> {
        let key = self.cache.get_or_derive(owner_id, &self.kdf)?;
        let plaintext = decrypt_with_passphrase(input, key.as_str())?;
        String::from_utf8(plaintext)
            .map_err(|e| HearthError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e)))
    }
}
