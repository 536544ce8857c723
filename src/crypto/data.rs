//! Backup payload encryption
//!
//! Encrypts a whole application-state export under the application-wide
//! export secret. Unlike chat messages this path is strict: a restore must
//! never proceed with data that didn't decrypt and parse cleanly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::settings::CryptoSettings;
use crate::error::{HearthError, HearthResult};

use super::encryption::{decrypt_with_passphrase, encrypt_with_passphrase};
use super::SecureString;

/// Export secret used when no configuration overrides it
pub const DEFAULT_EXPORT_SECRET: &str = "hearth-local-export-secret-v1";

/// Encrypts and decrypts serializable values with a fixed secret
#[derive(Debug, Clone)]
pub struct DataCipher {
    secret: SecureString,
}

impl Default for DataCipher {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_SECRET)
    }
}

impl DataCipher {
    /// Create a data cipher with the given export secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecureString::new(secret),
        }
    }

    /// Create a data cipher from the crypto configuration
    pub fn from_settings(settings: &CryptoSettings) -> Self {
        Self::new(settings.export_secret.as_str())
    }

    /// Serialize a value to JSON and encrypt it
    ///
    /// Failures propagate; there is no unencrypted fallback.
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T) -> HearthResult<String> {
        let json = SecureString::new(serde_json::to_string(value)?);
        encrypt_with_passphrase(json.as_bytes(), self.secret.as_str())
    }

    /// Decrypt a blob and deserialize the value it holds
    ///
    /// Any failure, whether a wrong key, a corrupt blob or an unexpected
    /// shape, is reported as [`HearthError::InvalidEncryptedPayload`].
    pub fn decrypt<T: DeserializeOwned>(&self, blob: &str) -> HearthResult<T> {
        self.try_decrypt(blob).map_err(|e| {
            tracing::warn!(error = %e, "rejected encrypted payload");
            HearthError::InvalidEncryptedPayload
        })
    }

    fn try_decrypt<T: DeserializeOwned>(&self, blob: &str) -> HearthResult<T> {
        let plaintext = decrypt_with_passphrase(blob, self.secret.as_str())?;
        let json = String::from_utf8(plaintext).map(SecureString::new).map_err(|e| {
            HearthError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e))
        })?;
        Ok(serde_json::from_str(json.as_str())?)
    }
}
