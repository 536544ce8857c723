//! Per-family key derivation using HMAC-SHA256
//!
//! A family's chat passphrase is the hex-encoded HMAC-SHA256 of its owner id,
//! keyed with the application salt. The function is pure: the same owner id
//! and salt always produce the same key, so nothing is ever persisted.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{HearthError, HearthResult};

use super::SecureString;

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Application salt used when no configuration overrides it
pub const DEFAULT_APP_SALT: &str = "hearth-family-chat-salt-v1";

/// Length of a derived key in hex characters
pub const DERIVED_KEY_HEX_LEN: usize = 64;

/// A derived per-family passphrase
///
/// Holds the lowercase hex digest; wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    passphrase: SecureString,
}

impl DerivedKey {
    /// Get the passphrase text
    pub fn as_str(&self) -> &str {
        self.passphrase.as_str()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

/// Derives per-owner passphrases from a fixed application salt
#[derive(Clone)]
pub struct KeyDerivation {
    app_salt: SecureString,
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new(DEFAULT_APP_SALT)
    }
}

impl KeyDerivation {
    /// Create a key derivation with the given application salt
    pub fn new(app_salt: impl Into<String>) -> Self {
        Self {
            app_salt: SecureString::new(app_salt),
        }
    }

    /// Derive the passphrase for an owner id
    ///
    /// Callers are responsible for rejecting empty owner ids.
    pub fn derive(&self, owner_id: &str) -> HearthResult<DerivedKey> {
        let mut mac = HmacSha256::new_from_slice(self.app_salt.as_bytes())
            .map_err(|e| HearthError::Encryption(format!("HMAC key init failed: {}", e)))?;
        mac.update(owner_id.as_bytes());
        let digest = mac.finalize().into_bytes();

        Ok(DerivedKey {
            passphrase: SecureString::new(hex::encode(digest)),
        })
    }
}

impl std::fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDerivation").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_known_answer() {
        // openssl dgst -sha256 -hmac 'test-application-salt' <<< 'family-1' (no newline)
        let kdf = KeyDerivation::new("test-application-salt");
        let key = kdf.derive("family-1").unwrap();
        assert_eq!(
            key.as_str(),
            "ec4e103bc5e70c416a1a0a9ba24908d0df79e682c1d79b1d5b8218df5c88363e"
        );
    }

    #[test]
    fn test_derived_key_is_lowercase_hex() {
        let key = KeyDerivation::default().derive("family-1").unwrap();
        assert_eq!(key.as_str().len(), DERIVED_KEY_HEX_LEN);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_same_owner_same_key() {
        let kdf = KeyDerivation::default();
        let key1 = kdf.derive("family-1").unwrap();
        let key2 = kdf.derive("family-1").unwrap();
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_different_owner_different_key() {
        let kdf = KeyDerivation::default();
        let key1 = kdf.derive("family-A").unwrap();
        let key2 = kdf.derive("family-B").unwrap();
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = KeyDerivation::new("salt-one").derive("family-1").unwrap();
        let key2 = KeyDerivation::new("salt-two").derive("family-1").unwrap();
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_debug_is_redacted() {
        let kdf = KeyDerivation::new("very-secret-salt");
        let key = kdf.derive("family-1").unwrap();
        assert!(!format!("{:?}", kdf).contains("very-secret-salt"));
        assert!(!format!("{:?}", key).contains(key.as_str()));
    }
}
