//! Cryptographic functions for Hearth
//!
//! Provides OpenSSL-compatible AES-256-CBC passphrase encryption, used two ways:
//! per-family chat messages keyed by an HMAC-SHA256 derived passphrase, and
//! whole-state backups keyed by the application export secret.

pub mod data;
pub mod encryption;
pub mod key_cache;
pub mod key_derivation;
pub mod message;
pub mod secure_memory;

pub use data::{DataCipher, DEFAULT_EXPORT_SECRET};
pub use encryption::{decrypt_with_passphrase, encrypt_with_passphrase};
pub use key_cache::{KeyCache, DEFAULT_KEY_CACHE_CAPACITY};
pub use key_derivation::{DerivedKey, KeyDerivation, DEFAULT_APP_SALT};
pub use message::{MessageCipher, MessageDecryption, MessageEncryption};
pub use secure_memory::{SecureBytes, SecureString};
