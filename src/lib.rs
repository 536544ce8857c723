//! Hearth - encryption layer for a local-first family finance tracker
//!
//! This library protects the two pieces of user data that leave the
//! in-memory app state: family chat messages and full-state backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Key derivation, the OpenSSL-compatible passphrase format,
//!   and the message and data ciphers built on it
//! - `export`: Encrypted application-state archives
//! - `cli`: Command handlers for the `hearth` binary
//!
//! Chat messages are tolerant: a message that can't be encrypted is stored
//! as-is, and anything that can't be decrypted is shown as-is. Backups are
//! strict: a restore that can't be decrypted fails loudly.
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth::crypto::{DataCipher, MessageCipher};
//!
//! let messages = MessageCipher::default();
//! let blob = messages.encrypt("Rent is paid", "family-1");
//! assert_eq!(messages.decrypt(&blob, "family-1"), "Rent is paid");
//!
//! let backups = DataCipher::default();
//! let blob = backups.encrypt(&state)?;
//! let restored: serde_json::Value = backups.decrypt(&blob)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;

pub use error::{HearthError, HearthResult};
