//! User settings for Hearth
//!
//! Holds the crypto configuration injected into the ciphers: the application
//! salt for family key derivation, the export secret for backups, and the
//! size of the derived-key cache.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::paths::HearthPaths;
use crate::crypto::{DEFAULT_APP_SALT, DEFAULT_EXPORT_SECRET, DEFAULT_KEY_CACHE_CAPACITY};
use crate::error::HearthError;

/// Crypto configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CryptoSettings {
    /// Salt keying the HMAC that derives per-family chat passphrases
    #[serde(default = "default_app_salt")]
    pub app_salt: String,

    /// Passphrase protecting exported backups
    #[serde(default = "default_export_secret")]
    pub export_secret: String,

    /// Number of derived family keys kept in memory (0 disables the cache)
    #[serde(default = "default_key_cache_capacity")]
    pub key_cache_capacity: usize,
}

fn default_app_salt() -> String {
    DEFAULT_APP_SALT.to_string()
}

fn default_export_secret() -> String {
    DEFAULT_EXPORT_SECRET.to_string()
}

fn default_key_cache_capacity() -> usize {
    DEFAULT_KEY_CACHE_CAPACITY
}

impl Default for CryptoSettings {
    fn default() -> Self {
        Self {
            app_salt: default_app_salt(),
            export_secret: default_export_secret(),
            key_cache_capacity: default_key_cache_capacity(),
        }
    }
}

impl CryptoSettings {
    /// Whether the salt and secret are the built-in defaults
    pub fn uses_builtin_secrets(&self) -> bool {
        self.app_salt == DEFAULT_APP_SALT && self.export_secret == DEFAULT_EXPORT_SECRET
    }
}

// Secrets stay out of Debug output
impl fmt::Debug for CryptoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoSettings")
            .field("app_salt", &"[REDACTED]")
            .field("export_secret", &"[REDACTED]")
            .field("key_cache_capacity", &self.key_cache_capacity)
            .finish()
    }
}

/// User settings for Hearth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Crypto configuration
    #[serde(default)]
    pub crypto: CryptoSettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            crypto: CryptoSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &HearthPaths) -> Result<Self, HearthError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                HearthError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                HearthError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HearthPaths) -> Result<(), HearthError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            HearthError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            HearthError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
