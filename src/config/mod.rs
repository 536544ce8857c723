//! Configuration module for Hearth
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Crypto settings persistence

pub mod paths;
pub mod settings;

pub use paths::HearthPaths;
pub use settings::{CryptoSettings, Settings};
