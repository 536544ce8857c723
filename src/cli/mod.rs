//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the crypto layer.

pub mod export;
pub mod message;

pub use export::{handle_export_command, handle_import_command, ExportArgs, ImportArgs};
pub use message::{handle_message_command, MessageCommands};
