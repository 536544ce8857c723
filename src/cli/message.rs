//! Chat message CLI commands
//!
//! Encrypts and decrypts single family chat messages, mostly useful for
//! inspecting stored rows by hand.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::crypto::{MessageCipher, MessageDecryption};
use crate::error::{HearthError, HearthResult};

/// Chat message commands
#[derive(Subcommand, Debug)]
pub enum MessageCommands {
    /// Encrypt a chat message for a family
    Encrypt {
        /// Family (owner) id
        #[arg(short, long)]
        owner: String,
        /// Message text
        text: String,
    },

    /// Decrypt a stored chat message (legacy plaintext is printed as-is)
    Decrypt {
        /// Family (owner) id
        #[arg(short, long)]
        owner: String,
        /// Stored message text
        text: String,

        /// Report whether the message was decrypted or passed through
        #[arg(long)]
        explain: bool,
    },
}

/// Handle message commands
pub fn handle_message_command(settings: &Settings, cmd: MessageCommands) -> HearthResult<()> {
    let cipher = MessageCipher::from_settings(&settings.crypto);

    match cmd {
        MessageCommands::Encrypt { owner, text } => {
            validate_owner(&owner)?;
            println!("{}", cipher.encrypt(&text, &owner));
        }
        MessageCommands::Decrypt {
            owner,
            text,
            explain,
        } => {
            validate_owner(&owner)?;
            match cipher.decrypt_tagged(&text, &owner) {
                MessageDecryption::Decrypted(plain) => {
                    if explain {
                        eprintln!("decrypted");
                    }
                    println!("{}", plain);
                }
                MessageDecryption::PassThrough(original) => {
                    if explain {
                        eprintln!("passed through unchanged");
                    }
                    println!("{}", original);
                }
            }
        }
    }

    Ok(())
}

/// Owner ids feed key derivation and must not be empty
fn validate_owner(owner: &str) -> HearthResult<()> {
    if owner.trim().is_empty() {
        return Err(HearthError::Validation("Owner id must not be empty".to_string()));
    }
    Ok(())
}
