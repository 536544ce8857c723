use anyhow::Result;
use clap::{Parser, Subcommand};

use hearth::cli::{
    handle_export_command, handle_import_command, handle_message_command, ExportArgs, ImportArgs,
    MessageCommands,
};
use hearth::config::{paths::HearthPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Encryption tools for the Hearth family finance tracker",
    long_about = "Hearth encrypts family chat messages with per-family keys and \
                  produces encrypted backups of the full application state that \
                  can be restored by any Hearth version."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Family chat message encryption
    #[command(subcommand, alias = "msg")]
    Message(MessageCommands),

    /// Encrypt an application-state JSON file into a backup archive
    Export(ExportArgs),

    /// Restore application state from an encrypted backup archive
    #[command(alias = "restore")]
    Import(ImportArgs),

    /// Write the default configuration file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hearth=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = HearthPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    tracing::debug!(base_dir = %paths.base_dir().display(), "settings loaded");

    match cli.command {
        Some(Commands::Message(cmd)) => handle_message_command(&settings, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&settings, args)?,
        Some(Commands::Import(args)) => handle_import_command(&settings, args)?,
        Some(Commands::Init) => {
            println!("Initializing Hearth at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!(
                "Edit {} to set your own app salt and export secret.",
                paths.settings_file().display()
            );
            println!("Changing them makes existing messages and backups unreadable.");
        }
        Some(Commands::Config) => {
            println!("Hearth Configuration");
            println!("====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Crypto:");
            println!("  App salt:           [REDACTED]");
            println!("  Export secret:      [REDACTED]");
            println!("  Built-in secrets:   {}", settings.crypto.uses_builtin_secrets());
            println!("  Key cache capacity: {}", settings.crypto.key_cache_capacity);
        }
        None => {
            println!("Hearth - encryption for family chat and backups");
            println!();
            println!("Run 'hearth --help' for usage information.");
        }
    }

    Ok(())
}
