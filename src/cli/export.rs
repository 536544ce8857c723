//! CLI commands for encrypted backup and restore
//!
//! `export` encrypts an application-state JSON file into an archive;
//! `import` decrypts an archive back into state JSON.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::settings::Settings;
use crate::crypto::DataCipher;
use crate::error::{HearthError, HearthResult};
use crate::export::{read_export_file, write_export_file};

/// Arguments for `hearth export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Application-state JSON file to back up
    pub state: PathBuf,

    /// Archive file to write
    pub output: PathBuf,
}

/// Arguments for `hearth import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Archive file to restore
    pub archive: PathBuf,

    /// Write the restored state here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `hearth export`
pub fn handle_export_command(settings: &Settings, args: ExportArgs) -> HearthResult<()> {
    let contents = fs::read_to_string(&args.state).map_err(|e| {
        HearthError::Io(format!("Failed to read {}: {}", args.state.display(), e))
    })?;
    let state: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
        HearthError::Export(format!("{} is not valid JSON: {}", args.state.display(), e))
    })?;

    let cipher = DataCipher::from_settings(&settings.crypto);
    let export = write_export_file(&cipher, state, &args.output)?;

    println!("Encrypted backup written to: {}", args.output.display());
    println!("Exported at: {}", export.exported_at.to_rfc3339());
    Ok(())
}

/// Handle `hearth import`
pub fn handle_import_command(settings: &Settings, args: ImportArgs) -> HearthResult<()> {
    let cipher = DataCipher::from_settings(&settings.crypto);
    let export = read_export_file(&cipher, &args.archive)?;
    let json = serde_json::to_string_pretty(&export.state)?;

    match args.output {
        Some(path) => {
            fs::write(&path, json).map_err(|e| {
                HearthError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            println!("Restored state written to: {}", path.display());
            println!(
                "Backup created {} by version {}",
                export.exported_at.to_rfc3339(),
                export.app_version
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
