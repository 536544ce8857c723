//! Encrypted application-state archives
//!
//! An archive is the full app state wrapped in a small versioned envelope,
//! serialized to JSON and encrypted with the [`DataCipher`]. On disk it is a
//! single base64 line, so exports from one version import into another.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::DataCipher;
use crate::error::{HearthError, HearthResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Envelope around an exported application state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStateExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The exported application state
    pub state: serde_json::Value,
}

impl AppStateExport {
    /// Wrap a state object for export
    pub fn new(state: serde_json::Value) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            state,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if !self.state.is_object() {
            return Err("Exported state must be a JSON object".to_string());
        }

        Ok(())
    }
}

/// Encrypt a state object and write the archive to `writer`
pub fn export_encrypted<W: Write>(
    cipher: &DataCipher,
    state: serde_json::Value,
    writer: &mut W,
) -> HearthResult<AppStateExport> {
    let export = AppStateExport::new(state);
    export.validate().map_err(HearthError::Export)?;

    let blob = cipher.encrypt(&export)?;
    writeln!(writer, "{}", blob)
        .map_err(|e| HearthError::Export(format!("Failed to write archive: {}", e)))?;

    Ok(export)
}

/// Decrypt and validate archive contents
///
/// Wrong keys and corrupt archives fail with
/// [`HearthError::InvalidEncryptedPayload`]; nothing partial is returned.
pub fn import_encrypted(cipher: &DataCipher, contents: &str) -> HearthResult<AppStateExport> {
    let export: AppStateExport = cipher.decrypt(contents.trim())?;
    export.validate().map_err(HearthError::Import)?;
    Ok(export)
}

/// Encrypt a state object into an archive file
///
/// The archive is fully encrypted in memory, written next to `path` and then
/// renamed over it, so a failed export leaves any existing archive intact.
pub fn write_export_file(
    cipher: &DataCipher,
    state: serde_json::Value,
    path: &Path,
) -> HearthResult<AppStateExport> {
    let mut buffer = Vec::new();
    let export = export_encrypted(cipher, state, &mut buffer)?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(&buffer)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        let reason = format!("Failed to write {}: {}", temp_path.display(), e);
        return Err(HearthError::Io(reason));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        HearthError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(export)
}

/// Read and decrypt an archive file
pub fn read_export_file(cipher: &DataCipher, path: &Path) -> HearthResult<AppStateExport> {
    let contents = fs::read_to_string(path).map_err(|e| {
        HearthError::Io(format!("Failed to read archive {}: {}", path.display(), e))
    })?;
    import_encrypted(cipher, &contents)
}
