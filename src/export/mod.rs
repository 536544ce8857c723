//! Export module for Hearth
//!
//! Provides encrypted backup and restore of the full application state.

pub mod archive;

pub use archive::{
    export_encrypted, import_encrypted, read_export_file, write_export_file, AppStateExport,
    EXPORT_SCHEMA_VERSION,
};
