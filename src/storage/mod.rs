pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{errors::StoreError, store::RecordStore};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends holding the single store document.
pub trait StorageBackend {
    /// Location of the managed document.
    fn document_path(&self) -> PathBuf;

    /// Raw document contents, or `None` when nothing has been saved yet.
    fn read_document(&self) -> Result<Option<String>>;

    /// Persists the whole store, backing up the previous document first.
    fn save_document(&self, store: &RecordStore) -> Result<PathBuf>;

    /// Writes a labelled snapshot of `store` next to the automatic backups.
    fn backup(&self, store: &RecordStore, note: Option<&str>) -> Result<PathBuf>;

    /// Backup file names, newest first.
    fn list_backups(&self) -> Result<Vec<String>>;

    /// Decodes a backup and, once it parses, copies it over the managed document.
    fn restore_backup(&self, backup_name: &str) -> Result<LenientDecode>;

    /// Writes `contents` to an arbitrary path atomically.
    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        json_backend::write_atomic_replace(path, contents)
    }
}

pub use json_backend::{
    decode_import, decode_lenient, ExportSnapshot, ImportPatch, JsonStorage, LenientDecode,
};
