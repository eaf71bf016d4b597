use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::storage::{decode_import, decode_lenient, ExportSnapshot, StorageBackend};
use crate::store::{sample_store, Collection, RecordStore};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub path: PathBuf,
    /// `true` when the sample data set was installed instead of a saved document.
    pub bootstrapped: bool,
}

/// Facade that coordinates the in-memory store, persistence, and backups.
pub struct StoreManager {
    store: RecordStore,
    storage: Box<dyn StorageBackend>,
    dirty: bool,
}

impl StoreManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            store: RecordStore::new(),
            storage,
            dirty: false,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Mutable access; the store is considered modified afterwards.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        self.dirty = true;
        &mut self.store
    }

    /// Runs `change` against the store, marking it modified only when it succeeds.
    pub fn apply<T, E>(
        &mut self,
        change: impl FnOnce(&mut RecordStore) -> Result<T, E>,
    ) -> Result<T, E> {
        let value = change(&mut self.store)?;
        self.dirty = true;
        Ok(value)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Loads the persisted document, falling back to the sample data set.
    ///
    /// A missing or unreadable document is replaced by the bootstrap data,
    /// which is saved immediately.
    pub fn load(&mut self, today: NaiveDate) -> Result<LoadMetadata, StoreError> {
        let path = self.storage.document_path();
        let raw = match self.storage.read_document()? {
            Some(raw) => raw,
            None => {
                info!(path = %path.display(), "no saved document; installing sample data");
                return self.bootstrap(today, Vec::new());
            }
        };
        match decode_lenient(&raw) {
            Ok(decoded) => {
                self.install(decoded.store, today);
                Ok(LoadMetadata {
                    warnings: decoded.warnings,
                    path,
                    bootstrapped: false,
                })
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "saved document unreadable");
                self.bootstrap(today, vec![format!("saved document unreadable: {}", err)])
            }
        }
    }

    fn bootstrap(
        &mut self,
        today: NaiveDate,
        warnings: Vec<String>,
    ) -> Result<LoadMetadata, StoreError> {
        self.store = sample_store(today);
        let path = self.save()?;
        Ok(LoadMetadata {
            warnings,
            path,
            bootstrapped: true,
        })
    }

    fn install(&mut self, mut store: RecordStore, today: NaiveDate) {
        for student in &mut store.students {
            student.refresh_age(today);
        }
        self.store = store;
        self.dirty = false;
    }

    pub fn save(&mut self) -> Result<PathBuf, StoreError> {
        self.store.touch();
        let path = self.storage.save_document(&self.store)?;
        self.dirty = false;
        Ok(path)
    }

    /// Writes a full export; without `path` the file lands in `dir` under the default name.
    pub fn export_snapshot(
        &self,
        path: Option<&Path>,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, StoreError> {
        let snapshot = ExportSnapshot::of(&self.store, now);
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => dir.join(snapshot.default_file_name()),
        };
        self.storage.write_file(&target, &snapshot.to_json()?)?;
        info!(path = %target.display(), "export written");
        Ok(target)
    }

    /// Replaces the collections present in `raw` and saves the result.
    ///
    /// The store is untouched when the input is rejected.
    pub fn import_snapshot_str(&mut self, raw: &str) -> Result<Vec<Collection>, StoreError> {
        let patch = decode_import(raw)?;
        let replaced = patch.apply(&mut self.store);
        info!(collections = replaced.len(), "import applied");
        self.save()?;
        Ok(replaced)
    }

    pub fn import_snapshot(&mut self, path: &Path) -> Result<Vec<Collection>, StoreError> {
        let raw = fs::read_to_string(path)?;
        self.import_snapshot_str(&raw)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, StoreError> {
        self.storage.backup(&self.store, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, StoreError> {
        self.storage.list_backups()
    }

    /// Restores a backup over the saved document and reloads from it.
    ///
    /// A backup that does not decode leaves both the document and the store untouched.
    pub fn restore(
        &mut self,
        backup_name: &str,
        today: NaiveDate,
    ) -> Result<LoadMetadata, StoreError> {
        let decoded = self.storage.restore_backup(backup_name)?;
        self.install(decoded.store, today);
        Ok(LoadMetadata {
            warnings: decoded.warnings,
            path: self.storage.document_path(),
            bootstrapped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn manager() -> (StoreManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("storage");
        (StoreManager::new(Box::new(storage)), temp)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn first_load_installs_and_saves_sample_data() {
        let (mut manager, _guard) = manager();
        let meta = manager.load(today()).expect("load");
        assert!(meta.bootstrapped);
        assert!(meta.path.exists());
        assert_eq!(manager.store().teachers.len(), 2);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn corrupt_document_falls_back_to_sample_data() {
        let (mut manager, _guard) = manager();
        let path = manager.storage().document_path();
        fs::write(&path, "{ definitely not json").unwrap();
        let meta = manager.load(today()).expect("load");
        assert!(meta.bootstrapped);
        assert_eq!(meta.warnings.len(), 1);
        assert_eq!(manager.store().students.len(), 2);
    }

    #[test]
    fn saved_changes_survive_reload() {
        let (mut manager, guard) = manager();
        manager.load(today()).unwrap();
        manager.store_mut().expenses.clear();
        assert!(manager.is_dirty());
        manager.save().unwrap();

        let storage =
            JsonStorage::new(Some(guard.path().to_path_buf()), Some(3)).expect("storage");
        let mut reopened = StoreManager::new(Box::new(storage));
        let meta = reopened.load(today()).unwrap();
        assert!(!meta.bootstrapped);
        assert!(reopened.store().expenses.is_empty());
        assert!(reopened.store().last_saved.is_some());
    }

    #[test]
    fn only_successful_changes_mark_store_dirty() {
        let (mut manager, _guard) = manager();
        manager.load(today()).unwrap();
        let rejected: Result<(), &str> = manager.apply(|_| Err("rejected"));
        assert!(rejected.is_err());
        assert!(!manager.is_dirty());

        let removed = manager
            .apply(|store| Ok::<_, StoreError>(store.expenses.drain(..).count()))
            .unwrap();
        assert!(removed > 0);
        assert!(manager.is_dirty());
    }

    #[test]
    fn rejected_import_leaves_store_alone() {
        let (mut manager, _guard) = manager();
        manager.load(today()).unwrap();
        let before = manager.store().clone();
        let err = manager
            .import_snapshot_str(r#"{"teachers": [{"name": 5}]}"#)
            .expect_err("invalid teachers");
        assert!(err.to_string().starts_with("Invalid backup file"));
        assert_eq!(manager.store(), &before);
    }

    #[test]
    fn export_uses_dated_default_name() {
        let (mut manager, guard) = manager();
        manager.load(today()).unwrap();
        let now = DateTime::parse_from_rfc3339("2024-06-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let path = manager.export_snapshot(None, guard.path(), now).unwrap();
        assert!(path.ends_with("tutoring-backup-2024-06-10.json"));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("\"exportDate\""));
    }
}
