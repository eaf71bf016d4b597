use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::{Course, Expense, Payment, Session, Student, Teacher},
    errors::StoreError,
    store::{Collection, RecordStore},
};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "tutoring_center";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    document_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let data_dir = PathResolver::data_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&data_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            document_path: PathResolver::document_file_in(&app_root),
            root: app_root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    /// Resolves a user-supplied backup name, refusing anything outside the backups directory.
    fn checked_backup_path(&self, backup_name: &str) -> Result<PathBuf> {
        let is_plain_file_name = !backup_name.is_empty()
            && !backup_name.contains(['/', '\\'])
            && Path::new(backup_name).file_name().and_then(|name| name.to_str())
                == Some(backup_name);
        if !is_plain_file_name {
            return Err(StoreError::Persistence(format!(
                "invalid backup name `{}`",
                backup_name
            )));
        }
        Ok(self.backup_path(backup_name))
    }

    fn backup_file_name(note: Option<&str>) -> String {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut name = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{}", BACKUP_EXTENSION));
        name
    }

    fn backup_existing_file(&self) -> Result<()> {
        if !self.document_path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let backup_path = self.backup_path(&Self::backup_file_name(None));
        fs::copy(&self.document_path, &backup_path)?;
        self.prune_backups()?;
        Ok(())
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(entry)) {
                warn!(backup = %entry, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn document_path(&self) -> PathBuf {
        self.document_path.clone()
    }

    fn read_document(&self) -> Result<Option<String>> {
        if !self.document_path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.document_path)?))
    }

    fn save_document(&self, store: &RecordStore) -> Result<PathBuf> {
        self.backup_existing_file()?;
        save_store_to_path(store, &self.document_path)?;
        info!(path = %self.document_path.display(), "store saved");
        Ok(self.document_path.clone())
    }

    fn backup(&self, store: &RecordStore, note: Option<&str>) -> Result<PathBuf> {
        ensure_dir(&self.backups_dir)?;
        let path = self.backup_path(&Self::backup_file_name(note));
        let json = serde_json::to_string_pretty(store)?;
        write_atomic_replace(&path, &json)?;
        self.prune_backups()?;
        Ok(path)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup_name: &str) -> Result<LenientDecode> {
        let backup_path = self.checked_backup_path(backup_name)?;
        if !backup_path.is_file() {
            return Err(StoreError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let contents = fs::read_to_string(&backup_path)?;
        let decoded = decode_lenient(&contents)?;
        write_atomic_replace(&self.document_path, &contents)?;
        info!(backup = backup_name, "backup restored");
        Ok(decoded)
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        write_atomic_replace(path, contents)
    }
}

pub fn save_store_to_path(store: &RecordStore, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    write_atomic_replace(path, &json)
}

/// Full-document export: every collection plus the moment it was taken.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot<'a> {
    pub students: &'a [Student],
    pub teachers: &'a [Teacher],
    pub courses: &'a [Course],
    pub payments: &'a [Payment],
    pub sessions: &'a [Session],
    pub expenses: &'a [Expense],
    pub export_date: DateTime<Utc>,
}

impl<'a> ExportSnapshot<'a> {
    pub fn of(store: &'a RecordStore, export_date: DateTime<Utc>) -> Self {
        Self {
            students: &store.students,
            teachers: &store.teachers,
            courses: &store.courses,
            payments: &store.payments,
            sessions: &store.sessions,
            expenses: &store.expenses,
            export_date,
        }
    }

    /// File name offered for an export taken on `export_date`.
    pub fn default_file_name(&self) -> String {
        format!("tutoring-backup-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Outcome of a tolerant document load.
#[derive(Debug)]
pub struct LenientDecode {
    pub store: RecordStore,
    pub warnings: Vec<String>,
}

/// Decodes a persisted document, keeping whatever collections are readable.
///
/// Fails only when the text is not a JSON object at all; a collection that is
/// missing, not an array, or holds malformed records becomes empty and is
/// reported in `warnings`.
pub fn decode_lenient(raw: &str) -> Result<LenientDecode> {
    let value: Value = serde_json::from_str(raw)?;
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidDocument("document is not a JSON object".into()))?;

    let mut warnings = Vec::new();
    let mut store = RecordStore {
        students: lenient(object, Collection::Students, &mut warnings),
        teachers: lenient(object, Collection::Teachers, &mut warnings),
        courses: lenient(object, Collection::Courses, &mut warnings),
        payments: lenient(object, Collection::Payments, &mut warnings),
        sessions: lenient(object, Collection::Sessions, &mut warnings),
        expenses: lenient(object, Collection::Expenses, &mut warnings),
        last_saved: None,
    };
    store.last_saved = object
        .get("lastSaved")
        .and_then(|value| DateTime::<Utc>::deserialize(value).ok());
    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(LenientDecode { store, warnings })
}

fn lenient<T: DeserializeOwned>(
    object: &Map<String, Value>,
    collection: Collection,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    match object.get(collection.key()) {
        Some(value @ Value::Array(_)) => Vec::<T>::deserialize(value).unwrap_or_else(|err| {
            warnings.push(format!(
                "collection `{}` is malformed and was reset: {}",
                collection.key(),
                err
            ));
            Vec::new()
        }),
        Some(_) => {
            warnings.push(format!(
                "collection `{}` is not an array and was reset",
                collection.key()
            ));
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Collections found in an imported snapshot; `None` leaves the current one alone.
#[derive(Debug, Default)]
pub struct ImportPatch {
    pub students: Option<Vec<Student>>,
    pub teachers: Option<Vec<Teacher>>,
    pub courses: Option<Vec<Course>>,
    pub payments: Option<Vec<Payment>>,
    pub sessions: Option<Vec<Session>>,
    pub expenses: Option<Vec<Expense>>,
}

impl ImportPatch {
    /// Replaces every collection carried by the patch and returns which ones changed.
    pub fn apply(self, store: &mut RecordStore) -> Vec<Collection> {
        let mut replaced = Vec::new();
        if let Some(students) = self.students {
            store.students = students;
            replaced.push(Collection::Students);
        }
        if let Some(teachers) = self.teachers {
            store.teachers = teachers;
            replaced.push(Collection::Teachers);
        }
        if let Some(courses) = self.courses {
            store.courses = courses;
            replaced.push(Collection::Courses);
        }
        if let Some(payments) = self.payments {
            store.payments = payments;
            replaced.push(Collection::Payments);
        }
        if let Some(sessions) = self.sessions {
            store.sessions = sessions;
            replaced.push(Collection::Sessions);
        }
        if let Some(expenses) = self.expenses {
            store.expenses = expenses;
            replaced.push(Collection::Expenses);
        }
        replaced
    }
}

/// Decodes an import strictly: any unreadable array rejects the whole file.
pub fn decode_import(raw: &str) -> Result<ImportPatch> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| StoreError::InvalidDocument(err.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidDocument("expected a JSON object".into()))?;
    Ok(ImportPatch {
        students: strict(object, Collection::Students)?,
        teachers: strict(object, Collection::Teachers)?,
        courses: strict(object, Collection::Courses)?,
        payments: strict(object, Collection::Payments)?,
        sessions: strict(object, Collection::Sessions)?,
        expenses: strict(object, Collection::Expenses)?,
    })
}

fn strict<T: DeserializeOwned>(
    object: &Map<String, Value>,
    collection: Collection,
) -> Result<Option<Vec<T>>> {
    match object.get(collection.key()) {
        Some(value @ Value::Array(_)) => Vec::<T>::deserialize(value)
            .map(Some)
            .map_err(|err| StoreError::InvalidDocument(format!("{}: {}", collection.key(), err))),
        _ => Ok(None),
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        let raw = format!("{}{}", pair[0], pair[1]);
        NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Plain create-and-write; callers wanting atomicity go through [`write_atomic_replace`].
fn write_file_direct(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Stages `data` in a sibling temp file and renames it over `path`.
pub(crate) fn write_atomic_replace(path: &Path, data: &str) -> Result<()> {
    let tmp = tmp_path(path);
    write_file_direct(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Teacher;
    use tempfile::TempDir;

    fn storage_with_temp_dir(retention: usize) -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_read_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir(3);
        assert!(storage.read_document().unwrap().is_none());
        let mut store = RecordStore::new();
        store.add_teacher(Teacher::new("Alice", 30.0));
        storage.save_document(&store).expect("save store");
        let raw = storage.read_document().unwrap().expect("document written");
        let decoded = decode_lenient(&raw).unwrap();
        assert_eq!(decoded.store.teachers, store.teachers);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn labelled_backup_is_listed() {
        let (storage, _guard) = storage_with_temp_dir(3);
        let store = RecordStore::new();
        let path = storage.backup(&store, Some("Term End")).expect("backup");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("tutoring_center_"));
        assert!(name.ends_with("_term-end.json"));
        assert_eq!(storage.list_backups().unwrap(), vec![name.to_string()]);
    }

    #[test]
    fn lenient_decode_resets_bad_collections() {
        let raw = r#"{
            "teachers": [{"id": 1, "name": "Alice", "hourlyRate": 30}],
            "courses": "oops",
            "expenses": [{"id": "x"}]
        }"#;
        let decoded = decode_lenient(raw).unwrap();
        assert_eq!(decoded.store.teachers.len(), 1);
        assert!(decoded.store.courses.is_empty());
        assert!(decoded.store.expenses.is_empty());
        assert_eq!(decoded.warnings.len(), 2);
    }

    #[test]
    fn import_only_touches_present_arrays() {
        let mut store = RecordStore::new();
        store.add_teacher(Teacher::new("Alice", 30.0));
        store.add_expense(Expense::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Ink",
            4.0,
        ));
        let patch = decode_import(r#"{"expenses": [], "teachers": null}"#).unwrap();
        let replaced = patch.apply(&mut store);
        assert_eq!(replaced, vec![Collection::Expenses]);
        assert_eq!(store.teachers.len(), 1);
        assert!(store.expenses.is_empty());
    }

    #[test]
    fn import_rejects_non_json() {
        let err = decode_import("not json at all").expect_err("must reject");
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[test]
    fn backup_timestamps_parse_with_notes() {
        assert!(parse_backup_timestamp("tutoring_center_20240102_030405_term-end.json").is_some());
        assert!(parse_backup_timestamp("tutoring_center_20240102_030405.json").is_some());
        assert!(parse_backup_timestamp("notes.json").is_none());
    }

    #[test]
    fn manual_backup_leaves_no_staging_file() {
        let (storage, guard) = storage_with_temp_dir(3);
        storage.backup(&RecordStore::new(), None).expect("backup");
        let leftovers: Vec<_> = fs::read_dir(guard.path().join("backups"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn unremovable_backup_does_not_fail_pruning() {
        let (storage, _guard) = storage_with_temp_dir(1);
        let stuck = storage.backup_path("tutoring_center_20000101_000000.json");
        fs::create_dir(&stuck).unwrap();
        let path = storage.backup(&RecordStore::new(), None).expect("backup");
        assert!(path.exists());
        assert!(stuck.is_dir());
    }

    #[test]
    fn restore_validates_before_replacing_document() {
        let (storage, _guard) = storage_with_temp_dir(3);
        storage.save_document(&RecordStore::new()).unwrap();
        let before = storage.read_document().unwrap();
        fs::write(storage.backup_path("tutoring_center_20240101_000000.json"), "[1, 2]").unwrap();

        let err = storage
            .restore_backup("tutoring_center_20240101_000000.json")
            .expect_err("array document");
        assert!(matches!(err, StoreError::InvalidDocument(_)));
        assert_eq!(storage.read_document().unwrap(), before);
    }

    #[test]
    fn backup_names_must_stay_in_backups_dir() {
        let (storage, _guard) = storage_with_temp_dir(3);
        for name in ["../data/tutoring_center.json", "..\\x.json", ".", ""] {
            assert!(storage.checked_backup_path(name).is_err(), "{name}");
        }
        assert!(storage
            .checked_backup_path("tutoring_center_20240101_000000.json")
            .is_ok());
    }
}
