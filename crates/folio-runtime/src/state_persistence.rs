#![forbid(unsafe_code)]

//! Key/value preference storage.
//!
//! Preferences are small string values (the theme is stored under `"theme"`
//! as `"dark"` / `"light"`). A [`PreferenceStore`] is shared behind an `Arc`
//! by everything that persists a preference.
//!
//! # Invariants
//!
//! 1. Storage failures never panic; every operation returns [`StorageResult`].
//! 2. [`FileStorage`] writes atomically: `{path}.tmp` is written, synced and
//!    renamed over the target.
//! 3. A missing file reads as an empty store.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, in-memory state unaffected |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error |
//! | `StorageError::Corruption` | Poisoned lock, unknown format version | Returns error |
//!
//! # Feature Gates
//!
//! - `state-persistence`: enables [`FileStorage`] with JSON serialization.
//!   Without it only [`MemoryStorage`] is available.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Errors raised by preference storage.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
    /// Storage is in an unusable state.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(_) => None,
            StorageError::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Pluggable string preference storage.
pub trait PreferenceStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a preference. `Ok(None)` when the key was never stored.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store a preference, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a preference. Returns whether it existed.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Whether the backend can currently store values.
    fn is_available(&self) -> bool {
        true
    }
}

fn poisoned() -> StorageError {
    StorageError::Corruption("lock poisoned".into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store; values are lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        Ok(guard.remove(key).is_some())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    #[derive(Serialize, Deserialize)]
    struct PreferenceFile {
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl PreferenceFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// JSON file store.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": { "theme": "light" }
    /// }
    /// ```
    ///
    /// The file is read once, on first access, and cached. Every `set` or
    /// `remove` rewrites the whole file.
    pub struct FileStorage {
        path: PathBuf,
        cache: RwLock<Option<HashMap<String, String>>>,
    }

    impl FileStorage {
        /// Create a store at `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                cache: RwLock::new(None),
            }
        }

        /// Store at `$XDG_STATE_HOME/folio/{app_name}/preferences.json`,
        /// falling back to `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
                PathBuf::from(state_home)
            } else if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(home).join(".local").join("state")
            } else {
                PathBuf::from(".")
            };
            Self::new(base.join("folio").join(app_name).join("preferences.json"))
        }

        /// Location of the backing file.
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn read_file(&self) -> StorageResult<HashMap<String, String>> {
            if !self.path.exists() {
                return Ok(HashMap::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: PreferenceFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse preference file: {e}"))
            })?;
            if file.format_version != PreferenceFile::FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "unsupported format version {} (expected {})",
                    file.format_version,
                    PreferenceFile::FORMAT_VERSION
                )));
            }
            Ok(file.entries)
        }

        fn write_file(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = PreferenceFile {
                format_version: PreferenceFile::FORMAT_VERSION,
                entries: entries.clone(),
            };
            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize preferences: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;
            tracing::debug!(
                path = %self.path.display(),
                entries = entries.len(),
                "saved preferences"
            );
            Ok(())
        }

        /// Run `f` on the cached entries, loading them first if needed.
        fn with_entries<R>(
            &self,
            f: impl FnOnce(&mut HashMap<String, String>) -> StorageResult<R>,
        ) -> StorageResult<R> {
            let mut guard = self.cache.write().map_err(|_| poisoned())?;
            if guard.is_none() {
                *guard = Some(self.read_file()?);
            }
            match guard.as_mut() {
                Some(entries) => f(entries),
                None => Err(poisoned()),
            }
        }
    }

    impl PreferenceStore for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.with_entries(|entries| Ok(entries.get(key).cloned()))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.with_entries(|entries| {
                let previous = entries.insert(key.to_owned(), value.to_owned());
                if let Err(e) = self.write_file(entries) {
                    match previous {
                        Some(old) => entries.insert(key.to_owned(), old),
                        None => entries.remove(key),
                    };
                    return Err(e);
                }
                Ok(())
            })
        }

        fn remove(&self, key: &str) -> StorageResult<bool> {
            self.with_entries(|entries| {
                let Some(old) = entries.remove(key) else {
                    return Ok(false);
                };
                if let Err(e) = self.write_file(entries) {
                    entries.insert(key.to_owned(), old);
                    return Err(e);
                }
                Ok(true)
            })
        }

        fn is_available(&self) -> bool {
            match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    parent.exists() || fs::create_dir_all(parent).is_ok()
                }
                _ => true,
            }
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;


#[cfg(all(test, feature = "state-persistence"))]
mod file_storage_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");

        FileStorage::new(&path).set("theme", "light").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("absent.json"));
        assert_eq!(storage.get("theme").unwrap(), None);
        assert!(!storage.remove("theme").unwrap());
    }

    #[test]
    fn file_storage_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dirs").join("prefs.json");
        let storage = FileStorage::new(&path);
        assert!(storage.is_available());
        storage.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_storage_remove_rewrites_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        let storage = FileStorage::new(&path);
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        assert!(storage.remove("a").unwrap());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn file_storage_rejects_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = FileStorage::new(&path).get("theme").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn file_storage_rejects_unknown_version() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        std::fs::write(&path, r#"{"format_version":9,"entries":{"theme":"dark"}}"#).unwrap();
        let err = FileStorage::new(&path).get("theme").unwrap_err();
        assert!(matches!(err, StorageError::Corruption(_)));
    }
}
