//! Registry of offline models a client has marked as downloaded.
//!
//! State lives in a single JSON array of language codes. Every mutation runs
//! read-modify-persist under one mutex, and the file is replaced atomically
//! (write to a sibling temp file, then rename) so readers never see a torn
//! write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// File name of the registry store inside the models directory.
pub const STORE_FILE_NAME: &str = "downloaded.json";

/// Failure reading or writing the registry store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Model registry I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model registry at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Handle to the downloaded-models store.
///
/// Clones share the same lock, so every clone handed to a blocking task
/// serialises against the others.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models_dir: PathBuf,
    store_path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ModelRegistry {
    /// Create a registry rooted at `models_dir`. Nothing is touched on disk
    /// until the first mutation.
    ///
    /// # Arguments
    /// * `models_dir` - Directory holding `downloaded.json`
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        let models_dir = models_dir.into();
        let store_path = models_dir.join(STORE_FILE_NAME);
        Self {
            models_dir,
            store_path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Directory reported as `storage_path`.
    pub fn storage_path(&self) -> &Path {
        &self.models_dir
    }

    /// Full path of the JSON store file.
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Current downloaded set. A missing store is the empty set.
    ///
    /// # Returns
    /// * `Ok(codes)` in insertion order, without duplicates
    /// * `Err(StorageError::Corrupt)` if the store is not a JSON string array
    /// * `Err(StorageError::Io)` if the store cannot be read
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let _guard = self.lock();
        self.load()
    }

    /// Mark `code` as downloaded.
    ///
    /// # Arguments
    /// * `code` - Language code to add
    ///
    /// # Returns
    /// * `Ok(true)` if the code was added and the store rewritten
    /// * `Ok(false)` if it was already present (nothing is written)
    /// * `Err(StorageError)` if the store cannot be read or written
    pub fn add(&self, code: &str) -> Result<bool, StorageError> {
        let _guard = self.lock();
        let mut codes = self.load()?;

        if codes.iter().any(|c| c == code) {
            debug!("Model '{}' already marked as downloaded", code);
            return Ok(false);
        }

        codes.push(code.to_string());
        self.persist(&codes)?;
        info!("Marked model '{}' as downloaded ({} total)", code, codes.len());
        Ok(true)
    }

    /// Unmark `code`.
    ///
    /// # Arguments
    /// * `code` - Language code to remove
    ///
    /// # Returns
    /// * `Ok(true)` if the code was removed and the store rewritten
    /// * `Ok(false)` if it was not present (nothing is written)
    /// * `Err(StorageError)` if the store cannot be read or written
    pub fn remove(&self, code: &str) -> Result<bool, StorageError> {
        let _guard = self.lock();
        let mut codes = self.load()?;

        let before = codes.len();
        codes.retain(|c| c != code);
        if codes.len() == before {
            debug!("Model '{}' was not marked as downloaded", code);
            return Ok(false);
        }

        self.persist(&codes)?;
        info!("Removed model '{}' ({} remaining)", code, codes.len());
        Ok(true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Result<Vec<String>, StorageError> {
        let contents = match fs::read_to_string(&self.store_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let codes: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                path: self.store_path.clone(),
                source,
            })?;

        // Stores written by older tools may contain duplicates.
        let mut unique = Vec::with_capacity(codes.len());
        for code in codes {
            if !unique.contains(&code) {
                unique.push(code);
            }
        }
        Ok(unique)
    }

    fn persist(&self, codes: &[String]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.models_dir).map_err(|e| StorageError::Io {
            path: self.models_dir.clone(),
            source: e,
        })?;

        let json = serde_json::to_string(codes).map_err(|source| StorageError::Corrupt {
            path: self.store_path.clone(),
            source,
        })?;

        let tmp_path = self.store_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| StorageError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.store_path).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.store_path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Helper Functions ====================

    fn create_test_registry() -> (ModelRegistry, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let registry = ModelRegistry::new(temp_dir.path().join("models"));
        (registry, temp_dir)
    }

    // ==================== list Tests ====================

    #[test]
    fn test_list_without_store_is_empty() {
        let (registry, _temp_dir) = create_test_registry();

        let codes = registry.list().expect("Should list");

        assert!(codes.is_empty());
        assert!(!registry.store_path().exists(), "list should not create the store");
    }

    #[test]
    fn test_list_reads_existing_store() {
        let (registry, _temp_dir) = create_test_registry();
        fs::create_dir_all(registry.storage_path()).unwrap();
        fs::write(registry.store_path(), r#"["hi","ta"]"#).unwrap();

        assert_eq!(registry.list().unwrap(), vec!["hi", "ta"]);
    }

    #[test]
    fn test_list_collapses_duplicates_in_store() {
        let (registry, _temp_dir) = create_test_registry();
        fs::create_dir_all(registry.storage_path()).unwrap();
        fs::write(registry.store_path(), r#"["hi","hi","bn"]"#).unwrap();

        assert_eq!(registry.list().unwrap(), vec!["hi", "bn"]);
    }

    #[test]
    fn test_list_corrupt_store_is_error() {
        let (registry, _temp_dir) = create_test_registry();
        fs::create_dir_all(registry.storage_path()).unwrap();
        fs::write(registry.store_path(), "{not json").unwrap();

        let result = registry.list();

        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    // ==================== add Tests ====================

    #[test]
    fn test_add_creates_store() {
        let (registry, _temp_dir) = create_test_registry();

        assert!(registry.add("hi").expect("Should add"));

        assert!(registry.store_path().exists());
        let raw = fs::read_to_string(registry.store_path()).unwrap();
        assert_eq!(raw, r#"["hi"]"#);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (registry, _temp_dir) = create_test_registry();

        assert!(registry.add("hi").unwrap());
        assert!(!registry.add("hi").unwrap());

        let codes = registry.list().unwrap();
        assert_eq!(codes.iter().filter(|c| *c == "hi").count(), 1);
    }

    #[test]
    fn test_add_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let registry = ModelRegistry::new(temp_dir.path());
            registry.add("ml").unwrap();
        }

        let reopened = ModelRegistry::new(temp_dir.path());
        assert_eq!(reopened.list().unwrap(), vec!["ml"]);
    }

    #[test]
    fn test_add_leaves_no_temp_file() {
        let (registry, _temp_dir) = create_test_registry();
        registry.add("hi").unwrap();

        let leftovers: Vec<_> = fs::read_dir(registry.storage_path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != STORE_FILE_NAME)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_add_unwritable_dir_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the models directory should be
        let blocker = temp_dir.path().join("models");
        fs::write(&blocker, "not a directory").unwrap();
        let registry = ModelRegistry::new(&blocker);

        let result = registry.add("hi");

        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    // ==================== remove Tests ====================

    #[test]
    fn test_remove_existing() {
        let (registry, _temp_dir) = create_test_registry();
        registry.add("hi").unwrap();
        registry.add("ta").unwrap();

        assert!(registry.remove("hi").unwrap());

        assert_eq!(registry.list().unwrap(), vec!["ta"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (registry, _temp_dir) = create_test_registry();

        assert!(!registry.remove("hi").expect("Removing an absent code is not an error"));
        assert!(!registry.store_path().exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (registry, _temp_dir) = create_test_registry();
        registry.add("hi").unwrap();

        assert!(registry.remove("hi").unwrap());
        assert!(!registry.remove("hi").unwrap());
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_storage_path_is_models_dir() {
        let registry = ModelRegistry::new("/var/lib/gateway/models");
        assert_eq!(registry.storage_path(), Path::new("/var/lib/gateway/models"));
        assert_eq!(
            registry.store_path(),
            Path::new("/var/lib/gateway/models/downloaded.json")
        );
    }

    // ---------- Concurrency Tests ----------

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let (registry, _temp_dir) = create_test_registry();
        let codes = ["hi", "bn", "te", "mr", "ta", "gu", "kn", "ml", "pa", "or"];

        let handles: Vec<_> = codes
            .iter()
            .map(|code| {
                let registry = registry.clone();
                let code = code.to_string();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        registry.add(&code).expect("add should succeed");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread should complete");
        }

        let mut stored = registry.list().unwrap();
        stored.sort();
        let mut expected: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        expected.sort();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_concurrent_add_remove_keeps_uniqueness() {
        let (registry, _temp_dir) = create_test_registry();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for j in 0..20 {
                        if (i + j) % 3 == 0 {
                            registry.remove("hi").expect("remove");
                        } else {
                            registry.add("hi").expect("add");
                        }
                        registry.add(&format!("x{}", i)).expect("add");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread should complete");
        }

        let stored = registry.list().unwrap();
        let mut deduped = stored.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), stored.len(), "no duplicate codes");
        for i in 0..8 {
            assert!(stored.contains(&format!("x{}", i)));
        }
    }
}
