//! # Key-value storage for the global notepad
//!
//! [`KeyValueStorage`] is the string-valued `get`/`set` interface the widget
//! persists through. Implementations:
//!
//! | Type | Platform | Backing |
//! |------|----------|---------|
//! | [`MemoryStorage`] | any | `HashMap`, for tests and as a fallback |
//! | [`FileStorage`] | native | one file per key under a base directory |
//! | `LocalStorage` | wasm + `web` feature | `window.localStorage` |
//!
//! Reads swallow backend errors and report `None`, so an unavailable store
//! degrades to "nothing saved yet". Writes report failures to the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StorageError;

/// String-valued persistent storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for testing and desktop fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Filesystem-backed storage for desktop and mobile.
///
/// ```text
/// <base_dir>/
/// └── <key>          # file holding the value
/// ```
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Keys become file names: ASCII letters, digits and `-` are kept, every
    /// other byte is written as `_xx`, so distinct keys never share a file.
    fn path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02x}"));
            }
        }
        self.base.join(name)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use self::web::LocalStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web {
    use super::KeyValueStorage;
    use crate::error::StorageError;

    /// `window.localStorage`, looked up on every call.
    #[derive(Clone, Debug, Default)]
    pub struct LocalStorage;

    impl LocalStorage {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or(StorageError::Unavailable)
        }
    }

    impl KeyValueStorage for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            Self::storage().ok()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write {
                    key: key.to_string(),
                    reason: format!("{e:?}"),
                })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write {
                    key: key.to_string(),
                    reason: format!("{e:?}"),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("global_note"), None);
        storage.set("global_note", "hello").unwrap();
        assert_eq!(storage.get("global_note").as_deref(), Some("hello"));
        storage.remove("global_note").unwrap();
        assert_eq!(storage.get("global_note"), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("notepad_storage_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let storage = FileStorage::new(dir.clone());
        assert_eq!(storage.get("global_note"), None);
        storage.set("global_note", "line one\nline two").unwrap();

        let reopened = FileStorage::new(dir.clone());
        assert_eq!(
            reopened.get("global_note").as_deref(),
            Some("line one\nline two")
        );

        reopened.remove("global_note").unwrap();
        reopened.remove("global_note").unwrap();
        assert_eq!(reopened.get("global_note"), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_storage_keys_do_not_collide() {
        let dir = std::env::temp_dir().join(format!("notepad_storage_keys_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let storage = FileStorage::new(dir.clone());

        storage.set("a/b", "slash").unwrap();
        storage.set("a_b", "underscore").unwrap();
        storage.set("..", "dots").unwrap();

        assert_eq!(storage.get("a/b").as_deref(), Some("slash"));
        assert_eq!(storage.get("a_b").as_deref(), Some("underscore"));
        assert_eq!(storage.get("..").as_deref(), Some("dots"));
        assert!(storage.path("a/b").starts_with(&dir));
        assert_ne!(storage.path("a/b"), storage.path("a_b"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
