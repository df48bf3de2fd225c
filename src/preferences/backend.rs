//! Storage backends for persisted preferences.
//!
//! A backend is a plain key-value store of strings: one record per user
//! key. [`FileBackend`] keeps one JSON file per key on disk;
//! [`MemoryBackend`] is an in-memory fake that can be told to fail, for
//! exercising the degraded paths in tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::xdg;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The record could not be read.
    #[error("Failed to read preferences record '{key}'")]
    Read {
        /// Record key.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The record could not be written.
    #[error("Failed to write preferences record '{key}'")]
    Write {
        /// Record key.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preferences could not be serialized.
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value persistence for raw preference records.
pub trait PreferenceBackend {
    /// Reads the record stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites the record stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Encodes a user name as a file-safe record key.
///
/// ASCII letters, digits and `-` pass through. Every other byte, `_`
/// included, becomes `_` plus two lowercase hex digits, so distinct users
/// never share a key. The empty name maps to a lone `_`.
pub fn record_key(user: &str) -> String {
    if user.is_empty() {
        return "_".to_string();
    }
    let mut key = String::with_capacity(user.len());
    for byte in user.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            key.push(char::from(byte));
        } else {
            key.push_str(&format!("_{byte:02x}"));
        }
    }
    key
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`, encoded with [`record_key`].
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record_key(key)))
    }
}

impl PreferenceBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let to_write_error = |source: std::io::Error| StorageError::Write {
            key: key.to_string(),
            source,
        };
        xdg::ensure_dir(&self.dir).map_err(to_write_error)?;

        // Write-then-rename so a crash never leaves a truncated record.
        let path = self.record_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(to_write_error)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(to_write_error(e));
        }
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding one record.
    pub fn with_record(key: &str, value: &str) -> Self {
        let mut backend = Self::new();
        backend.records.insert(key.to_string(), value.to_string());
        backend
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Raw record stored under `key`.
    pub fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    /// Number of write attempts, successful or not.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "storage unavailable"),
            });
        }
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            });
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_escapes_everything_but_alphanumerics_and_dash() {
        assert_eq!(record_key("alice"), "alice");
        assert_eq!(record_key("ops-team-2"), "ops-team-2");
        assert_eq!(record_key("bob.smith@corp"), "bob_2esmith_40corp");
        assert_eq!(record_key("../etc/passwd"), "_2e_2e_2fetc_2fpasswd");
        assert_eq!(record_key("j\u{f6}rg"), "j_c3_b6rg");
        assert_eq!(record_key(""), "_");
    }

    #[test]
    fn record_key_keeps_similar_user_names_apart() {
        let names = ["bob.smith", "bob_smith", "bob_2esmith", "bob-smith", "", "_"];
        let keys: std::collections::HashSet<_> = names.iter().map(|n| record_key(n)).collect();
        assert_eq!(keys.len(), names.len());
    }

    #[test]
    fn file_backend_gives_each_user_their_own_record() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut backend = FileBackend::new(dir.path());
        backend.write("bob.smith", "dotted").expect("write");
        backend.write("bob_smith", "underscored").expect("write");
        assert_eq!(backend.read("bob.smith").expect("read").as_deref(), Some("dotted"));
        assert_eq!(
            backend.read("bob_smith").expect("read").as_deref(),
            Some("underscored")
        );
    }

    #[test]
    fn file_backend_missing_record_is_none() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        assert!(backend.read("alice").expect("read").is_none());
    }

    #[test]
    fn file_backend_write_then_read() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut backend = FileBackend::new(dir.path().join("nested/prefs"));
        backend.write("alice", "{\"a\":1}").expect("write");
        assert_eq!(
            backend.read("alice").expect("read").as_deref(),
            Some("{\"a\":1}")
        );
        assert!(backend.record_path("alice").is_file());
        assert!(!backend.record_path("alice").with_extension("json.tmp").exists());
    }

    #[test]
    fn file_backend_overwrites_previous_value() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut backend = FileBackend::new(dir.path());
        backend.write("alice", "first").expect("write");
        backend.write("alice", "second").expect("write");
        assert_eq!(backend.read("alice").expect("read").as_deref(), Some("second"));
    }

    #[test]
    fn file_backend_unreadable_record_is_read_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        // A directory where the record file should be cannot be read as text.
        fs::create_dir_all(backend.record_path("alice")).expect("mkdir");
        let err = backend.read("alice").expect_err("should fail");
        assert!(matches!(err, StorageError::Read { .. }));
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut backend = FileBackend::new(dir.path());
        // A non-empty directory at the record path makes the rename fail.
        let path = backend.record_path("alice");
        fs::create_dir_all(path.join("occupied")).expect("mkdir");

        let err = backend.write("alice", "{}").expect_err("rename onto a directory");
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn memory_backend_failure_modes() {
        let backend = MemoryBackend::with_record("k", "v").fail_reads();
        assert!(backend.read("k").is_err());

        let mut backend = MemoryBackend::new().fail_writes();
        assert!(backend.write("k", "v").is_err());
        assert_eq!(backend.write_count(), 1);
        assert!(backend.record("k").is_none());
    }

    #[test]
    fn storage_error_display_names_key() {
        let err = StorageError::Write {
            key: "alice".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("alice"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
