//! JSON-file persistence for the kiosk document.
//!
//! [`ConfigStore`] owns one file path (by default `config.json` in the working
//! directory).  The file is the single source of truth: nothing is cached
//! between calls, every read hits the disk, and every save rewrites the whole
//! document.
//!
//! # Change detection
//!
//! The display page asks "did the configuration change since I last looked?"
//! on every load.  Re-parsing the file each time would work, but comparing
//! file metadata is cheaper.  Each store remembers the [`FileStamp`] (mtime,
//! size, inode) it last observed.  The stamp starts out unset, so the first
//! poll after startup always reports a change.
//!
//! Polling is best-effort.  If the file cannot be statted, read, or parsed the
//! poll simply reports [`PollOutcome::Unchanged`]; callers that need a
//! document must then fall back to [`ConfigStore::load`].
//!
//! # Writes
//!
//! [`ConfigStore::save`] writes to a hidden sibling file and renames it over
//! the target.  Readers therefore never see a half-written document.  There
//! is no locking: two concurrent writers still race and the last rename wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::document::{DocumentError, KioskDocument};

/// Default file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse config JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but not an accepted document shape.
    #[error("unsupported config document at {path}: {source}")]
    Shape {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// The document could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of [`ConfigStore::poll_if_changed`].
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The file changed since the last poll; here is its content.
    Changed(KioskDocument),
    /// Nothing changed, or the file could not be inspected.
    Unchanged,
}

impl PollOutcome {
    /// Returns the document if the file changed.
    pub fn into_changed(self) -> Option<KioskDocument> {
        match self {
            Self::Changed(doc) => Some(doc),
            Self::Unchanged => None,
        }
    }
}

/// Identity of one version of the file as seen through its metadata.
///
/// Modification time alone is not enough: the kernel updates it with a coarse
/// clock, so two saves a few milliseconds apart can share an mtime.  Every
/// save renames a fresh file into place, which gives it a new inode on Unix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
    inode: u64,
}

impl FileStamp {
    fn read(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            modified: meta.modified()?,
            len: meta.len(),
            inode: inode_of(&meta),
        })
    }
}

#[cfg(unix)]
fn inode_of(meta: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.ino()
}

#[cfg(not(unix))]
fn inode_of(_meta: &fs::Metadata) -> u64 {
    0
}

/// File-backed store for the kiosk document.
///
/// One instance owns one path plus the change-detection state for it.  Share
/// it behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    last_seen: Mutex<Option<FileStamp>>,
}

impl ConfigStore {
    /// Creates a store for `path`.  Nothing is read or written until the first
    /// call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: Mutex::new(None),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, creating the file with defaults if it does not
    /// exist.
    ///
    /// Legacy list files and objects missing fields are upgraded in memory;
    /// the file itself is only rewritten by the next [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system errors other than "not
    /// found", [`StoreError::Parse`] for invalid JSON, and
    /// [`StoreError::Shape`] for JSON that is not an accepted document.
    pub fn load(&self) -> Result<KioskDocument, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => self.parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "config file {} not found; creating it with defaults",
                    self.path.display()
                );
                let doc = KioskDocument::default();
                self.save(&doc)?;
                Ok(doc)
            }
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Persists the complete document, replacing the previous file.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system failures or
    /// [`StoreError::Serialize`] if serialization fails.
    pub fn save(&self, doc: &KioskDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = to_pretty_json(doc)?;
        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&tmp, &self.path) {
            fs::remove_file(&tmp).ok();
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        debug!(
            "saved config to {} ({} urls)",
            self.path.display(),
            doc.urls.len()
        );
        Ok(())
    }

    /// Returns the document if the file changed since the previous poll.
    ///
    /// Never fails.  Stat, read, and parse errors are logged at `debug` and
    /// reported as [`PollOutcome::Unchanged`].  The remembered stamp only
    /// advances when the new content was parsed successfully.
    pub fn poll_if_changed(&self) -> PollOutcome {
        let stamp = match FileStamp::read(&self.path) {
            Ok(stamp) => stamp,
            Err(e) => {
                debug!("change poll: cannot stat {}: {e}", self.path.display());
                return PollOutcome::Unchanged;
            }
        };

        let mut last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        if *last_seen == Some(stamp) {
            return PollOutcome::Unchanged;
        }

        let result = fs::read_to_string(&self.path)
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
            .and_then(|content| self.parse(&content));

        match result {
            Ok(doc) => {
                *last_seen = Some(stamp);
                PollOutcome::Changed(doc)
            }
            Err(e) => {
                debug!("change poll: {e}");
                PollOutcome::Unchanged
            }
        }
    }

    /// Returns the changed document if there is one, otherwise loads it.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn current(&self) -> Result<KioskDocument, StoreError> {
        match self.poll_if_changed() {
            PollOutcome::Changed(doc) => Ok(doc),
            PollOutcome::Unchanged => self.load(),
        }
    }

    /// The file's modification time, or `None` if it cannot be statted.
    pub fn last_modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    /// The file's modification time in seconds since the Unix epoch, or `0.0`
    /// if it cannot be determined.
    pub fn last_modified_secs(&self) -> f64 {
        self.last_modified()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0.0, |d| d.as_secs_f64())
    }

    fn parse(&self, content: &str) -> Result<KioskDocument, StoreError> {
        let value: Value = serde_json::from_str(content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        KioskDocument::from_value(value).map_err(|source| StoreError::Shape {
            path: self.path.clone(),
            source,
        })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_CONFIG_FILE);
        self.path
            .with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

/// Serializes with four-space indentation, matching files written by earlier
/// versions of the dashboard.
fn to_pretty_json(doc: &KioskDocument) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser)?;
    Ok(buf)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_creates_default_file_when_absent() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        // Act
        let doc = store.load().unwrap();

        // Assert
        assert_eq!(doc, KioskDocument::default());
        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            json!({
                "urls": [],
                "layout": "auto",
                "generator_url": "",
                "dashboard_enabled": true
            })
        );
    }

    #[test]
    fn test_load_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));
        store.load().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_invalid_json_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();

        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_load_scalar_json_returns_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "42").unwrap();

        let err = store.load().unwrap_err();

        assert!(matches!(err, StoreError::Shape { .. }));
    }

    #[test]
    fn test_load_does_not_rewrite_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"["a"]"#).unwrap();

        store.load().unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), r#"["a"]"#);
    }

    // ── save ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&KioskDocument::default()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    \"layout\": \"auto\""), "got {text}");
    }

    #[test]
    fn test_save_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&KioskDocument::default()).unwrap();
        store.save(&KioskDocument::default()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    // ── change detection ──────────────────────────────────────────────────────

    #[test]
    fn test_poll_missing_file_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.poll_if_changed(), PollOutcome::Unchanged);
    }

    #[test]
    fn test_first_poll_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();

        let outcome = store.poll_if_changed();

        assert_eq!(outcome, PollOutcome::Changed(KioskDocument::default()));
    }

    #[test]
    fn test_second_poll_without_write_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();

        store.poll_if_changed();
        let outcome = store.poll_if_changed();

        assert_eq!(outcome, PollOutcome::Unchanged);
    }

    #[test]
    fn test_poll_after_save_returns_new_document() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();
        store.poll_if_changed();

        let mut doc = KioskDocument::default();
        doc.add_url("https://status.local");

        // Act
        store.save(&doc).unwrap();
        let outcome = store.poll_if_changed();

        // Assert
        assert_eq!(outcome, PollOutcome::Changed(doc));
    }

    #[test]
    fn test_poll_corrupt_file_is_unchanged_and_retried() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ broken").unwrap();

        assert_eq!(store.poll_if_changed(), PollOutcome::Unchanged);

        // Once fixed, the next poll picks it up.
        store.save(&KioskDocument::default()).unwrap();
        assert!(matches!(store.poll_if_changed(), PollOutcome::Changed(_)));
    }

    #[test]
    fn test_current_falls_back_to_load_when_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();
        store.poll_if_changed();

        let doc = store.current().unwrap();

        assert_eq!(doc, KioskDocument::default());
    }

    // ── last_modified ─────────────────────────────────────────────────────────

    #[test]
    fn test_last_modified_secs_is_zero_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.last_modified_secs(), 0.0);
        assert!(store.last_modified().is_none());
    }

    #[test]
    fn test_last_modified_secs_is_positive_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&KioskDocument::default()).unwrap();
        assert!(store.last_modified_secs() > 0.0);
    }

    #[test]
    fn test_default_store_uses_config_json() {
        let store = ConfigStore::default();
        assert_eq!(store.path(), Path::new("config.json"));
    }
}
