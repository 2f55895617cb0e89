//! YAML record store.
//!
//! # Storage layout
//!
//! A single file (by default `config.yaml` in the working directory):
//!
//! ```text
//! accesstoken: ghp_...
//! repositories:
//!   jdecool/some-repo: true
//!   jdecool/other-repo: false
//! ```
//!
//! The file holds an API credential, so it is written with mode `0600`.

use std::path::{Path, PathBuf};

use crate::error::RecordError;
use crate::types::Record;

/// File-backed [`Record`] persistence at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True only when the path exists and is a regular file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the record.
    ///
    /// Returns `RecordError::NotFound` if absent and `RecordError::Parse`
    /// (with path + line context) if malformed. An empty file loads as an
    /// empty record.
    pub fn load(&self) -> Result<Record, RecordError> {
        if !self.exists() {
            return Err(RecordError::NotFound {
                path: self.path.clone(),
            });
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Record::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| RecordError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Atomically save the record.
    ///
    /// Write flow: serialize → `<file>.tmp` sibling → `chmod 0600` → `rename`.
    /// The `.tmp` file holds the credential, so it is removed if a later step fails.
    pub fn save(&self, record: &Record) -> Result<(), RecordError> {
        let yaml = serde_yaml::to_string(record)?;
        let tmp_path = self.tmp_path();

        std::fs::write(&tmp_path, yaml)?;
        let committed = set_file_permissions(&tmp_path)
            .and_then(|()| std::fs::rename(&tmp_path, &self.path).map_err(RecordError::from));
        if let Err(err) = committed {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
        tracing::debug!(path = %self.path.display(), entries = record.repositories.len(), "record saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RecordError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RecordError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("config.yaml"))
    }

    #[test]
    fn tmp_path_is_sibling() {
        let store = RecordStore::new("/work/config.yaml");
        assert_eq!(store.tmp_path(), PathBuf::from("/work/config.yaml.tmp"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        let mut record = Record {
            access_token: "token".into(),
            ..Record::default()
        };
        record.track("org/a", true);

        store.save(&record).expect("save");
        assert_eq!(store.load().expect("load"), record);
    }

    #[test]
    fn saved_file_is_private() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        store.save(&Record::default()).expect("save");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
    }

    #[test]
    fn failed_rename_removes_tmp_file() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("config.yaml");
        std::fs::create_dir(&target).expect("mkdir");
        let store = RecordStore::new(&target);

        let err = store
            .save(&Record {
                access_token: "secret".into(),
                ..Record::default()
            })
            .unwrap_err();
        assert!(matches!(err, RecordError::Io(_)), "got: {err}");
        assert!(!store.tmp_path().exists(), ".tmp must not outlive a failed save");
        assert!(target.is_dir());
    }

    #[test]
    fn directory_does_not_count_as_existing() {
        let dir = TempDir::new().expect("tempdir");
        let store = RecordStore::new(dir.path());
        assert!(!store.exists());
    }

    #[test]
    fn empty_file_loads_as_empty_record() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        std::fs::write(store.path(), "\n").expect("write");
        assert_eq!(store.load().expect("load"), Record::default());
    }
}
