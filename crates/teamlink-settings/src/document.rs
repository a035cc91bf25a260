//! Document store bridge.
//!
//! The host owns the durable document; this module is the narrow interface
//! the persistence core sees: load an array of flat records at startup,
//! save one at shutdown. [`FileDocumentStore`] is the standalone
//! implementation, a pretty-printed JSON file written atomically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocumentError, Result};
use crate::record::ContextRecord;

/// Load/save boundary for the persisted record set.
pub trait DocumentStore: Send + Sync {
    /// Load the persisted records. A store with no document yet returns an
    /// empty set, not an error.
    fn load(&self) -> Result<Vec<ContextRecord>>;

    /// Persist the records, replacing the previous document.
    fn save(&self, records: &[ContextRecord]) -> Result<()>;
}

/// On-disk document wrapper.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    servers: Vec<ContextRecord>,
}

/// JSON-file-backed document store.
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location (`~/.teamlink/servers.json`).
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_document_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default settings document path (`~/.teamlink/servers.json`).
pub fn default_document_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        DocumentError::PathUnavailable("could not determine home directory".to_string())
    })?;
    Ok(home.join(".teamlink").join("servers.json"))
}

impl DocumentStore for FileDocumentStore {
    fn load(&self) -> Result<Vec<ContextRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings document yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let document: SettingsDocument =
            serde_json::from_str(&content).map_err(|source| DocumentError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            count = document.servers.len(),
            "loaded settings document"
        );
        Ok(document.servers)
    }

    fn save(&self, records: &[ContextRecord]) -> Result<()> {
        let document = SettingsDocument {
            servers: records.to_vec(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(
            path = %self.path.display(),
            count = records.len(),
            "saved settings document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records() -> Vec<ContextRecord> {
        vec![
            ContextRecord {
                kind: Some("OnPremises".to_string()),
                uri: Some("https://tfs.example.com/DefaultCollection".to_string()),
                ..Default::default()
            },
            ContextRecord {
                kind: Some("RemoteHosted".to_string()),
                uri: Some("https://dev.example.com".to_string()),
                account_uuid: Some("7b0c7a6c-7d6f-4a0b-9a50-0f1b4b3f2a11".to_string()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileDocumentStore::new(tmp.path().join("servers.json"));

        let records = sample_records();
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileDocumentStore::new(tmp.path().join("servers.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("servers.json");
        fs::write(&path, "{{{{").unwrap();

        let store = FileDocumentStore::new(path);
        assert!(matches!(
            store.load(),
            Err(DocumentError::Malformed { .. })
        ));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = FileDocumentStore::new(tmp.path().join("nested").join("servers.json"));
        store.save(&sample_records()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let tmp = TempDir::new().unwrap();
        let store = FileDocumentStore::new(tmp.path().join("servers.json"));

        store.save(&sample_records()).unwrap();
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
