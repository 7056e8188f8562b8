//! ProjectStore backends: sled on disk, and an in-memory map.

use super::{ProjectRecord, ProjectStore};
use crate::error::StorageError;
use crate::types::FlatFiles;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

const PROJECTS_TREE: &str = "projects";

/// Sled-backed project store; records are JSON values keyed by id
#[derive(Debug, Clone)]
pub struct SledProjectStore {
    tree: sled::Tree,
}

impl SledProjectStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            tree: db.open_tree(PROJECTS_TREE)?,
        })
    }

    fn decode(bytes: &[u8]) -> Result<ProjectRecord, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl ProjectStore for SledProjectStore {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StorageError> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, record: &ProjectRecord) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(record)?;
        self.tree.insert(record.id.as_bytes(), bytes)?;
        self.tree.flush()?;
        debug!(project = %record.id, files = record.files.len(), "Stored project");
        Ok(())
    }

    /// Rewrite the record's files in one compare-and-swap.
    ///
    /// A record removed concurrently stays removed; the closure may rerun on
    /// contention, so its outputs are reset on every attempt.
    fn update_files(&self, id: &str, files: &FlatFiles) -> Result<ProjectRecord, StorageError> {
        let mut updated: Option<ProjectRecord> = None;
        let mut failure: Option<StorageError> = None;
        self.tree.update_and_fetch(id.as_bytes(), |old| {
            updated = None;
            failure = None;
            let old = old?;
            let encoded = Self::decode(old).and_then(|mut record| {
                record.files = files.clone();
                record.updated_at = Utc::now();
                let bytes = serde_json::to_vec(&record)?;
                Ok((record, bytes))
            });
            match encoded {
                Ok((record, bytes)) => {
                    updated = Some(record);
                    Some(bytes)
                }
                Err(err) => {
                    failure = Some(err);
                    Some(old.to_vec())
                }
            }
        })?;
        if let Some(err) = failure {
            warn!(project = id, error = %err, "Stored project could not be updated");
            return Err(err);
        }
        let record = updated.ok_or_else(|| StorageError::ProjectNotFound(id.to_string()))?;
        self.tree.flush()?;
        debug!(project = id, files = record.files.len(), "Updated project files");
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        self.tree
            .iter()
            .values()
            .map(|value| Self::decode(&value?))
            .collect()
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let existed = self.tree.remove(id.as_bytes())?.is_some();
        self.tree.flush()?;
        Ok(existed)
    }
}

/// In-memory project store
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    records: RwLock<BTreeMap<String, ProjectRecord>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StorageError> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, record: &ProjectRecord) -> Result<(), StorageError> {
        self.records.write().insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn update_files(&self, id: &str, files: &FlatFiles) -> Result<ProjectRecord, StorageError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(id)
            .ok_or_else(|| StorageError::ProjectNotFound(id.to_string()))?;
        record.files = files.clone();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn list(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.write().remove(id).is_some())
    }
}
