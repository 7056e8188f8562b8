//! Project Store
//!
//! Persists projects by id with their files in the flat `path -> content`
//! form. Every call is a single write; a caller never observes a partially
//! written project.

pub mod persistence;

pub use persistence::{MemoryProjectStore, SledProjectStore};

use crate::error::StorageError;
use crate::types::FlatFiles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    /// Template the project was created from
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub files: FlatFiles,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// New project with no files; the first session open seeds it from `template`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template: template.into(),
            files: FlatFiles::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Project Store interface
pub trait ProjectStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StorageError>;
    fn put(&self, record: &ProjectRecord) -> Result<(), StorageError>;
    /// Replace a project's files and bump `updated_at`. Unknown ids are
    /// `ProjectNotFound`.
    fn update_files(&self, id: &str, files: &FlatFiles) -> Result<ProjectRecord, StorageError>;
    /// All projects, ordered by id.
    fn list(&self) -> Result<Vec<ProjectRecord>, StorageError>;
    /// Remove a project; returns whether it existed.
    fn delete(&self, id: &str) -> Result<bool, StorageError>;
}
