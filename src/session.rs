//! Project session
//!
//! One open project: the tree being edited, the store it came from and the
//! digest of the last persisted state. Edits replace the tree only when they
//! succeed; saving flattens the tree back into the store.

use crate::error::{ApiError, StorageError, TreeError};
use crate::store::{ProjectRecord, ProjectStore};
use crate::template::{TemplateCatalog, TemplateSource};
use crate::tree::{digest, Tree};
use crate::types::TreeDigest;
use std::sync::Arc;
use tracing::{error, info};

/// Root folder name for projects without one
pub const DEFAULT_ROOT_NAME: &str = "Project";

pub struct ProjectSession {
    store: Arc<dyn ProjectStore>,
    record: ProjectRecord,
    tree: Tree,
    saved: TreeDigest,
}

impl ProjectSession {
    /// Open a project. A project without files is seeded from its template and
    /// the seeded files are persisted before the session is returned.
    pub fn open(
        store: Arc<dyn ProjectStore>,
        catalog: &TemplateCatalog,
        id: &str,
    ) -> Result<Self, ApiError> {
        let mut record = store
            .get(id)?
            .ok_or_else(|| StorageError::ProjectNotFound(id.to_string()))?;

        if !record.has_files() {
            let load = catalog.load_files(&record.template)?;
            if load.source == TemplateSource::Builtin {
                info!(project = id, template = %record.template, "Seeding project with built-in files");
            }
            record = store.update_files(id, &load.files)?;
            info!(project = id, files = record.files.len(), "Seeded project from template");
        }

        let root_name = if record.name.trim().is_empty() {
            DEFAULT_ROOT_NAME
        } else {
            record.name.as_str()
        };
        let tree = Tree::from_flat(&record.files, root_name);
        let saved = digest(&tree);

        Ok(Self {
            store,
            record,
            tree,
            saved,
        })
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Apply a copying edit. On error the session tree is unchanged.
    pub fn apply<F>(&mut self, edit: F) -> Result<(), TreeError>
    where
        F: FnOnce(&Tree) -> Result<Tree, TreeError>,
    {
        self.tree = edit(&self.tree)?;
        Ok(())
    }

    /// True when the tree differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        digest(&self.tree) != self.saved
    }

    /// Persist the tree. A failed write leaves the in-memory tree as edited
    /// and the session dirty.
    pub fn save(&mut self) -> Result<(), ApiError> {
        let files = self.tree.to_flat();
        match self.store.update_files(&self.record.id, &files) {
            Ok(record) => {
                self.record = record;
                self.saved = digest(&self.tree);
                info!(project = %self.record.id, files = files.len(), "Saved project");
                Ok(())
            }
            Err(e) => {
                error!(project = %self.record.id, error = %e, "Failed to save project");
                Err(e.into())
            }
        }
    }
}
