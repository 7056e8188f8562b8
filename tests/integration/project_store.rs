use crate::integration::support::write_files;
use cotree::error::{ApiError, StorageError};
use cotree::session::ProjectSession;
use cotree::store::{ProjectRecord, ProjectStore, SledProjectStore};
use cotree::template::TemplateCatalog;
use cotree::tree::FileNode;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn session_edits_survive_reopening_the_store() {
    let temp = TempDir::new().unwrap();
    let starters = temp.path().join("starters");
    write_files(
        &starters.join("express-simple"),
        &[("server.js", "listen()"), ("public/index.html", "<p/>")],
    );
    let catalog = TemplateCatalog::new(&starters);
    let store_path = temp.path().join("store");

    {
        let store: Arc<dyn ProjectStore> = Arc::new(SledProjectStore::open(&store_path).unwrap());
        store
            .put(&ProjectRecord::new("api", "API", "express"))
            .unwrap();

        let mut session = ProjectSession::open(store, &catalog, "api").unwrap();
        assert_eq!(session.tree().file_count(), 2);

        session
            .apply(|tree| tree.insert_file("public", FileNode::new("app", "js", "boot()")))
            .unwrap();
        session.apply(|tree| tree.delete_at("server.js")).unwrap();
        session.save().unwrap();
    }

    let store: Arc<dyn ProjectStore> = Arc::new(SledProjectStore::open(&store_path).unwrap());
    let record = store.get("api").unwrap().unwrap();
    let keys: Vec<&str> = record.files.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["public/index.html", "public/app.js"]);

    let session = ProjectSession::open(store, &catalog, "api").unwrap();
    assert_eq!(session.tree().name(), "API");
    assert!(!session.is_dirty());
}

#[test]
fn opening_unknown_project_fails() {
    let temp = TempDir::new().unwrap();
    let store: Arc<dyn ProjectStore> =
        Arc::new(SledProjectStore::open(&temp.path().join("store")).unwrap());
    let result = ProjectSession::open(store, &TemplateCatalog::new(temp.path()), "ghost");
    assert!(matches!(
        result,
        Err(ApiError::StorageError(StorageError::ProjectNotFound(id))) if id == "ghost"
    ));
}
