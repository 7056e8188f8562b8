use cotree::error::TreeError;
use cotree::tree::{build, digest, flatten, FileKey, FileNode, FolderKey, FolderNode, Target, Tree};
use cotree::types::FlatFiles;
use proptest::prelude::*;

fn demo() -> FlatFiles {
    let mut files = FlatFiles::new();
    files.insert("index.html".into(), "<h1>hi</h1>".into());
    files.insert("js/main.js".into(), "console.log(1)".into());
    files
}

#[test]
fn edit_sequence_round_trips_through_flat_form() {
    let tree = Tree::from_flat(&demo(), "demo");

    let tree = tree
        .insert_file("js", FileNode::new("util", "js", "export {}"))
        .unwrap();
    let tree = tree.rename_at("index.html", "home.html").unwrap();
    let tree = tree.insert_folder("", FolderNode::new("css")).unwrap();
    let tree = tree.create_file_at("css/site.css", "body{}").unwrap();
    let tree = tree.delete_file(&FileKey::new("main", "js")).unwrap();

    let flat = flatten(&tree);
    let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["home.html", "js/util.js", "css/site.css"]);

    let rebuilt = Tree::from_flat(&flat, "demo");
    assert_eq!(digest(&rebuilt), digest(&tree));
}

#[test]
fn failed_edits_leave_tree_unchanged() {
    let tree = Tree::from_flat(&demo(), "demo");
    let before = tree.clone();

    assert!(matches!(
        tree.insert_file("missing", FileNode::new("a", "txt", "")),
        Err(TreeError::NotFound { .. })
    ));
    assert!(tree.rename_at("index.html", "   ").is_err());
    assert!(tree.delete_folder(&FolderKey::new("nope")).is_err());
    assert!(tree.move_node("js", "js").is_err());
    assert_eq!(tree, before);
}

#[test]
fn locate_finds_nested_nodes_pre_order() {
    let mut files = FlatFiles::new();
    files.insert("a/x.txt".into(), "1".into());
    files.insert("b/x.txt".into(), "2".into());
    let tree = Tree::from_flat(&files, "p");

    let found = tree.locate(&Target::File(FileKey::new("x", "txt"))).unwrap();
    assert_eq!(found.path(), "a/x.txt");
    assert_eq!(found.index, 0);
    assert!(tree.locate(&Target::Folder(FolderKey::new("x"))).is_none());
}

#[test]
fn digest_ignores_root_name_but_not_order() {
    let files = demo();
    let a = Tree::from_flat(&files, "one");
    let b = Tree::from_flat(&files, "two");
    assert_eq!(digest(&a), digest(&b));

    let reversed = build(files.iter().rev().map(|(k, v)| (k.as_str(), v.as_str())), "one");
    assert_ne!(digest(&a), digest(&reversed));
}

proptest! {
    #[test]
    fn build_then_flatten_preserves_entries(
        entries in prop::collection::btree_map("[a-c]{1,3}(/[a-c]{1,3}){0,2}\\.(rs|md)", "[a-z ]{0,10}", 0..16)
    ) {
        let files: FlatFiles = entries.into_iter().collect();
        let tree = Tree::from_flat(&files, "root");
        let flat = tree.to_flat();
        prop_assert_eq!(flat, files);
    }
}
