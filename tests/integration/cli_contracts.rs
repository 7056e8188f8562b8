use crate::integration::support::{memory_context, sled_context, write_files};
use cotree::error::{ApiError, StorageError, TreeError};
use cotree::tooling::cli::{Commands, ProjectCommands};
use cotree::types::FlatFiles;
use std::fs;
use tempfile::TempDir;

fn project(command: ProjectCommands) -> Commands {
    Commands::Project { command }
}

fn show_flat(cli: &cotree::tooling::cli::CliContext, id: &str) -> FlatFiles {
    let output = cli
        .execute(&project(ProjectCommands::Show {
            id: id.to_string(),
            format: "flat".to_string(),
        }))
        .unwrap();
    serde_json::from_str(&output).unwrap()
}

#[test]
fn scan_flat_output_is_path_map() {
    let temp = TempDir::new().unwrap();
    write_files(
        &temp.path().join("site"),
        &[("index.html", "<h1>hi</h1>"), ("js/main.js", "console.log(1)")],
    );
    let cli = memory_context(temp.path());

    let output = cli
        .execute(&Commands::Scan {
            dir: "site".into(),
            max_file_size: None,
            ignore_file: vec![],
            ignore_folder: vec![],
            ignore_pattern: vec![],
            format: "flat".to_string(),
            output: None,
        })
        .unwrap();
    let files: FlatFiles = serde_json::from_str(&output).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files["js/main.js"], "console.log(1)");
}

#[test]
fn scan_output_file_then_flatten() {
    let temp = TempDir::new().unwrap();
    write_files(&temp.path().join("site"), &[("a.txt", "a"), ("b/c.txt", "c")]);
    let cli = memory_context(temp.path());

    cli.execute(&Commands::Scan {
        dir: "site".into(),
        max_file_size: None,
        ignore_file: vec![],
        ignore_folder: vec![],
        ignore_pattern: vec![],
        format: "tree".to_string(),
        output: Some("out/site.json".into()),
    })
    .unwrap();
    assert!(temp.path().join("out/site.json").exists());

    let output = cli
        .execute(&Commands::Flatten {
            input: "out/site.json".into(),
        })
        .unwrap();
    let files: FlatFiles = serde_json::from_str(&output).unwrap();
    assert_eq!(files.keys().collect::<Vec<_>>(), vec!["a.txt", "b/c.txt"]);
}

#[test]
fn build_produces_wire_shape() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("files.json"),
        r#"{"index.html":"<h1>hi</h1>","js/main.js":"console.log(1)"}"#,
    )
    .unwrap();
    let cli = memory_context(temp.path());

    let output = cli
        .execute(&Commands::Build {
            input: "files.json".into(),
            name: "demo".to_string(),
        })
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["folderName"], "demo");
    assert_eq!(json["items"][0]["filename"], "index");
    assert_eq!(json["items"][1]["folderName"], "js");
    assert_eq!(json["items"][1]["items"][0]["fileExtension"], "js");
}

#[test]
fn template_reports_builtin_source() {
    let temp = TempDir::new().unwrap();
    let cli = memory_context(temp.path());
    let output = cli
        .execute(&Commands::Template {
            name: "react".to_string(),
            format: "flat".to_string(),
        })
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["source"], "builtin");
    assert_eq!(json["folder"], "react");
    assert_eq!(json["fileCount"], 6);
    assert!(json["files"]["App.jsx"].is_string());
}

#[test]
fn project_lifecycle_on_sled_store() {
    let temp = TempDir::new().unwrap();
    let cli = sled_context(temp.path());

    let created = cli
        .execute(&project(ProjectCommands::Init {
            id: "p1".to_string(),
            name: Some("Demo".to_string()),
            template: "web".to_string(),
        }))
        .unwrap();
    assert!(created.contains("4 files"));

    let again = cli.execute(&project(ProjectCommands::Init {
        id: "p1".to_string(),
        name: None,
        template: "web".to_string(),
    }));
    assert!(matches!(
        again,
        Err(ApiError::StorageError(StorageError::ProjectExists(_)))
    ));

    let folder = cli
        .execute(&project(ProjectCommands::AddFolder {
            id: "p1".to_string(),
            path: "assets/img".to_string(),
        }))
        .unwrap();
    assert_eq!(folder, "Created folder 'assets/img'\n");
    cli.execute(&project(ProjectCommands::AddFile {
        id: "p1".to_string(),
        path: "js/app.js".to_string(),
        content: "x".to_string(),
    }))
    .unwrap();
    let duplicate = cli.execute(&project(ProjectCommands::AddFile {
        id: "p1".to_string(),
        path: "js/app.js".to_string(),
        content: "y".to_string(),
    }));
    assert!(matches!(
        duplicate,
        Err(ApiError::Tree(TreeError::AlreadyExists { .. }))
    ));

    cli.execute(&project(ProjectCommands::Rename {
        id: "p1".to_string(),
        path: "script.js".to_string(),
        new_name: " main.js ".to_string(),
    }))
    .unwrap();
    cli.execute(&project(ProjectCommands::Rm {
        id: "p1".to_string(),
        path: "style.css".to_string(),
    }))
    .unwrap();

    let files = show_flat(&cli, "p1");
    let mut keys: Vec<&str> = files.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "README.md",
            "assets/img/.gitkeep",
            "index.html",
            "js/app.js",
            "main.js"
        ]
    );
    assert_eq!(files["js/app.js"], "x");
    assert_eq!(files["assets/img/.gitkeep"], "");
    assert!(files["README.md"].starts_with("# web"));

    let listing = cli.execute(&project(ProjectCommands::List)).unwrap();
    assert!(listing.contains("p1"));
    assert!(listing.contains("Demo"));

    cli.execute(&project(ProjectCommands::Delete {
        id: "p1".to_string(),
    }))
    .unwrap();
    assert!(cli
        .execute(&project(ProjectCommands::Delete {
            id: "p1".to_string()
        }))
        .is_err());
}

#[test]
fn project_move_between_folders() {
    let temp = TempDir::new().unwrap();
    let cli = memory_context(temp.path());
    cli.execute(&project(ProjectCommands::Init {
        id: "p".to_string(),
        name: None,
        template: "node".to_string(),
    }))
    .unwrap();

    let before = show_flat(&cli, "p");
    let server = before["server.js"].clone();

    // A missing destination folder is created on the way.
    cli.execute(&project(ProjectCommands::Mv {
        id: "p".to_string(),
        from: "server.js".to_string(),
        to: "src/app".to_string(),
    }))
    .unwrap();
    let files = show_flat(&cli, "p");
    assert!(!files.contains_key("server.js"));
    assert_eq!(files["src/app/server.js"], server);
    assert!(files.contains_key("package.json"));

    // A failed move saves nothing, including the folders it would have made.
    let err = cli.execute(&project(ProjectCommands::Mv {
        id: "p".to_string(),
        from: "missing.js".to_string(),
        to: "lib".to_string(),
    }));
    assert!(matches!(err, Err(ApiError::Tree(TreeError::NotFound { .. }))));
    assert_eq!(show_flat(&cli, "p"), files);
}

#[test]
fn invalid_format_is_rejected() {
    let temp = TempDir::new().unwrap();
    let cli = memory_context(temp.path());
    let result = cli.execute(&Commands::Template {
        name: "vue".to_string(),
        format: "yaml".to_string(),
    });
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn project_mount_overlays_defaults() {
    let temp = TempDir::new().unwrap();
    let cli = memory_context(temp.path());
    cli.execute(&project(ProjectCommands::Init {
        id: "p".to_string(),
        name: None,
        template: "react".to_string(),
    }))
    .unwrap();

    let output = cli
        .execute(&project(ProjectCommands::Mount {
            id: "p".to_string(),
            with_defaults: true,
        }))
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(json["index.js"]["file"]["contents"].is_string());
    assert!(json["package.json"]["file"]["contents"]
        .as_str()
        .unwrap()
        .contains("react-dom"));
    assert!(json["App.jsx"]["file"].is_object());
}
