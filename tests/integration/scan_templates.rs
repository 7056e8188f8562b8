use crate::integration::support::write_files;
use cotree::config::{CotreeConfig, ScanConfig};
use cotree::error::ScanError;
use cotree::scan::{scan, ScanOptions, BINARY_PLACEHOLDER};
use cotree::template::{TemplateCatalog, TemplateSource};
use cotree::tree::flatten;
use std::fs;
use tempfile::TempDir;

#[test]
fn scan_skips_default_ignores_and_flattens() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("starter");
    write_files(
        &root,
        &[
            ("package.json", "{}"),
            ("package-lock.json", "{}"),
            (".DS_Store", ""),
            ("src/app.js", "app"),
            ("src/.app.js.swp", ""),
            ("src/app.js~", ""),
            ("node_modules/dep/index.js", "dep"),
            (".git/HEAD", "ref"),
        ],
    );

    let tree = scan(&root, &ScanOptions::default()).unwrap();
    assert_eq!(tree.name(), "starter");

    let flat = flatten(&tree);
    let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["package.json", "src/app.js"]);
}

#[test]
fn scan_replaces_oversized_and_binary_content() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &[("big.txt", "0123456789"), ("small.txt", "ok")]);
    fs::write(temp.path().join("logo.png"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let options = ScanOptions::default().with_max_file_size(5);
    let flat = flatten(&scan(temp.path(), &options).unwrap());
    assert_eq!(
        flat["big.txt"],
        "[File content not included: size (10 bytes) exceeds maximum allowed size (5 bytes)]"
    );
    assert_eq!(flat["small.txt"], "ok");
    assert_eq!(flat["logo.png"], BINARY_PLACEHOLDER);
}

#[test]
fn scan_missing_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = scan(&temp.path().join("nope"), &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
    assert!(err.is_missing_template());
}

#[test]
fn configured_scan_rules_apply_to_templates() {
    let temp = TempDir::new().unwrap();
    write_files(
        &temp.path().join("starters/vue"),
        &[("App.vue", "<template/>"), ("docs/guide.md", "guide"), ("debug.log", "x")],
    );

    let config = CotreeConfig {
        scan: ScanConfig {
            ignore_folders: vec!["docs".into()],
            ignore_patterns: vec![r"\.log$".into()],
            ..ScanConfig::default()
        },
        ..CotreeConfig::default()
    };
    let catalog = TemplateCatalog::from_config(&config.templates, &config.scan, temp.path());
    let load = catalog.load_files("Vue").unwrap();

    assert_eq!(load.source, TemplateSource::Scanned);
    assert_eq!(load.files.keys().collect::<Vec<_>>(), vec!["App.vue"]);
}

#[test]
fn unknown_template_uses_default_starter() {
    let temp = TempDir::new().unwrap();
    write_files(&temp.path().join("nextjs"), &[("pages/index.js", "page")]);

    let load = TemplateCatalog::new(temp.path()).load_files("svelte").unwrap();
    assert_eq!(load.folder, "nextjs");
    assert_eq!(load.source, TemplateSource::Scanned);
    assert!(load.files.contains_key("pages/index.js"));
}

#[test]
fn invalid_pattern_is_not_a_fallback() {
    let temp = TempDir::new().unwrap();
    let catalog = TemplateCatalog::new(temp.path())
        .with_scan_options(ScanOptions::default().with_ignore_pattern("(unclosed"));
    assert!(catalog.load_files("react").is_err());
}
