use clap::{CommandFactory, Parser};
use cotree::tooling::cli::{Cli, Commands, ProjectCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["cotree", "scan", "starters/react"],
        vec![
            "cotree",
            "scan",
            "dir",
            "--ignore-folder",
            "docs",
            "--ignore-folder",
            "tmp",
            "--max-file-size",
            "0",
            "--format",
            "flat",
        ],
        vec!["cotree", "build", "files.json", "--name", "demo"],
        vec!["cotree", "flatten", "tree.json"],
        vec!["cotree", "template", "react", "--format", "tree"],
        vec!["cotree", "project", "init", "p1", "--template", "vue"],
        vec!["cotree", "project", "show", "p1", "--format", "table"],
        vec!["cotree", "project", "list"],
        vec!["cotree", "project", "add-file", "p1", "js/a.js", "--content", "x"],
        vec!["cotree", "project", "add-folder", "p1", "css"],
        vec!["cotree", "project", "rm", "p1", "css"],
        vec!["cotree", "project", "mv", "p1", "a.js", "js"],
        vec!["cotree", "project", "rename", "p1", "a.js", "b.js"],
        vec!["cotree", "project", "mount", "p1", "--with-defaults"],
        vec!["cotree", "--log-level", "debug", "project", "delete", "p1"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_collects_repeated_ignore_flags() {
    let cli = Cli::try_parse_from([
        "cotree",
        "scan",
        "dir",
        "--ignore-file",
        "a",
        "--ignore-file",
        "b",
    ])
    .unwrap();
    match cli.command {
        Commands::Scan { ignore_file, .. } => assert_eq!(ignore_file, vec!["a", "b"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["cotree", "scan"]).is_err());
    assert!(Cli::try_parse_from(["cotree", "project", "rename", "p1", "a.js"]).is_err());
    assert!(Cli::try_parse_from(["cotree", "project", "frobnicate"]).is_err());
}

#[test]
fn project_init_defaults_to_nextjs() {
    let cli = Cli::try_parse_from(["cotree", "project", "init", "p1"]).unwrap();
    match cli.command {
        Commands::Project {
            command: ProjectCommands::Init { template, name, .. },
        } => {
            assert_eq!(template, "nextjs");
            assert_eq!(name, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
