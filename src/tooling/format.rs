//! Format trees, projects and scan results as text.

use crate::scan::ScanStats;
use crate::store::ProjectRecord;
use crate::tree::{digest_hex, FolderNode, Tree, TreeNode};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Render a tree with box-drawing connectors; folders get a trailing `/`.
pub fn format_tree_text(tree: &Tree) -> String {
    let mut out = format!("{}/\n", tree.name().bold());
    render_children(tree.root(), "", &mut out);
    out
}

fn render_children(folder: &FolderNode, prefix: &str, out: &mut String) {
    let count = folder.children.len();
    for (idx, child) in folder.children.iter().enumerate() {
        let last = idx + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        match child {
            TreeNode::File(file) => {
                out.push_str(&format!("{}{}{}\n", prefix, connector, file.display_name()));
            }
            TreeNode::Folder(sub) => {
                out.push_str(&format!("{}{}{}/\n", prefix, connector, sub.name.blue()));
                let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_children(sub, &next, out);
            }
        }
    }
}

/// Path / size table of every file in the tree.
pub fn format_files_table(tree: &Tree) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Bytes"]);
    for (path, node) in tree.walk() {
        if let TreeNode::File(file) = node {
            table.add_row(vec![path, file.content.len().to_string()]);
        }
    }
    let digest = digest_hex(tree);
    format!(
        "{}\n\n{}\n\n  Files: {}  Folders: {}  Bytes: {}\n  Digest: {}\n",
        format_section_heading(tree.name()),
        table,
        tree.file_count(),
        tree.folder_count(),
        tree.total_bytes(),
        &digest[..12]
    )
}

/// Stored projects as a table.
pub fn format_projects_table(records: &[ProjectRecord]) -> String {
    if records.is_empty() {
        return "No projects.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Name", "Template", "Files", "Updated"]);
    for record in records {
        table.add_row(vec![
            record.id.clone(),
            record.name.clone(),
            record.template.clone(),
            record.files.len().to_string(),
            record.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ]);
    }
    format!("{}\n\n{}\n", format_section_heading("Projects"), table)
}

/// One-paragraph scan summary.
pub fn format_scan_summary(stats: &ScanStats) -> String {
    let mut out = format!(
        "{}\n  Files: {}\n  Folders: {}\n  Skipped: {}\n",
        format_section_heading("Scan summary"),
        stats.files,
        stats.folders,
        stats.skipped
    );
    if stats.oversized + stats.binary + stats.unreadable > 0 {
        out.push_str(&format!(
            "  Placeholders: {} oversized, {} binary, {} unreadable\n",
            stats.oversized, stats.binary, stats.unreadable
        ));
    }
    out
}
