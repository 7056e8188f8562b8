//! Starter templates
//!
//! Resolves a template name to a starter folder, scans it into flat files and
//! falls back to built-in defaults when the starter is missing or empty. Also
//! reads and writes template trees in their JSON wire shape.

use crate::config::{ScanConfig, TemplatesConfig};
use crate::error::ApiError;
use crate::scan::{ScanOptions, Scanner};
use crate::tree::{flatten, Tree};
use crate::types::FlatFiles;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Built-in alias table: template name -> starter folder
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("nextjs", "nextjs"),
    ("next", "nextjs"),
    ("react", "react"),
    ("express", "express-simple"),
    ("vue", "vue"),
    ("angular", "angular"),
    ("node", "node"),
    ("nodejs", "node"),
];

/// Where a template's files came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    /// Scanned from a starter folder
    Scanned,
    /// Generated built-in defaults
    Builtin,
}

/// Result of loading a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateLoad {
    pub files: FlatFiles,
    pub source: TemplateSource,
    /// Starter folder the name resolved to
    pub folder: String,
}

/// Template lookup over a starters directory
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    starters_dir: PathBuf,
    aliases: BTreeMap<String, String>,
    default_template: String,
    scan_options: ScanOptions,
}

impl TemplateCatalog {
    pub fn new(starters_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(
            &TemplatesConfig {
                starters_dir: starters_dir.into(),
                ..TemplatesConfig::default()
            },
            &ScanConfig::default(),
            Path::new(""),
        )
    }

    /// Catalog from configuration; a relative `starters_dir` is taken from `workspace_root`.
    pub fn from_config(config: &TemplatesConfig, scan: &ScanConfig, workspace_root: &Path) -> Self {
        let mut aliases: BTreeMap<String, String> = BUILTIN_ALIASES
            .iter()
            .map(|(alias, folder)| (alias.to_string(), folder.to_string()))
            .collect();
        for (alias, folder) in &config.aliases {
            aliases.insert(alias.to_lowercase(), folder.clone());
        }

        Self {
            starters_dir: workspace_root.join(&config.starters_dir),
            aliases,
            default_template: config.default_template.clone(),
            scan_options: scan.to_options(),
        }
    }

    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    pub fn starters_dir(&self) -> &Path {
        &self.starters_dir
    }

    /// Starter folder for a template name. Case-insensitive; unknown names
    /// resolve to the default template.
    pub fn resolve(&self, name: &str) -> &str {
        self.aliases
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.default_template)
    }

    /// Files for a template: the scanned starter folder, or built-in defaults
    /// when the folder is missing or yields no files.
    pub fn load_files(&self, name: &str) -> Result<TemplateLoad, ApiError> {
        let folder = self.resolve(name).to_string();
        let path = self.starters_dir.join(&folder);

        let scanner = Scanner::new(&self.scan_options)?;
        match scanner.scan(&path) {
            Ok(tree) => {
                let files = flatten(&tree);
                if !files.is_empty() {
                    info!(template = name, folder = %folder, files = files.len(), "Loaded template from starters");
                    return Ok(TemplateLoad {
                        files,
                        source: TemplateSource::Scanned,
                        folder,
                    });
                }
                warn!(template = name, path = %path.display(), "Starter folder has no files, using built-in defaults");
            }
            Err(e) if e.is_missing_template() => {
                warn!(template = name, error = %e, "Starter folder unavailable, using built-in defaults");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(TemplateLoad {
            files: default_files(name),
            source: TemplateSource::Builtin,
            folder,
        })
    }
}

/// Built-in files for a template name. Every template gets `README.md`,
/// `index.html`, `style.css` and `script.js`; `react` and `node`/`nodejs`
/// add a `package.json` and an entry point.
pub fn default_files(name: &str) -> FlatFiles {
    let title = if name.trim().is_empty() {
        "New Project"
    } else {
        name
    };

    let mut files = FlatFiles::new();
    files.insert(
        "README.md".to_string(),
        format!(
            "# {title}\n\nA {title} project created with cotree.\n\nStart building your project!\n"
        ),
    );
    files.insert(
        "index.html".to_string(),
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <div class="container">
        <h1>Welcome to {title}!</h1>
        <p>Start editing to build your project.</p>
        <button onclick="sayHello()">Click me!</button>
    </div>
    <script src="script.js"></script>
</body>
</html>
"#
        ),
    );
    files.insert(
        "style.css".to_string(),
        format!(
            r#"/* {title} Styles */

* {{
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}}

body {{
    font-family: system-ui, sans-serif;
    line-height: 1.6;
    color: #333;
    min-height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
}}

.container {{
    padding: 2rem;
    border-radius: 10px;
    text-align: center;
    max-width: 500px;
}}
"#
        ),
    );
    files.insert(
        "script.js".to_string(),
        format!(
            r#"// {title} JavaScript

function sayHello() {{
    alert('Hello from {title}!');
}}

document.addEventListener('DOMContentLoaded', function () {{
    console.log('{title} loaded successfully!');
}});
"#
        ),
    );

    match name.trim().to_lowercase().as_str() {
        "react" => {
            files.insert(
                "package.json".to_string(),
                r#"{
  "name": "react-project",
  "version": "1.0.0",
  "dependencies": {
    "react": "^18.0.0",
    "react-dom": "^18.0.0"
  }
}
"#
                .to_string(),
            );
            files.insert(
                "App.jsx".to_string(),
                r#"import React from 'react';

function App() {
  return (
    <div className="App">
      <h1>Hello React!</h1>
      <p>Start building your React app here.</p>
    </div>
  );
}

export default App;
"#
                .to_string(),
            );
        }
        "node" | "nodejs" => {
            files.insert(
                "package.json".to_string(),
                r#"{
  "name": "node-project",
  "version": "1.0.0",
  "main": "server.js",
  "scripts": {
    "start": "node server.js"
  }
}
"#
                .to_string(),
            );
            files.insert(
                "server.js".to_string(),
                r#"const http = require('http');
const fs = require('fs');
const path = require('path');

const server = http.createServer((req, res) => {
  if (req.url === '/' || req.url === '/index.html') {
    fs.readFile(path.join(__dirname, 'index.html'), (err, data) => {
      if (err) {
        res.writeHead(404);
        res.end('File not found');
      } else {
        res.writeHead(200, { 'Content-Type': 'text/html' });
        res.end(data);
      }
    });
  } else {
    res.writeHead(404);
    res.end('Not found');
  }
});

const PORT = 3000;
server.listen(PORT, () => {
  console.log(`Server running on port ${PORT}`);
});
"#
                .to_string(),
            );
        }
        _ => {}
    }

    files
}

/// Write a tree as pretty JSON, creating parent directories.
pub fn save_tree_json(tree: &Tree, path: &Path) -> Result<(), ApiError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(tree)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a tree written by [`save_tree_json`] or any producer of the same shape.
pub fn read_tree_json(path: &Path) -> Result<Tree, ApiError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
