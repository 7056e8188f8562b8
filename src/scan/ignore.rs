//! Ignore rules for the template scanner.

use crate::error::ScanError;
use regex::Regex;
use std::collections::HashSet;

/// Files skipped by default: lockfiles, OS metadata and env files.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    ".DS_Store",
    "thumbs.db",
    ".gitignore",
    ".npmrc",
    ".yarnrc",
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
];

/// Folders skipped by default: dependencies, build output, VCS and editor metadata.
pub const DEFAULT_IGNORE_FOLDERS: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    ".idea",
    "dist",
    "build",
    "coverage",
];

/// File name patterns skipped by default: vim swap, emacs lock and backup files.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[r"^\..+\.swp$", r"^\.#", r"~$"];

/// Why a file was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    IgnoredName,
    Pattern(String),
}

/// Compiled ignore rules
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    files: HashSet<String>,
    folders: HashSet<String>,
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    pub fn new<F, D, P>(files: F, folders: D, patterns: P) -> Result<Self, ScanError>
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| ScanError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            files: files.into_iter().map(Into::into).collect(),
            folders: folders.into_iter().map(Into::into).collect(),
            patterns,
        })
    }

    /// Exact folder-name match.
    pub fn skip_folder(&self, name: &str) -> bool {
        self.folders.contains(name)
    }

    /// Exact file-name match first, then patterns.
    pub fn skip_file(&self, name: &str) -> Option<SkipReason> {
        if self.files.contains(name) {
            return Some(SkipReason::IgnoredName);
        }
        self.patterns
            .iter()
            .find(|re| re.is_match(name))
            .map(|re| SkipReason::Pattern(re.as_str().to_string()))
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            files: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
            folders: DEFAULT_IGNORE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }
}
