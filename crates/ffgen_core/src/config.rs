use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Files considered when no include pattern is configured
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["**/*"];

/// Dependency folders, build output and dot-directories
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] =
    &["**/node_modules/**", "**/dist/**", "**/out/**", "**/build/**", "**/.*/**"];

/// Walks up from `start` to the first directory containing `.git`.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    debug!("Searching for git root from {:?}", start);
    let mut current_dir = start;

    loop {
        let git_dir = current_dir.join(".git");
        trace!("Checking for .git at: {:?}", git_dir);
        if git_dir.exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Some(current_dir.to_path_buf());
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent,
            None => {
                debug!("Could not find .git directory in any parent folder");
                return None;
            }
        }
    }
}

/// Include/exclude glob filter applied to the files offered for selection.
///
/// Paths under the project root are matched relative to it, anything else by
/// its full path.
#[derive(Debug, Clone)]
pub struct FileFilter {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(root: &Path, include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            include: build_globset(include).context("Invalid include pattern")?,
            exclude: build_globset(exclude).context("Invalid exclude pattern")?,
        })
    }

    pub fn with_defaults(root: &Path) -> Result<Self> {
        let include: Vec<String> = DEFAULT_INCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect();
        Self::new(root, &include, &exclude)
    }

    pub fn matches(&self, path: &Path) -> bool {
        let candidate = path.strip_prefix(&self.root).unwrap_or(path);
        let included = self.include.is_empty() || self.include.is_match(candidate);
        let excluded = self.exclude.is_match(candidate);
        trace!("Filter {:?}: included={} excluded={}", candidate, included, excluded);
        included && !excluded
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Bad glob '{}'", pattern))?);
    }
    Ok(builder.build()?)
}
