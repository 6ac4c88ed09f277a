use anyhow::{Result, anyhow};
use clap::Parser;
use ffgen_core::{
    AliasMode, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_INCLUDE_PATTERNS, FileFilter, find_git_root,
};
use log::{debug, info};
use path_clean::clean;
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
#[command(name = "ffgen")]
#[command(about = "Generate an ffg command for a set of files and everything they import")]
pub struct Config {
    /// Files to start from (the files currently open in your editor)
    pub files: Vec<PathBuf>,

    /// Root directory of the project (defaults to git root, then the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Glob of files that may be offered (repeatable, defaults to everything)
    #[arg(long = "include-pattern", value_name = "GLOB")]
    pub include_patterns: Vec<String>,

    /// Glob of files that are never offered (repeatable, replaces the defaults)
    #[arg(long = "exclude-pattern", value_name = "GLOB")]
    pub exclude_patterns: Vec<String>,

    /// Describe files by their path relative to the project root
    #[arg(long)]
    pub relative_paths: bool,

    /// Try every target of a tsconfig path alias instead of only the first
    #[arg(long)]
    pub all_alias_targets: bool,

    /// Take every discovered file and the generated command as-is
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the discovered files and provenance as JSON instead of a command
    #[arg(long)]
    pub json: bool,

    /// Copy the final command to the system clipboard instead of printing it
    #[arg(long)]
    pub copy: bool,

    /// Also write the final command to this file
    #[arg(long, value_name = "FILE")]
    pub write_to: Option<PathBuf>,

    #[clap(skip)]
    pub cwd: PathBuf,
}

impl Config {
    /// Resolve the working and root directories and fill in default patterns
    pub fn initialize(&mut self) -> Result<()> {
        let cwd = env::current_dir()?;
        self.initialize_in(&cwd);
        Ok(())
    }

    pub(crate) fn initialize_in(&mut self, cwd: &Path) {
        self.cwd = cwd.to_path_buf();

        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            absolutize(cwd, &r)
        } else {
            debug!("No root provided, searching for git root");
            find_git_root(cwd).unwrap_or_else(|| cwd.to_path_buf())
        };
        info!("Using root directory: {}", root.display());
        self.root = Some(root);

        if self.include_patterns.is_empty() {
            self.include_patterns =
                DEFAULT_INCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect();
        }
        if self.exclude_patterns.is_empty() {
            self.exclude_patterns =
                DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect();
        }
        debug!(
            "Patterns: include={:?} exclude={:?}",
            self.include_patterns, self.exclude_patterns
        );
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn alias_mode(&self) -> AliasMode {
        if self.all_alias_targets { AliasMode::AllTargets } else { AliasMode::FirstTarget }
    }

    pub fn filter(&self) -> Result<FileFilter> {
        FileFilter::new(self.root()?, &self.include_patterns, &self.exclude_patterns)
    }

    /// Seed files as absolute, cleaned paths, first occurrence kept.
    pub fn seeds(&self) -> Vec<PathBuf> {
        let mut seeds: Vec<PathBuf> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let abs = absolutize(&self.cwd, file);
            if !seeds.contains(&abs) {
                seeds.push(abs);
            }
        }
        seeds
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    PathBuf::from(clean(cwd.join(path).to_string_lossy().to_string()))
}
