//! Import resolution and file-set assembly for `ffg` command generation.
//!
//! Given seed files (typically the files open in an editor) this crate:
//! - Extracts import specifiers from JS/TS and Python sources by pattern matching
//! - Resolves relative and tsconfig-aliased specifiers to files on disk
//! - Walks the import graph from all seeds, recording which seed reached which file
//! - Serializes a file selection into an `ffg --include ...` command line
//!
//! # Examples
//!
//! ```no_run
//! use ffgen_core::{AliasMode, Resolver, build_command, load_alias_table, walk};
//! use std::path::{Path, PathBuf};
//!
//! let root = Path::new("/path/to/project");
//! let resolver = Resolver::new(load_alias_table(root), AliasMode::FirstTarget);
//! let result = walk(&[PathBuf::from("/path/to/project/src/main.ts")], &resolver);
//! println!("{}", build_command(&result.files));
//! ```

mod alias;
mod command;
mod config;
mod extractor;
mod language;
mod picker;
mod resolver;
mod types;
mod walker;

// Re-export public API
pub use alias::{
    AliasTable, MANIFEST_FILE, alias_candidates, is_alias_candidate, load_alias_table,
    resolve_alias,
};
pub use command::{NO_FILES_COMMAND, build_command, build_command_at, output_file};
pub use config::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_INCLUDE_PATTERNS, FileFilter, find_git_root};
pub use extractor::extract_imports;
pub use language::{ECMA_EXTENSIONS, LanguageFamily, PYTHON_EXTENSIONS};
pub use picker::{base_name, make_relative, pick_items};
pub use resolver::{AliasMode, Resolver, resolve_specifier};
pub use types::{PickItem, Provenance, ResolvedImport, Specifier, WalkResult};
pub use walker::{sort_for_display, walk};
