use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

/// A raw import specifier as written in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    /// Byte offset of the statement in the scanned text
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub request: String,
    /// The file on disk, None when the specifier is external or broken
    pub resolved: Option<PathBuf>,
}

/// Dependency file -> seed files that reach it (each seed maps to itself).
pub type Provenance = BTreeMap<PathBuf, BTreeSet<PathBuf>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkResult {
    /// Every readable file reachable from a seed, sorted by lowercase path
    pub files: Vec<PathBuf>,
    pub provenance: Provenance,
    /// Files that could not be scanned, with the reason
    pub errors: BTreeMap<PathBuf, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickItem {
    pub label: String,
    pub description: String,
    pub detail: Option<String>,
    pub path: PathBuf,
}
