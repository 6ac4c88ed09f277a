use log::{debug, trace, warn};
use path_clean::clean;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Manifest file read from the project root
pub const MANIFEST_FILE: &str = "tsconfig.json";

/// Path aliases from the project's `compilerOptions.paths`, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    pub base_dir: PathBuf,
    pub entries: Vec<(String, Vec<String>)>,
}

impl AliasTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First entry whose prefix (trailing `*` removed) starts `specifier`,
    /// along with the remainder of the specifier after that prefix.
    fn matching_entry<'a>(&'a self, specifier: &'a str) -> Option<(&'a [String], &'a str)> {
        self.entries.iter().find_map(|(alias, targets)| {
            specifier
                .strip_prefix(strip_wildcard(alias))
                .map(|remainder| (targets.as_slice(), remainder))
        })
    }

    fn anchor(&self, target: &str, remainder: &str) -> PathBuf {
        let joined = format!("{}{}", strip_wildcard(target), remainder);
        PathBuf::from(clean(self.base_dir.join(joined).to_string_lossy().to_string()))
    }
}

fn strip_wildcard(pattern: &str) -> &str {
    pattern.strip_suffix('*').unwrap_or(pattern)
}

/// Loads the alias table from `<root>/tsconfig.json`.
///
/// A missing or malformed manifest, or one without `compilerOptions.paths`,
/// yields an empty table.
pub fn load_alias_table(root: &Path) -> AliasTable {
    let manifest = root.join(MANIFEST_FILE);
    debug!("Reading alias table from {:?}", manifest);

    let content = match fs::read_to_string(&manifest) {
        Ok(content) => content,
        Err(e) => {
            debug!("No readable manifest at {:?}: {}", manifest, e);
            return AliasTable { base_dir: root.to_path_buf(), entries: Vec::new() };
        }
    };

    // tsconfig is JSONC: comments and trailing commas are allowed
    let json = match json5::from_str::<serde_json::Value>(&content) {
        Ok(json) => json,
        Err(e) => {
            warn!("Ignoring malformed {}: {}", manifest.display(), e);
            return AliasTable { base_dir: root.to_path_buf(), entries: Vec::new() };
        }
    };

    let compiler_options = json.get("compilerOptions");
    let base_url =
        compiler_options.and_then(|c| c.get("baseUrl")).and_then(|b| b.as_str()).unwrap_or(".");
    let base_dir = PathBuf::from(clean(root.join(base_url).to_string_lossy().to_string()));

    let mut entries = Vec::new();
    let paths = compiler_options.and_then(|c| c.get("paths")).and_then(|p| p.as_object());
    if let Some(paths_obj) = paths {
        for (alias, targets) in paths_obj {
            let targets: Vec<String> = targets
                .as_array()
                .map(|arr| arr.iter().filter_map(|t| t.as_str()).map(str::to_string).collect())
                .unwrap_or_default();
            if targets.is_empty() {
                trace!("Alias '{}' has no string targets, skipping", alias);
                continue;
            }
            trace!("Found path alias: '{}' -> {:?}", alias, targets);
            entries.push((alias.clone(), targets));
        }
    }

    debug!("Loaded {} path aliases (base {:?})", entries.len(), base_dir);
    AliasTable { base_dir, entries }
}

pub fn is_alias_candidate(specifier: &str, table: &AliasTable) -> bool {
    table.matching_entry(specifier).is_some()
}

/// Rewrites an aliased specifier through the first target of the first
/// matching alias.
pub fn resolve_alias(specifier: &str, table: &AliasTable) -> Option<PathBuf> {
    let (targets, remainder) = table.matching_entry(specifier)?;
    let first = targets.first()?;
    let candidate = table.anchor(first, remainder);
    trace!("Alias rewrite '{}' -> {:?}", specifier, candidate);
    Some(candidate)
}

/// Like [`resolve_alias`], but yields a candidate for every target of the
/// matching alias, in configured order.
pub fn alias_candidates(specifier: &str, table: &AliasTable) -> Vec<PathBuf> {
    match table.matching_entry(specifier) {
        Some((targets, remainder)) => {
            targets.iter().map(|target| table.anchor(target, remainder)).collect()
        }
        None => Vec::new(),
    }
}
