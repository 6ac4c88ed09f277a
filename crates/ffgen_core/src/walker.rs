//! Recursive import discovery starting from a set of seed files.
//!
//! Seeds are walked in parallel. They share one seen set (a `DashSet`, whose
//! `insert` is the atomic check-and-mark) so that every file is expanded at
//! most once per walk, cycles included. Provenance is then computed with an
//! independent traversal per seed over the same import cache.

use anyhow::{Context, Result};
use dashmap::{DashMap, DashSet};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fs,
    path::{Path, PathBuf},
};

use crate::{resolver::Resolver, types::WalkResult};

/// Direct, resolved, deduplicated imports of a file, or why it could not be read.
type ImportCache = DashMap<PathBuf, Result<Vec<PathBuf>, String>>;

/// Walks the import graph of `seeds` and returns every reachable file with its
/// provenance.
pub fn walk(seeds: &[PathBuf], resolver: &Resolver) -> WalkResult {
    info!("Walking imports of {} seed files", seeds.len());

    let import_cache: ImportCache = DashMap::new();
    let seen: DashSet<PathBuf> = DashSet::new();

    seeds.par_iter().for_each(|seed| expand(seed, resolver, &import_cache, &seen));
    debug!("Expanded {} files", seen.len());

    let mut errors: BTreeMap<PathBuf, String> = BTreeMap::new();
    for entry in import_cache.iter() {
        if let Err(e) = entry.value() {
            warn!("Error scanning imports for {}: {}", entry.key().display(), e);
            errors.insert(entry.key().clone(), e.clone());
        }
    }

    let mut files: Vec<PathBuf> =
        seen.iter().map(|p| p.key().clone()).filter(|p| !errors.contains_key(p)).collect();
    sort_for_display(&mut files);

    let per_seed: Vec<(PathBuf, HashSet<PathBuf>)> = seeds
        .par_iter()
        .map(|seed| (seed.clone(), reachable_from(seed, resolver, &import_cache)))
        .collect();

    let mut provenance: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
    for (seed, reachable) in per_seed {
        for file in reachable {
            provenance.entry(file).or_default().insert(seed.clone());
        }
    }

    info!("Walk complete: {} files, {} errors", files.len(), errors.len());
    WalkResult { files, provenance, errors }
}

/// Sorts ascending by lowercase full path, the order files are presented in.
pub fn sort_for_display(files: &mut [PathBuf]) {
    files.sort_by_cached_key(|p| (p.to_string_lossy().to_lowercase(), p.clone()));
}

fn expand(seed: &Path, resolver: &Resolver, import_cache: &ImportCache, seen: &DashSet<PathBuf>) {
    let mut stack: Vec<PathBuf> = vec![seed.to_path_buf()];

    while let Some(cur) = stack.pop() {
        // insert() is false when another path through the graph got here first
        if !seen.insert(cur.clone()) {
            trace!("Already expanded: {}", cur.display());
            continue;
        }
        trace!("Expanding: {}", cur.display());

        if let Ok(imports) = direct_imports(&cur, resolver, import_cache) {
            for next in imports.into_iter().rev() {
                if !seen.contains(&next) {
                    stack.push(next);
                }
            }
        }
    }
}

/// Every readable file reachable from `seed`, including the seed itself.
fn reachable_from(
    seed: &Path,
    resolver: &Resolver,
    import_cache: &ImportCache,
) -> HashSet<PathBuf> {
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<PathBuf> = vec![seed.to_path_buf()];

    while let Some(cur) = stack.pop() {
        if visited.contains(&cur) {
            continue;
        }
        match direct_imports(&cur, resolver, import_cache) {
            Ok(imports) => {
                visited.insert(cur);
                stack.extend(imports.into_iter().filter(|next| !visited.contains(next)));
            }
            Err(_) => trace!("Skipping unreadable file in provenance: {}", cur.display()),
        }
    }

    debug!("{} reaches {} files", seed.display(), visited.len());
    visited
}

fn direct_imports(
    file: &Path,
    resolver: &Resolver,
    import_cache: &ImportCache,
) -> Result<Vec<PathBuf>, String> {
    if let Some(cached) = import_cache.get(file) {
        trace!("Cache hit for imports: {}", file.display());
        return cached.value().clone();
    }

    let result = scan_file(file, resolver).map_err(|e| format!("{:#}", e));
    import_cache.insert(file.to_path_buf(), result.clone());
    result
}

fn scan_file(file: &Path, resolver: &Resolver) -> Result<Vec<PathBuf>> {
    let text =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut deduped: Vec<PathBuf> = Vec::new();
    for import in resolver.resolve_imports(file, &text) {
        match import.resolved {
            Some(path) if !deduped.contains(&path) => deduped.push(path),
            Some(_) => {}
            None => trace!("Unresolved import '{}' in {}", import.request, file.display()),
        }
    }

    debug!("Found {} resolved imports in {}", deduped.len(), file.display());
    Ok(deduped)
}
