use log::trace;
use std::path::{Component, Path, PathBuf};

use crate::types::{PickItem, WalkResult};

/// Builds one picker item per discovered file, in the walk's display order.
///
/// When `relative` is set the description is the path relative to `root`
/// instead of the full path.
pub fn pick_items(result: &WalkResult, root: &Path, relative: bool) -> Vec<PickItem> {
    result
        .files
        .iter()
        .map(|file| {
            let description = if relative {
                make_relative(file, root)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.to_string_lossy().to_string())
            } else {
                file.to_string_lossy().to_string()
            };

            let detail = imported_from(result, file);
            trace!("Pick item for {}: {:?}", file.display(), detail);

            PickItem { label: base_name(file), description, detail, path: file.clone() }
        })
        .collect()
}

/// "Imported from: a.ts, b.ts" listing the seeds that reach `file` other than
/// `file` itself.
fn imported_from(result: &WalkResult, file: &Path) -> Option<String> {
    let origins: Vec<String> = result
        .provenance
        .get(file)?
        .iter()
        .map(PathBuf::as_path)
        .filter(|origin| *origin != file)
        .map(base_name)
        .collect();

    if origins.is_empty() { None } else { Some(format!("Imported from: {}", origins.join(", "))) }
}

pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Create a relative path from `base` to `target`
pub fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    // Find common prefix
    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                base_parts.push(b);
                break;
            }
            (None, None) => break,
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    if common_prefix_len == 0 && target.components().next() != base.components().next() {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}
