use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::{
    alias::{AliasTable, alias_candidates, is_alias_candidate, resolve_alias},
    extractor::extract_imports,
    language::{LanguageFamily, PYTHON_PACKAGE_INIT},
    types::ResolvedImport,
};

/// How many targets of a matching alias are tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AliasMode {
    /// Only the first configured target (tsconfig order)
    #[default]
    FirstTarget,
    /// Every configured target in order until one resolves
    AllTargets,
}

/// Resolution context for one invocation: the alias table is loaded once and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    pub aliases: AliasTable,
    pub alias_mode: AliasMode,
}

impl Resolver {
    pub fn new(aliases: AliasTable, alias_mode: AliasMode) -> Self {
        Self { aliases, alias_mode }
    }

    pub fn resolve(
        &self,
        specifier: &str,
        importing_dir: &Path,
        family: LanguageFamily,
    ) -> Option<PathBuf> {
        resolve_specifier(specifier, importing_dir, family, &self.aliases, self.alias_mode)
    }

    /// Extracts the imports of `file` from `text` and resolves each of them.
    pub fn resolve_imports(&self, file: &Path, text: &str) -> Vec<ResolvedImport> {
        let family = LanguageFamily::from_path(file);
        let dir = file.parent().unwrap_or_else(|| Path::new("/"));
        extract_imports(text, family)
            .into_iter()
            .map(|spec| {
                let resolved = self.resolve(&spec.request, dir, family);
                ResolvedImport { request: spec.request, resolved }
            })
            .collect()
    }
}

/// Locates the file a specifier refers to, or `None` when it is a bare
/// package import, an alias without a usable target, or simply broken.
pub fn resolve_specifier(
    specifier: &str,
    importing_dir: &Path,
    family: LanguageFamily,
    aliases: &AliasTable,
    alias_mode: AliasMode,
) -> Option<PathBuf> {
    trace!("Resolving '{}' from {}", specifier, importing_dir.display());

    // Dots alone name a package, never a module file beside it
    if family == LanguageFamily::Python && is_package_only(specifier) {
        let init = python_relative_base(specifier, importing_dir).join(PYTHON_PACKAGE_INIT);
        return if init.is_file() {
            debug!("Resolved '{}' to {}", specifier, init.display());
            Some(init)
        } else {
            trace!("No package init for '{}'", specifier);
            None
        };
    }

    let bases: Vec<PathBuf> = if specifier.starts_with('.') {
        match family {
            LanguageFamily::Python => vec![python_relative_base(specifier, importing_dir)],
            _ => vec![clean_join(importing_dir, specifier)],
        }
    } else if family == LanguageFamily::Ecma && is_alias_candidate(specifier, aliases) {
        match alias_mode {
            AliasMode::FirstTarget => resolve_alias(specifier, aliases).into_iter().collect(),
            AliasMode::AllTargets => alias_candidates(specifier, aliases),
        }
    } else {
        trace!("Skipping non-relative import '{}'", specifier);
        return None;
    };

    let resolved = bases.iter().find_map(|base| resolve_file(base, family));
    match &resolved {
        Some(path) => debug!("Resolved '{}' to {}", specifier, path.display()),
        None => trace!("Failed to resolve '{}'", specifier),
    }
    resolved
}

fn clean_join(dir: &Path, rel: &str) -> PathBuf {
    PathBuf::from(clean(dir.join(rel).to_string_lossy().to_string()))
}

fn is_package_only(specifier: &str) -> bool {
    !specifier.is_empty() && specifier.chars().all(|c| c == '.')
}

/// `.mod` is a sibling, `..pkg.mod` lives one directory up, `.` is the
/// importing package itself.
fn python_relative_base(specifier: &str, importing_dir: &Path) -> PathBuf {
    let module = specifier.trim_start_matches('.');
    let levels = specifier.len() - module.len();

    let mut rel = PathBuf::new();
    for _ in 1..levels {
        rel.push("..");
    }
    for segment in module.split('.').filter(|s| !s.is_empty()) {
        rel.push(segment);
    }
    clean_join(importing_dir, &rel.to_string_lossy())
}

fn resolve_file(base: &Path, family: LanguageFamily) -> Option<PathBuf> {
    // Try exact path first
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    // Try adding extensions
    for ext in family.resolve_extensions() {
        let candidate = PathBuf::from(format!("{}.{}", base.display(), ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    // Try index files
    for index_file in family.index_files() {
        let candidate = base.join(index_file);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn ecma(specifier: &str, dir: &Path) -> Option<PathBuf> {
        resolve_specifier(
            specifier,
            dir,
            LanguageFamily::Ecma,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        )
    }

    #[test]
    fn test_resolve_exact_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let data = create_test_file(root, "src/data.json", "{}");
        assert_eq!(ecma("./data.json", &root.join("src")), Some(data));
    }

    #[test]
    fn test_resolve_extension_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let x = create_test_file(root, "x.ts", "");
        assert_eq!(ecma("./x", root), Some(x));
    }

    #[test]
    fn test_resolve_index_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let index = create_test_file(root, "x/index.ts", "");
        assert_eq!(ecma("./x", root), Some(index));
    }

    #[test]
    fn test_extension_beats_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let file = create_test_file(root, "x.tsx", "");
        create_test_file(root, "x/index.js", "");
        assert_eq!(ecma("./x", root), Some(file));
    }

    #[test]
    fn test_extension_priority_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "m.ts", "");
        let js = create_test_file(root, "m.js", "");
        assert_eq!(ecma("./m", root), Some(js));
    }

    #[test]
    fn test_resolve_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let shared = create_test_file(root, "shared/util.js", "");
        assert_eq!(ecma("../shared/util", &root.join("app")), Some(shared));
    }

    #[test]
    fn test_directory_without_index_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("empty")).unwrap();
        assert_eq!(ecma("./empty", root), None);
    }

    #[test]
    fn test_broken_relative_import() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(ecma("./missing", temp_dir.path()), None);
    }

    #[test]
    fn test_bare_specifier_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // Even a same-named local file must not satisfy a package import
        create_test_file(root, "react.js", "");
        create_test_file(root, "node_modules/react/index.js", "");
        assert_eq!(ecma("react", root), None);
    }

    #[test]
    fn test_alias_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let foo = create_test_file(root, "src/app/foo.tsx", "");
        let aliases = AliasTable {
            base_dir: root.to_path_buf(),
            entries: vec![("@app/*".to_string(), vec!["src/app/*".to_string()])],
        };
        let resolved = resolve_specifier(
            "@app/foo",
            &root.join("elsewhere"),
            LanguageFamily::Ecma,
            &aliases,
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, Some(foo));
    }

    #[test]
    fn test_alias_first_target_only_vs_all_targets() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let fallback = create_test_file(root, "src/lib/x.ts", "");
        let aliases = AliasTable {
            base_dir: root.to_path_buf(),
            entries: vec![(
                "@lib/*".to_string(),
                vec!["vendor/lib/*".to_string(), "src/lib/*".to_string()],
            )],
        };

        let first = Resolver::new(aliases.clone(), AliasMode::FirstTarget);
        assert_eq!(first.resolve("@lib/x", root, LanguageFamily::Ecma), None);

        let all = Resolver::new(aliases, AliasMode::AllTargets);
        assert_eq!(all.resolve("@lib/x", root, LanguageFamily::Ecma), Some(fallback));
    }

    #[test]
    fn test_python_sibling_module() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let models = create_test_file(root, "app/models.py", "");
        let resolved = resolve_specifier(
            ".models",
            &root.join("app"),
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, Some(models));
    }

    #[test]
    fn test_python_parent_package() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let init = create_test_file(root, "pkg/utils/strings/__init__.py", "");
        let resolved = resolve_specifier(
            "..utils.strings",
            &root.join("pkg/app"),
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, Some(init));
    }

    #[test]
    fn test_python_current_package() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let init = create_test_file(root, "app/__init__.py", "");
        let resolved = resolve_specifier(
            ".",
            &root.join("app"),
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, Some(init));
    }

    #[test]
    fn test_python_package_wins_over_same_named_module() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "pkg/app.py", "");
        let init = create_test_file(root, "pkg/app/__init__.py", "");
        let python = |specifier: &str, dir: &Path| {
            resolve_specifier(
                specifier,
                dir,
                LanguageFamily::Python,
                &AliasTable::default(),
                AliasMode::FirstTarget,
            )
        };

        assert_eq!(python(".", &root.join("pkg/app")), Some(init.clone()));
        assert_eq!(python("..", &root.join("pkg/app/views")), Some(init));
    }

    #[test]
    fn test_python_package_without_init_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "pkg/app.py", "");
        fs::create_dir_all(root.join("pkg/app")).unwrap();
        let resolved = resolve_specifier(
            ".",
            &root.join("pkg/app"),
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_python_absolute_import_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "os.py", "");
        let resolved = resolve_specifier(
            "os",
            root,
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_python_does_not_use_ecma_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "helpers.js", "");
        let resolved = resolve_specifier(
            ".helpers",
            root,
            LanguageFamily::Python,
            &AliasTable::default(),
            AliasMode::FirstTarget,
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_resolve_imports_pairs_specifiers_with_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "a.ts", "import b from './b';\nimport React from 'react';");
        let b = create_test_file(root, "b.ts", "");

        let resolver = Resolver::default();
        let imports = resolver.resolve_imports(&a, &fs::read_to_string(&a).unwrap());
        assert_eq!(
            imports,
            vec![
                ResolvedImport { request: "./b".to_string(), resolved: Some(b) },
                ResolvedImport { request: "react".to_string(), resolved: None },
            ]
        );
    }
}
