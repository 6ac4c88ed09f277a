//! Language families and the file extensions tied to them.
//!
//! Everything that depends on "what kind of file is this" goes through
//! [`LanguageFamily`] so that extraction and resolution stay consistent.
//!
//! ## Families
//!
//! - **Ecma**: `.js`, `.jsx`, `.ts`, `.tsx`, `.mjs`, `.cjs`
//! - **Python**: `.py`
//! - **Unsupported**: everything else (read, but never scanned for imports)

use serde::Serialize;
use std::path::Path;

/// Extensions tried when resolving ECMAScript-like imports (in priority order)
pub const ECMA_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// Extensions tried when resolving Python relative imports
pub const PYTHON_EXTENSIONS: &[&str] = &["py"];

/// Index file stem for ECMAScript directory imports (`index.<ext>`)
pub const ECMA_INDEX_STEM: &str = "index";

/// Package marker for Python directory imports
pub const PYTHON_PACKAGE_INIT: &str = "__init__.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    Ecma,
    Python,
    Unsupported,
}

impl LanguageFamily {
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some(ext) if ECMA_EXTENSIONS.contains(&ext) => Self::Ecma,
            Some(ext) if PYTHON_EXTENSIONS.contains(&ext) => Self::Python,
            _ => Self::Unsupported,
        }
    }

    /// Extensions appended to a candidate base path, in the order they are tried.
    pub fn resolve_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Ecma => ECMA_EXTENSIONS,
            Self::Python => PYTHON_EXTENSIONS,
            Self::Unsupported => &[],
        }
    }

    /// File names tried when a candidate base path is a directory.
    pub fn index_files(self) -> Vec<String> {
        match self {
            Self::Ecma => {
                ECMA_EXTENSIONS.iter().map(|ext| format!("{}.{}", ECMA_INDEX_STEM, ext)).collect()
            }
            Self::Python => vec![PYTHON_PACKAGE_INIT.to_string()],
            Self::Unsupported => Vec::new(),
        }
    }
}
