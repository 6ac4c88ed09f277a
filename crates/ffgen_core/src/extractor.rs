//! Best-effort import discovery by lexical pattern matching.
//!
//! This is deliberately not a parser. The patterns below are a heuristic
//! contract covered by the tests in this module: they find static
//! `import ... from "x"`, side-effect `import "x"` and `require("x")` forms in
//! ECMAScript-like sources, and `from x import` / `import x` statements in
//! Python. Dynamic `import()`, re-exports and computed paths are not found.

use log::trace;
use regex::Regex;
use std::sync::OnceLock;

use crate::{language::LanguageFamily, types::Specifier};

fn esm_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bimport\s*(?:[\w$*{}\s,]+?\s*from\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#)
            .unwrap()
    })
}

fn require_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\brequire\s*\(\s*(?:"([^"\n]+)"|'([^'\n]+)')\s*\)"#).unwrap()
    })
}

fn python_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(?:from[ \t]+(\S+)[ \t]+import\b|[ \t]*import[ \t]+([^#\n]+))").unwrap()
    })
}

/// Extracts the raw import specifiers of `text` in order of occurrence.
///
/// Duplicates are kept; callers dedupe after resolution.
pub fn extract_imports(text: &str, family: LanguageFamily) -> Vec<Specifier> {
    let specs = match family {
        LanguageFamily::Ecma => extract_ecma(text),
        LanguageFamily::Python => extract_python(text),
        LanguageFamily::Unsupported => Vec::new(),
    };
    trace!("Extracted {} specifiers ({:?})", specs.len(), family);
    specs
}

fn extract_ecma(text: &str) -> Vec<Specifier> {
    let mut specs: Vec<Specifier> = Vec::new();

    for re in [esm_import_regex(), require_regex()] {
        for caps in re.captures_iter(text) {
            // Exactly one of the two quote alternatives participates
            if let Some(m) = caps.get(1).or_else(|| caps.get(2))
                && let Some(whole) = caps.get(0)
            {
                specs.push(Specifier { request: m.as_str().to_string(), offset: whole.start() });
            }
        }
    }

    // Both patterns scan the whole text; restore textual order
    specs.sort_by_key(|s| s.offset);
    specs
}

fn extract_python(text: &str) -> Vec<Specifier> {
    python_import_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let module = caps.get(1).or_else(|| caps.get(2))?;
            let first = module.as_str().split_whitespace().next()?;
            Some(Specifier { request: first.to_string(), offset: whole.start() })
        })
        .collect()
}
