//! Serialization of a file selection into an `ffg` invocation.
//!
//! The produced line must stay byte-compatible with what `ffg` expects:
//!
//! ```text
//! ffg --include "<path1>" --include "<path2>" \
//!     --output .ffg/ffg_output_<YYYYMMDD_HHMMSS>.md --markdown --whitespace --clipboard
//! ```

use chrono::{Local, NaiveDateTime};
use log::debug;
use std::path::{Path, PathBuf};

pub const PROGRAM: &str = "ffg";

/// Output directory, relative to wherever `ffg` is run
pub const OUTPUT_DIR: &str = ".ffg";

pub const OUTPUT_PREFIX: &str = "ffg_output_";

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const TRAILING_FLAGS: &[&str] = &["--markdown", "--whitespace", "--clipboard"];

pub const NO_FILES_COMMAND: &str = "echo 'No valid files found to generate ffg command.'";

/// Builds the command for `selected`, stamped with the current local time.
pub fn build_command(selected: &[PathBuf]) -> String {
    build_command_at(selected, Local::now().naive_local())
}

pub fn build_command_at(selected: &[PathBuf], timestamp: NaiveDateTime) -> String {
    if selected.is_empty() {
        debug!("No files selected, emitting fallback command");
        return NO_FILES_COMMAND.to_string();
    }

    let mut parts: Vec<String> = vec![PROGRAM.to_string()];
    let mut emitted: Vec<&Path> = Vec::with_capacity(selected.len());
    for file in selected {
        if emitted.contains(&file.as_path()) {
            continue;
        }
        emitted.push(file);
        parts.push("--include".to_string());
        parts.push(format!("\"{}\"", file.display()));
    }

    parts.push("--output".to_string());
    parts.push(output_file(timestamp));
    parts.extend(TRAILING_FLAGS.iter().map(|f| f.to_string()));

    debug!("Built command with {} included files", emitted.len());
    parts.join(" ")
}

/// `.ffg/ffg_output_<YYYYMMDD_HHMMSS>.md`
pub fn output_file(timestamp: NaiveDateTime) -> String {
    format!("{}/{}{}.md", OUTPUT_DIR, OUTPUT_PREFIX, timestamp.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap()
    }

    #[test]
    fn test_empty_selection_falls_back_to_echo() {
        assert_eq!(
            build_command_at(&[], at(2024, 1, 2, 3, 4, 5)),
            "echo 'No valid files found to generate ffg command.'"
        );
        assert_eq!(build_command(&[]), NO_FILES_COMMAND);
    }

    #[test]
    fn test_exact_format() {
        let files = vec![PathBuf::from("/p/a.ts"), PathBuf::from("/p/b.ts")];
        assert_eq!(
            build_command_at(&files, at(2024, 3, 7, 9, 5, 1)),
            "ffg --include \"/p/a.ts\" --include \"/p/b.ts\" \
             --output .ffg/ffg_output_20240307_090501.md --markdown --whitespace --clipboard"
        );
    }

    #[test]
    fn test_includes_follow_input_order() {
        let files = vec![PathBuf::from("/z/last.py"), PathBuf::from("/a/first.py")];
        let cmd = build_command_at(&files, at(2024, 12, 31, 23, 59, 59));
        let z = cmd.find("/z/last.py").unwrap();
        let a = cmd.find("/a/first.py").unwrap();
        assert!(z < a);
        assert!(cmd.contains("ffg_output_20241231_235959.md"));
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let files = vec![PathBuf::from("/my project/src/main file.ts")];
        let cmd = build_command_at(&files, at(2024, 1, 1, 0, 0, 0));
        assert!(cmd.starts_with("ffg --include \"/my project/src/main file.ts\" --output "));
    }

    #[test]
    fn test_single_output_and_trailing_flags() {
        let files = vec![PathBuf::from("/a.js"), PathBuf::from("/b.js"), PathBuf::from("/c.js")];
        let cmd = build_command_at(&files, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(cmd.matches("--include ").count(), 3);
        assert_eq!(cmd.matches("--output ").count(), 1);
        assert!(cmd.ends_with(" --markdown --whitespace --clipboard"));
        assert!(cmd.find("--output").unwrap() > cmd.rfind("--include").unwrap());
    }

    #[test]
    fn test_duplicate_selection_is_emitted_once() {
        let files = vec![PathBuf::from("/a.js"), PathBuf::from("/b.js"), PathBuf::from("/a.js")];
        let cmd = build_command_at(&files, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(cmd.matches("--include ").count(), 2);
    }

    #[test]
    fn test_output_file_zero_pads() {
        assert_eq!(output_file(at(2025, 2, 3, 4, 5, 6)), ".ffg/ffg_output_20250203_040506.md");
    }
}
