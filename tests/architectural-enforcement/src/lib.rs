//! Architectural Enforcement
//!
//! Source-scanning helpers shared by the integration tests in `tests/`.
//! The tests enforce rules the compiler cannot:
//! - No blocking I/O inside async functions
//! - The chat client never asks for streamed generation
//! - The forwarder stays free of terminal UI dependencies
//!
//! Scans are line-based. Everything from the first `#[cfg(test)]` onward is
//! treated as test code and skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source trees checked by the scans, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["forwarder/core/src", "forwarder/daemon/src", "tui/src"];

/// A rule violation at a specific source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the line came from
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Every `.rs` file under the production directories
pub fn production_sources() -> Vec<PathBuf> {
    let root = workspace_root();
    let mut files: Vec<PathBuf> = PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| walkdir::WalkDir::new(root.join(dir)).into_iter())
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Lines of a file before its test module, paired with 1-based line numbers
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(i, line)| (i + 1, line))
        .collect()
}

/// Drop a trailing `//` comment (ignores `//` inside string literals naively)
pub fn code_part(line: &str) -> &str {
    match line.find("//") {
        Some(idx) if !line[..idx].contains('"') => &line[..idx],
        _ => line,
    }
}

/// Lines that sit inside the body of an `async fn`
///
/// Tracks brace depth from each `async fn` signature until its body closes.
pub fn async_fn_lines<'a>(lines: &[(usize, &'a str)]) -> Vec<(usize, &'a str)> {
    let mut inside = Vec::new();
    let mut depth: i32 = 0;
    let mut in_async = false;
    let mut body_opened = false;

    for &(number, line) in lines {
        let code = code_part(line);

        if !in_async && code.contains("async fn ") {
            in_async = true;
            body_opened = false;
            depth = 0;
        }

        if in_async {
            for c in code.chars() {
                match c {
                    '{' => {
                        depth += 1;
                        body_opened = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            inside.push((number, line));

            // Bodyless trait method declarations end at `;`
            if (body_opened && depth <= 0) || (!body_opened && code.trim_end().ends_with(';')) {
                in_async = false;
            }
        }
    }

    inside
}

/// Read a file, returning an empty string if it cannot be read
pub fn read_source(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let src = "fn a() {}\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(src);
        assert_eq!(lines, vec![(1, "fn a() {}")]);
    }

    #[test]
    fn test_async_fn_lines_track_body() {
        let src = "fn sync() {\n    x();\n}\nasync fn run() {\n    if a {\n        b();\n    }\n}\nfn after() {}\n";
        let lines = production_lines(src);
        let numbers: Vec<usize> = async_fn_lines(&lines).iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_trait_declaration_ends_at_semicolon() {
        let src = "trait T {\n    async fn a(&self) -> u8;\n    fn b(&self);\n}\n";
        let lines = production_lines(src);
        let numbers: Vec<usize> = async_fn_lines(&lines).iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![2]);
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // note"), "let x = 1; ");
        assert_eq!(code_part("let u = \"http://x\";"), "let u = \"http://x\";");
    }
}
