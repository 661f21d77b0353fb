//! Architectural Enforcement Integration Tests
//!
//! Source scanners shared by the tests in `tests/`. They enforce:
//! - No blocking I/O inside async functions
//! - No sleeping in production code; timers come from `tokio::time::interval`
//!
//! Scanning is line based. Everything from the first `#[cfg(test)]` line of a
//! file onwards counts as test code, matching the layout every module here
//! follows.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source roots, relative to the workspace root
pub const PRODUCTION_ROOTS: &[&str] = &["vibeshow/core/src", "vibeshow/cli/src"];

/// Workspace root, resolved from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// A flagged source line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// What rule the line breaks
    pub rule: &'static str,
    /// Trimmed source text
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.rule,
            self.text
        )
    }
}

/// A production line handed to a rule
#[derive(Clone, Copy, Debug)]
pub struct SourceLine<'a> {
    /// File the line is in
    pub path: &'a Path,
    /// All lines of the file
    pub lines: &'a [&'a str],
    /// 0-based index of this line
    pub index: usize,
    /// The line with any trailing `//` comment removed
    pub code: &'a str,
}

/// All `.rs` files under every production root
#[must_use]
pub fn production_sources() -> Vec<PathBuf> {
    let root = workspace_root();
    PRODUCTION_ROOTS
        .iter()
        .flat_map(|dir| rust_files(&root.join(dir)))
        .collect()
}

/// All `.rs` files under `dir`
#[must_use]
pub fn rust_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Run `rule` over the production lines of `path`
///
/// Comment-only lines and test code are skipped. The rule returns the name of
/// the broken rule, or `None` when the line is fine.
pub fn scan_file<F>(path: &Path, violations: &mut Vec<Violation>, mut rule: F)
where
    F: FnMut(SourceLine<'_>) -> Option<&'static str>,
{
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();
    let test_start = first_test_line(&lines);

    for (index, line) in lines.iter().enumerate().take(test_start) {
        let code = strip_comment(line);
        if code.trim().is_empty() {
            continue;
        }

        let source = SourceLine {
            path,
            lines: &lines,
            index,
            code,
        };
        if let Some(rule) = rule(source) {
            violations.push(Violation {
                path: path.to_path_buf(),
                line: index + 1,
                rule,
                text: line.trim().to_string(),
            });
        }
    }
}

/// Index of the first `#[cfg(test)]` line, or the line count
#[must_use]
pub fn first_test_line(lines: &[&str]) -> usize {
    lines
        .iter()
        .position(|line| line.trim_start().starts_with("#[cfg(test)]"))
        .unwrap_or(lines.len())
}

/// Whether the nearest enclosing `fn` above `index` is async
#[must_use]
pub fn is_in_async_function(lines: &[&str], index: usize) -> bool {
    for line in lines[..=index].iter().rev() {
        let line = strip_comment(line).trim();
        if line.contains("async fn ") || line.contains("async move") {
            return true;
        }
        if line.starts_with("fn ") || line.contains(" fn ") {
            return false;
        }
        if line.starts_with("mod ") || line.starts_with("impl") {
            return false;
        }
    }
    false
}

fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_function_detection() {
        let code = [
            "pub async fn write(dir: &Path) {",
            "    let contents = std::fs::read_to_string(\"file.txt\")?;",
            "}",
        ];
        assert!(is_in_async_function(&code, 1));

        let code = [
            "fn load_layers(path: PathBuf) {",
            "    let contents = std::fs::read_to_string(path)?;",
            "}",
        ];
        assert!(!is_in_async_function(&code, 1));
    }

    #[test]
    fn test_spawned_block_counts_as_async() {
        let code = [
            "fn spawn_reader() {",
            "    tokio::spawn(async move {",
            "        let line = std::io::stdin().read_line(&mut buf);",
            "    });",
            "}",
        ];
        assert!(is_in_async_function(&code, 2));
    }

    #[test]
    fn test_test_module_is_skipped() {
        let code = [
            "pub fn run() {}",
            "",
            "#[cfg(test)]",
            "mod tests {",
            "    #[test]",
            "    fn t() { std::thread::sleep(d); }",
            "}",
        ];
        assert_eq!(first_test_line(&code), 2);
        assert_eq!(first_test_line(&code[..2]), 2);
    }

    #[test]
    fn test_workspace_root_holds_production_roots() {
        let root = workspace_root();
        for dir in PRODUCTION_ROOTS {
            assert!(root.join(dir).exists(), "missing {dir}");
        }
    }
}
