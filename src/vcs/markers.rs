// Annotation-marker scan (TODO / FIXME / BUG ...)
//
// Walks the tree in file-name order and reports `path:line:text` for every
// line matching one of the patterns. Hidden entries (`.git`, `.opencode`, ...),
// paths excluded by `.gitignore` and files that are not UTF-8 are skipped.

use anyhow::{Context, Result};
use regex::RegexBuilder;
use std::fs;
use std::path::Path;
use ignore::WalkBuilder;

const MAX_MATCHES: usize = 200;

/// Scan `root` for lines matching any of `patterns` (matched literally).
///
/// Smart case: the search is case-insensitive only when every pattern is
/// lowercase. Returns an empty string when nothing matches.
pub fn scan_markers(root: &Path, patterns: &[String]) -> Result<String> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(String::new());
    }

    let alternation = patterns
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    let case_insensitive = patterns
        .iter()
        .all(|p| !p.chars().any(|c| c.is_uppercase()));
    let regex = RegexBuilder::new(&alternation)
        .case_insensitive(case_insensitive)
        .build()
        .with_context(|| format!("Invalid marker pattern set: {}", alternation))?;

    let mut lines: Vec<String> = Vec::new();
    let mut omitted = 0usize;

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let contents = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(_) => continue, // binary or unreadable
        };

        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        for (idx, line) in contents.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            if lines.len() < MAX_MATCHES {
                lines.push(format!("{}:{}:{}", rel, idx + 1, line));
            } else {
                omitted += 1;
            }
        }
    }

    if omitted > 0 {
        lines.push(format!("... ({} more matches omitted)", omitted));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns() -> Vec<String> {
        vec!["TODO".into(), "FIXME".into(), "BUG".into()]
    }

    #[test]
    fn reports_path_line_and_text() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/lib.c"), "int x;\n// TODO: free buffer\n").unwrap();

        let out = scan_markers(tmp.path(), &patterns()).unwrap();
        assert_eq!(out, "src/lib.c:2:// TODO: free buffer");
    }

    #[test]
    fn uppercase_patterns_are_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "debugging is fun\n").unwrap();
        assert_eq!(scan_markers(tmp.path(), &patterns()).unwrap(), "");
    }

    #[test]
    fn lowercase_patterns_ignore_case() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "TODO later\n").unwrap();
        let out = scan_markers(tmp.path(), &["todo".to_string()]).unwrap();
        assert!(out.contains("a.txt:1:TODO later"));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git/HEAD"), "TODO\n").unwrap();
        assert_eq!(scan_markers(tmp.path(), &patterns()).unwrap(), "");
    }

    #[test]
    fn gitignored_paths_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "build/\n").unwrap();
        fs::create_dir_all(tmp.path().join("build")).unwrap();
        fs::write(tmp.path().join("build/gen.c"), "// TODO generated junk\n").unwrap();
        fs::write(tmp.path().join("main.c"), "// FIXME real work\n").unwrap();

        let out = scan_markers(tmp.path(), &patterns()).unwrap();
        assert_eq!(out, "main.c:1:// FIXME real work");
    }

    #[test]
    fn binary_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blob.bin"), [0xff, 0xfe, b'T', b'O', b'D', b'O']).unwrap();
        assert_eq!(scan_markers(tmp.path(), &patterns()).unwrap(), "");
    }

    #[test]
    fn patterns_are_literal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "a+b\naab\n").unwrap();
        let out = scan_markers(tmp.path(), &["a+b".to_string()]).unwrap();
        assert_eq!(out, "a.txt:1:a+b");
    }

    #[test]
    fn excess_matches_are_summarised() {
        let tmp = TempDir::new().unwrap();
        let body = "TODO\n".repeat(MAX_MATCHES + 5);
        fs::write(tmp.path().join("many.txt"), body).unwrap();
        let out = scan_markers(tmp.path(), &patterns()).unwrap();
        assert!(out.ends_with("... (5 more matches omitted)"));
    }
}
