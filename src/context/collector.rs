// Repository context collection
//
// Builds the snapshot every prompt is composed from:
//   1. tracked-file inventory (committed/indexed files only)
//   2. annotation-marker search across the tree
//   3. labelled snippets of allow-listed files, each capped at a byte limit
//
// Allow-listed entries that are missing, directories, binary or unreadable
// are skipped without error.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{RepositoryContext, NO_MARKERS};
use crate::config::constants::TRUNCATION_MARKER;
use crate::config::Config;
use crate::vcs::Vcs;

pub struct ContextCollector<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
}

impl<'a> ContextCollector<'a> {
    pub fn new(config: &'a Config, vcs: &'a dyn Vcs) -> Self {
        Self { config, vcs }
    }

    /// Build the snapshot. Only a failing file inventory is fatal.
    pub async fn collect(&self) -> Result<RepositoryContext> {
        let files = self
            .vcs
            .list_tracked_files()
            .await
            .context("Failed to list tracked files")?;

        let markers = match self.vcs.search_markers(&self.config.marker_patterns).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => NO_MARKERS.to_string(),
            Err(e) => {
                warn!("Marker search failed: {:#}", e);
                NO_MARKERS.to_string()
            }
        };

        let snippets = self.collect_snippets(self.vcs.root());

        info!(
            files = files.len(),
            snippet_bytes = snippets.len(),
            "Collected repository context"
        );

        Ok(RepositoryContext {
            files,
            markers,
            snippets,
        })
    }

    fn collect_snippets(&self, root: &Path) -> String {
        let mut sections: Vec<String> = Vec::new();

        for entry in &self.config.important_paths {
            let path = root.join(entry);
            if !path.is_file() {
                continue;
            }
            match read_snippet(&path, self.config.snippet_limit) {
                Some(content) => sections.push(format!("# {}\n{}", entry, content)),
                None => debug!("Skipping non-text snippet {}", path.display()),
            }
        }

        sections.join("\n\n")
    }
}

/// Read a text file, truncated to `limit` bytes plus a truncation marker.
///
/// At most `limit + 4` bytes are read, enough to see whether the file runs
/// past the limit and to finish a multi-byte character straddling it.
/// Returns `None` for unreadable or non-UTF-8 content. The cut never splits a
/// multi-byte character.
pub fn read_snippet(path: &Path, limit: usize) -> Option<String> {
    let mut bytes = Vec::with_capacity(limit.saturating_add(4));
    let read = File::open(path).and_then(|file| {
        file.take(limit.saturating_add(4) as u64)
            .read_to_end(&mut bytes)
    });
    if let Err(e) = read {
        debug!("Failed to read {}: {}", path.display(), e);
        return None;
    }

    if bytes.len() <= limit {
        return String::from_utf8(bytes).ok();
    }

    // The window may end inside a character; only that case is tolerated
    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?,
        Err(_) => return None,
    };

    let mut cut = limit.min(text.len());
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    Some(format!("{}{}", &text[..cut], TRUNCATION_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::ApplyStatus;
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FixtureVcs {
        root: PathBuf,
        files: Vec<String>,
        markers: Result<String, String>,
    }

    #[async_trait]
    impl Vcs for FixtureVcs {
        fn root(&self) -> &Path {
            &self.root
        }
        async fn list_tracked_files(&self) -> Result<Vec<String>> {
            Ok(self.files.clone())
        }
        async fn search_markers(&self, _patterns: &[String]) -> Result<String> {
            self.markers.clone().map_err(|e| anyhow::anyhow!(e))
        }
        async fn apply_patch(&self, _patch_path: &Path) -> Result<ApplyStatus> {
            unreachable!("collector never applies patches")
        }
        async fn short_status(&self) -> Result<String> {
            Ok(String::new())
        }
    }

    fn fixture(tmp: &TempDir, markers: Result<String, String>) -> FixtureVcs {
        FixtureVcs {
            root: tmp.path().to_path_buf(),
            files: vec!["a.src".into(), "README.md".into()],
            markers,
        }
    }

    #[tokio::test]
    async fn records_sentinel_when_no_markers() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let vcs = fixture(&tmp, Ok("  \n".into()));

        let ctx = ContextCollector::new(&config, &vcs).collect().await.unwrap();
        assert_eq!(ctx.markers, NO_MARKERS);
        assert_eq!(ctx.files, vec!["a.src", "README.md"]);
    }

    #[tokio::test]
    async fn marker_search_failure_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let vcs = fixture(&tmp, Err("rg missing".into()));

        let ctx = ContextCollector::new(&config, &vcs).collect().await.unwrap();
        assert_eq!(ctx.markers, NO_MARKERS);
    }

    #[tokio::test]
    async fn snippets_are_labelled_and_directories_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "# Hello\n").unwrap();
        fs::write(tmp.path().join("Makefile"), "all:\n").unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        let config = Config::default();
        let vcs = fixture(&tmp, Ok("x:1:TODO".into()));

        let ctx = ContextCollector::new(&config, &vcs).collect().await.unwrap();
        assert_eq!(ctx.snippets, "# README.md\n# Hello\n\n\n# Makefile\nall:\n");
        assert_eq!(ctx.markers, "x:1:TODO");
    }

    #[tokio::test]
    async fn binary_snippets_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), [0u8, 0xff, 0xfe]).unwrap();
        let config = Config::default();
        let vcs = fixture(&tmp, Ok(String::new()));

        let ctx = ContextCollector::new(&config, &vcs).collect().await.unwrap();
        assert!(ctx.snippets.is_empty());
    }

    #[test]
    fn long_snippets_are_truncated_with_marker() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.txt");
        fs::write(&path, "x".repeat(2500)).unwrap();

        let snippet = read_snippet(&path, 2000).unwrap();
        assert!(snippet.starts_with(&"x".repeat(2000)));
        assert!(snippet.ends_with(TRUNCATION_MARKER));
        assert_eq!(snippet.len(), 2000 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn content_at_limit_is_not_truncated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("exact.txt");
        fs::write(&path, "y".repeat(16)).unwrap();
        assert_eq!(read_snippet(&path, 16).unwrap(), "y".repeat(16));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("utf8.txt");
        // Each 'é' is two bytes; a 3-byte cap must not split the second one
        fs::write(&path, "ééé").unwrap();
        let snippet = read_snippet(&path, 3).unwrap();
        assert_eq!(snippet, format!("é{}", TRUNCATION_MARKER));
    }

    #[test]
    fn only_the_leading_window_is_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("huge.log");
        // Invalid UTF-8 far past the window is never looked at
        let mut body = "z".repeat(64).into_bytes();
        body.extend_from_slice(&[0xff; 8]);
        fs::write(&path, body).unwrap();

        let snippet = read_snippet(&path, 8).unwrap();
        assert_eq!(snippet, format!("{}{}", "z".repeat(8), TRUNCATION_MARKER));
    }

    #[test]
    fn window_ending_mid_character_still_truncates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wide.txt");
        // '中' is three bytes; the 6-byte window ends inside the second one
        fs::write(&path, "aa中中中").unwrap();
        let snippet = read_snippet(&path, 2).unwrap();
        assert_eq!(snippet, format!("aa{}", TRUNCATION_MARKER));
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(read_snippet(Path::new("/definitely/not/here"), 10).is_none());
    }
}
