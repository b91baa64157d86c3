// Quarantine store for diffs that failed to apply
//
// One flat file per profile identity: `<sanitized-id>.diff`. A later failure
// for the same identity overwrites the earlier record; records are never
// deleted automatically.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::constants::QUARANTINE_EXTENSION;

/// Map a free-text profile identity to a single safe file name.
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`, so path separators
/// can never introduce directories. Names that would be empty, `.` or `..`
/// become `_`. The result always ends in `.diff`.
pub fn quarantine_file_name(identity: &str) -> String {
    let mut stem: String = identity
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() || stem == "." || stem == ".." {
        stem = "_".to_string();
    }

    format!("{}.{}", stem, QUARANTINE_EXTENSION)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarantineEntry {
    pub file_name: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct Quarantine {
    dir: PathBuf,
}

impl Quarantine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic record path for `identity`
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(quarantine_file_name(identity))
    }

    /// Persist `diff_text` verbatim, replacing any previous record for `identity`.
    ///
    /// The content is written to a sibling temp file first and renamed into
    /// place, so readers never observe a half-written record.
    pub fn store(&self, identity: &str, diff_text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!(
                "Failed to create quarantine directory: {}",
                self.dir.display()
            )
        })?;

        let path = self.path_for(identity);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .context("Failed to create quarantine temp file")?;
        tmp.write_all(diff_text.as_bytes())
            .context("Failed to write quarantined diff")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to persist quarantined diff: {}", path.display()))?;

        Ok(path)
    }

    /// List records, sorted by file name. A missing directory means no records.
    pub fn entries(&self) -> Result<Vec<QuarantineEntry>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?
        {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            let metadata = entry.metadata()?;
            if !metadata.is_file()
                || !file_name.ends_with(&format!(".{}", QUARANTINE_EXTENSION))
            {
                continue;
            }
            entries.push(QuarantineEntry {
                file_name,
                size: metadata.len(),
            });
        }
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Ok(entries)
    }
}
