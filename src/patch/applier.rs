// Patch applier
//
// Writes the diff to a scoped temp file and hands it to the version-control
// tool. The temp file is removed when it goes out of scope, on every path.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::quarantine::Quarantine;
use crate::vcs::{ApplyStatus, Vcs};

/// Result of one application attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Whole diff applied to the working tree
    Applied,
    /// Empty or whitespace-only diff; nothing touched
    EmptyDiff,
    /// Diff refused; working tree unchanged and diff saved at `path`
    Quarantined { path: PathBuf, reason: String },
}

pub struct PatchApplier<'a> {
    vcs: &'a dyn Vcs,
    quarantine: Quarantine,
}

impl<'a> PatchApplier<'a> {
    pub fn new(vcs: &'a dyn Vcs, quarantine: Quarantine) -> Self {
        Self { vcs, quarantine }
    }

    pub fn quarantine(&self) -> &Quarantine {
        &self.quarantine
    }

    /// Apply `diff_text` produced by `profile`.
    ///
    /// Errors are reserved for local faults (temp file, spawning git,
    /// writing the quarantine record); a diff that does not apply is a
    /// normal `PatchOutcome::Quarantined`.
    pub async fn apply(&self, diff_text: &str, profile: &str) -> Result<PatchOutcome> {
        if diff_text.trim().is_empty() {
            info!(profile, "Empty diff, nothing to apply");
            return Ok(PatchOutcome::EmptyDiff);
        }

        let status = {
            let mut patch_file = NamedTempFile::new().context("Failed to create patch temp file")?;
            patch_file
                .write_all(diff_text.as_bytes())
                .context("Failed to write patch temp file")?;
            patch_file.flush().context("Failed to flush patch temp file")?;

            self.vcs.apply_patch(patch_file.path()).await?
        };

        match status {
            ApplyStatus::Applied => {
                info!(profile, "Patch applied");
                Ok(PatchOutcome::Applied)
            }
            ApplyStatus::Rejected { reason } => {
                let path = self
                    .quarantine
                    .store(profile, diff_text)
                    .with_context(|| format!("Failed to quarantine diff from {}", profile))?;
                warn!(profile, path = %path.display(), "Patch rejected: {}", reason);
                Ok(PatchOutcome::Quarantined { path, reason })
            }
        }
    }
}
