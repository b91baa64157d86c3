// Version-control collaborator
//
// Everything the pipeline needs from the working tree goes through `Vcs`:
// the tracked-file inventory, annotation-marker search, patch application
// and a short status listing. `GitCli` is the real implementation; tests
// substitute their own.

pub mod git;
pub mod markers;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub use git::GitCli;

/// Result of handing a patch file to the version-control tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStatus {
    /// Every hunk applied; the working tree reflects the patch
    Applied,
    /// Nothing applied; the tool explained why
    Rejected { reason: String },
}

#[async_trait]
pub trait Vcs: Send + Sync {
    /// Repository root all paths are relative to
    fn root(&self) -> &Path;

    /// Committed/indexed files only, in the tool's order
    async fn list_tracked_files(&self) -> Result<Vec<String>>;

    /// `path:line:text` lines for every marker hit across the tree
    async fn search_markers(&self, patterns: &[String]) -> Result<String>;

    /// Apply a patch file all-or-nothing in whitespace-tolerant mode
    async fn apply_patch(&self, patch_path: &Path) -> Result<ApplyStatus>;

    /// Short working-tree status listing
    async fn short_status(&self) -> Result<String>;
}
