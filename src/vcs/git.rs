// Git CLI backend
//
// Shells out to `git` rooted at the repository. Spawn failures are errors;
// a patch that git refuses is a normal `ApplyStatus::Rejected`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use super::markers::scan_markers;
use super::{ApplyStatus, Vcs};

pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the enclosing repository root with `git rev-parse --show-toplevel`
    pub async fn discover(start: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(start)
            .stdin(Stdio::null())
            .output()
            .await
            .context("Failed to run git rev-parse")?;

        if !output.status.success() {
            anyhow::bail!(
                "{} is not inside a git repository: {}",
                start.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self::new(top))
    }

    async fn git(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!("git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to spawn git {}", args.join(" ")))
    }

    /// Run git and return stdout, failing on a non-zero exit
    async fn git_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args).await?;
        if !output.status.success() {
            anyhow::bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Vcs for GitCli {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list_tracked_files(&self) -> Result<Vec<String>> {
        let stdout = self
            .git_checked(&["-c", "core.quotepath=off", "ls-files"])
            .await?;
        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    async fn search_markers(&self, patterns: &[String]) -> Result<String> {
        let root = self.root.clone();
        let patterns = patterns.to_vec();
        tokio::task::spawn_blocking(move || scan_markers(&root, &patterns))
            .await
            .context("Marker scan task panicked")?
    }

    async fn apply_patch(&self, patch_path: &Path) -> Result<ApplyStatus> {
        let path = patch_path.to_string_lossy().into_owned();
        let output = self
            .git(&["apply", "--whitespace=fix", path.as_str()])
            .await?;

        if output.status.success() {
            Ok(ApplyStatus::Applied)
        } else {
            let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Ok(ApplyStatus::Rejected {
                reason: if reason.is_empty() {
                    format!("git apply exited with {}", output.status)
                } else {
                    reason
                },
            })
        }
    }

    async fn short_status(&self) -> Result<String> {
        self.git_checked(&["status", "--short"]).await
    }
}
