// Per-profile outcomes and the run-level report

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::diff::DiffSource;
use crate::patch::PatchOutcome;

/// Terminal state of one profile's pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProfileOutcome {
    /// Credential variable unset; no network activity happened
    SkippedNoCredential { credential_env: String },
    Applied,
    RejectedEmptyDiff,
    /// Diff refused and saved to the quarantine store
    RejectedApplyFailed { quarantine_path: PathBuf },
    /// Inference call failed (only recorded under the isolate policy)
    InferenceFailed { reason: String },
}

impl From<PatchOutcome> for ProfileOutcome {
    fn from(outcome: PatchOutcome) -> Self {
        match outcome {
            PatchOutcome::Applied => Self::Applied,
            PatchOutcome::EmptyDiff => Self::RejectedEmptyDiff,
            PatchOutcome::Quarantined { path, .. } => Self::RejectedApplyFailed {
                quarantine_path: path,
            },
        }
    }
}

impl fmt::Display for ProfileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedNoCredential { credential_env } => {
                write!(f, "skipped (missing {})", credential_env)
            }
            Self::Applied => write!(f, "applied"),
            Self::RejectedEmptyDiff => write!(f, "no changes (empty diff)"),
            Self::RejectedApplyFailed { quarantine_path } => {
                write!(f, "apply failed, saved to {}", quarantine_path.display())
            }
            Self::InferenceFailed { reason } => write!(f, "inference failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileReport {
    pub profile: String,
    #[serde(flatten)]
    pub outcome: ProfileOutcome,
    /// How the diff was found in the response, when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_source: Option<DiffSource>,
}

/// Count of each outcome kind across a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub skipped_no_credential: usize,
    pub applied: usize,
    pub rejected_empty_diff: usize,
    pub rejected_apply_failed: usize,
    pub inference_failed: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: &ProfileOutcome) {
        match outcome {
            ProfileOutcome::SkippedNoCredential { .. } => self.skipped_no_credential += 1,
            ProfileOutcome::Applied => self.applied += 1,
            ProfileOutcome::RejectedEmptyDiff => self.rejected_empty_diff += 1,
            ProfileOutcome::RejectedApplyFailed { .. } => self.rejected_apply_failed += 1,
            ProfileOutcome::InferenceFailed { .. } => self.inference_failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.skipped_no_credential
            + self.applied
            + self.rejected_empty_diff
            + self.rejected_apply_failed
            + self.inference_failed
    }
}

/// Everything a run produced, in profile order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub profiles: Vec<ProfileReport>,
    pub tally: RunTally,
    /// Short working-tree status, listed only after something applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RunReport {
    pub fn push(&mut self, report: ProfileReport) {
        self.tally.record(&report.outcome);
        self.profiles.push(report);
    }

    pub fn applied_any(&self) -> bool {
        self.tally.applied > 0
    }

    pub fn outcome_for(&self, profile: &str) -> Option<&ProfileOutcome> {
        self.profiles
            .iter()
            .find(|r| r.profile == profile)
            .map(|r| &r.outcome)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.profiles {
            writeln!(f, "{}: {}", report.profile, report.outcome)?;
        }
        write!(
            f,
            "{} applied, {} empty, {} quarantined, {} skipped, {} inference failures",
            self.tally.applied,
            self.tally.rejected_empty_diff,
            self.tally.rejected_apply_failed,
            self.tally.skipped_no_credential,
            self.tally.inference_failed
        )?;
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            write!(f, "\n\nWorking tree changes:\n{}", status.trim_end())?;
        }
        Ok(())
    }
}
