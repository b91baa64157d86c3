// Orchestrator: drives every backend profile through the pipeline
//
// Per profile, strictly in configured order:
//
//   pending ─┬─ no credential ──────────────────────────────▶ skipped
//            └─ infer ─▶ extract ─▶ apply ─┬─▶ applied
//                                          ├─▶ rejected (empty diff)
//                                          └─▶ rejected (quarantined)
//
// Context is collected once up front, so later profiles never see earlier
// profiles' patches. Profiles never run concurrently: the working tree has
// a single mutator.

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};

use super::credentials::CredentialSource;
use super::outcome::{ProfileOutcome, ProfileReport, RunReport};
use crate::config::{BackendProfile, Config, FailurePolicy};
use crate::context::{ContextCollector, RepositoryContext};
use crate::diff;
use crate::inference::{InferenceClient, InferenceError};
use crate::patch::{PatchApplier, Quarantine};
use crate::prompt;
use crate::vcs::Vcs;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Inference failed under the fail-fast policy
    #[error("inference for profile '{profile}' failed: {source}")]
    Inference {
        profile: String,
        #[source]
        source: InferenceError,
    },
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
    client: &'a dyn InferenceClient,
    credentials: &'a dyn CredentialSource,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        vcs: &'a dyn Vcs,
        client: &'a dyn InferenceClient,
        credentials: &'a dyn CredentialSource,
    ) -> Self {
        Self {
            config,
            vcs,
            client,
            credentials,
        }
    }

    /// Run every profile once and report the outcomes.
    ///
    /// Fails on an invalid config, on local faults (inventory, temp files,
    /// quarantine writes) and, under [`FailurePolicy::FailFast`], on the first
    /// inference error.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let context = ContextCollector::new(self.config, self.vcs).collect().await?;
        let applier = PatchApplier::new(
            self.vcs,
            Quarantine::new(self.vcs.root().join(&self.config.quarantine_dir)),
        );

        let mut report = RunReport::default();
        for profile in &self.config.profiles {
            let profile_report = self.run_profile(profile, &context, &applier).await?;
            report.push(profile_report);
        }

        if report.applied_any() && self.config.show_status {
            match self.vcs.short_status().await {
                Ok(status) => report.status = Some(status),
                Err(e) => warn!("Could not list working tree changes: {:#}", e),
            }
        }

        info!(
            applied = report.tally.applied,
            quarantined = report.tally.rejected_apply_failed,
            skipped = report.tally.skipped_no_credential,
            "Run complete"
        );

        Ok(report)
    }

    async fn run_profile(
        &self,
        profile: &BackendProfile,
        context: &RepositoryContext,
        applier: &PatchApplier<'_>,
    ) -> Result<ProfileReport> {
        let Some(credential) = self.credentials.credential(&profile.credential_env) else {
            info!(
                profile = %profile.id,
                "Skipping {} (missing {})", profile.id, profile.credential_env
            );
            return Ok(ProfileReport {
                profile: profile.id.clone(),
                outcome: ProfileOutcome::SkippedNoCredential {
                    credential_env: profile.credential_env.clone(),
                },
                diff_source: None,
            });
        };

        let prompt = prompt::compose(&profile.responsibility, context);

        let content = match self.client.infer(&credential, &profile.id, &prompt).await {
            Ok(content) => content,
            Err(source) => match self.config.failure_policy {
                FailurePolicy::FailFast => {
                    return Err(PipelineError::Inference {
                        profile: profile.id.clone(),
                        source,
                    }
                    .into());
                }
                FailurePolicy::Isolate => {
                    warn!(profile = %profile.id, "Inference failed: {}", source);
                    return Ok(ProfileReport {
                        profile: profile.id.clone(),
                        outcome: ProfileOutcome::InferenceFailed {
                            reason: source.to_string(),
                        },
                        diff_source: None,
                    });
                }
            },
        };

        let extracted = diff::extract(&profile.id, &content);
        let outcome: ProfileOutcome = applier
            .apply(&extracted.text, &extracted.profile)
            .await?
            .into();

        match &outcome {
            ProfileOutcome::Applied => info!(profile = %profile.id, "Applied changes from {}", profile.id),
            _ => info!(profile = %profile.id, "No changes applied for {}", profile.id),
        }

        Ok(ProfileReport {
            profile: profile.id.clone(),
            outcome,
            diff_source: Some(extracted.source),
        })
    }
}
