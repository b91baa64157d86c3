// Configuration structs

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use super::constants::*;
use super::profile::{default_profiles, BackendProfile};
use crate::patch::quarantine_file_name;

/// What the orchestrator does when an inference call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole run on the first inference failure.
    FailFast,
    /// Record the failure for that profile and continue with the next one.
    Isolate,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::Isolate
    }
}

/// Immutable run configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inference endpoint without the `/chat/completions` suffix
    pub base_url: String,

    /// Sampling temperature for every request
    pub temperature: f32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Fixed system turn prepended to every request
    pub system_prompt: String,

    /// Sent as `HTTP-Referer`
    pub app_url: String,

    /// Sent as `X-Title`
    pub app_title: String,

    /// Byte cap for each embedded snippet
    pub snippet_limit: usize,

    /// Repository-relative paths whose contents are embedded in prompts
    pub important_paths: Vec<String>,

    /// Annotation markers searched across the tree
    pub marker_patterns: Vec<String>,

    /// Quarantine directory, relative to the repository root
    pub quarantine_dir: PathBuf,

    /// Behaviour on inference failure
    pub failure_policy: FailurePolicy,

    /// Print `git status --short` after a run that applied something
    pub show_status: bool,

    /// Backend profiles in priority order
    pub profiles: Vec<BackendProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            snippet_limit: DEFAULT_SNIPPET_LIMIT,
            important_paths: DEFAULT_IMPORTANT_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            marker_patterns: DEFAULT_MARKER_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            quarantine_dir: PathBuf::from(DEFAULT_QUARANTINE_DIR),
            failure_policy: FailurePolicy::default(),
            show_status: true,
            profiles: default_profiles(),
        }
    }
}

impl Config {
    /// Default configuration with a custom profile list (mostly for tests)
    pub fn with_profiles(profiles: Vec<BackendProfile>) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    pub fn profile(&self, id: &str) -> Option<&BackendProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Check invariants that every later stage relies on
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            bail!("No backend profiles configured");
        }

        let mut seen = HashSet::new();
        let mut record_names = HashSet::new();
        for profile in &self.profiles {
            if profile.id.trim().is_empty() {
                bail!("Backend profile with empty id");
            }
            if profile.credential_env.trim().is_empty() {
                bail!("Backend profile '{}' has no credential_env", profile.id);
            }
            if !seen.insert(profile.id.as_str()) {
                bail!("Duplicate backend profile id '{}'", profile.id);
            }
            let record = quarantine_file_name(&profile.id);
            if !record_names.insert(record.clone()) {
                bail!(
                    "Backend profile '{}' shares quarantine file '{}' with another profile",
                    profile.id,
                    record
                );
            }
        }

        if self.snippet_limit == 0 {
            bail!("snippet_limit must be greater than zero");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            );
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.snippet_limit, 2000);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn chat_url_trims_trailing_slash() {
        let mut config = Config::default();
        config.base_url = "http://localhost:1234/api/v1/".to_string();
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:1234/api/v1/chat/completions"
        );
    }

    #[test]
    fn duplicate_profile_ids_are_rejected() {
        let config = Config::with_profiles(vec![
            BackendProfile::new("a/model", "A_KEY", "x"),
            BackendProfile::new("a/model", "B_KEY", "y"),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn colliding_quarantine_names_are_rejected() {
        let config = Config::with_profiles(vec![
            BackendProfile::new("acme/coder", "A_KEY", "x"),
            BackendProfile::new("acme_coder", "B_KEY", "y"),
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("acme_coder.diff"));

        let config = Config::with_profiles(vec![
            BackendProfile::new("a/b", "A_KEY", "x"),
            BackendProfile::new("a:b", "B_KEY", "y"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_profile_list_is_rejected() {
        assert!(Config::with_profiles(vec![]).validate().is_err());
    }

    #[test]
    fn missing_credential_env_is_rejected() {
        let config = Config::with_profiles(vec![BackendProfile::new("a/model", " ", "x")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = Config::default();
        config.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn profile_lookup_by_id() {
        let config = Config::default();
        assert!(config.profile("solar/solar-3-pro").is_some());
        assert!(config.profile("nope").is_none());
    }

    #[test]
    fn failure_policy_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FailurePolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"fail-fast\"").unwrap();
        assert_eq!(w.policy, FailurePolicy::FailFast);
    }
}
