// Backend profiles: one remote model per area of responsibility
//
// Profiles are run in list order. The list is part of `Config`, built once at
// startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A configured remote inference target.
///
/// ```toml
/// [[profiles]]
/// id = "deepseek/deepseek-r1-0528"
/// credential_env = "DEEPSEEK_API_KEY"
/// responsibility = "language grammar, syntax rules, parser/compiler reasoning"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendProfile {
    /// Model identity sent to the endpoint; unique within a config.
    pub id: String,
    /// Name of the environment variable holding the bearer credential.
    pub credential_env: String,
    /// Free-text area the model is asked to specialise in.
    pub responsibility: String,
}

impl BackendProfile {
    pub fn new(
        id: impl Into<String>,
        credential_env: impl Into<String>,
        responsibility: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            credential_env: credential_env.into(),
            responsibility: responsibility.into(),
        }
    }
}

/// The built-in profile list, in priority order.
pub fn default_profiles() -> Vec<BackendProfile> {
    vec![
        BackendProfile::new(
            "deepseek/deepseek-r1-0528",
            "DEEPSEEK_API_KEY",
            "language grammar, syntax rules, parser/compiler reasoning",
        ),
        BackendProfile::new(
            "solar/solar-3-pro",
            "SOLAR_API_KEY",
            "refactoring, performance optimization, cleanup",
        ),
        BackendProfile::new(
            "nousresearch/hermes-3-405b-instruct",
            "HERMES_API_KEY",
            "documentation, README, examples, comments",
        ),
        BackendProfile::new(
            "arcee-ai/trinity-large-preview",
            "TRINITY_API_KEY",
            "new language features, roadmap, creative design",
        ),
    ]
}
