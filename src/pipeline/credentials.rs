// Credential resolution
//
// Each profile names an environment variable. An unset or empty variable is a
// normal skip, not an error.

use std::collections::HashMap;

pub trait CredentialSource: Send + Sync {
    /// Value of the named credential, or `None` when absent or empty
    fn credential(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credential(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed credential table, handy for tests and embedding
impl CredentialSource for HashMap<String, String> {
    fn credential(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.trim().is_empty()).cloned()
    }
}
