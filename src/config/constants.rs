// Project-wide constants
//
// Centralised here so endpoint URLs, limits and on-disk locations have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Default inference endpoint (OpenRouter-compatible chat completions API).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";

/// Path appended to the base URL for every inference call.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Low sampling temperature keeps patches close to reproducible.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Upper bound for a single inference call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a meticulous software engineer.";

/// Sent as `HTTP-Referer` so the provider can attribute traffic.
pub const DEFAULT_APP_URL: &str = "https://github.com/subhobhai943/sub-lang";

/// Sent as `X-Title`.
pub const DEFAULT_APP_TITLE: &str = "sub-lang opencode workflow";

/// Per-file snippet cap in bytes.
pub const DEFAULT_SNIPPET_LIMIT: usize = 2000;

pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Workflow state directory, relative to the repository root.
pub const STATE_DIR: &str = ".opencode";

/// Quarantine directory for diffs that failed to apply, relative to the repository root.
pub const DEFAULT_QUARANTINE_DIR: &str = ".opencode/failed_patches";

pub const QUARANTINE_EXTENSION: &str = "diff";

/// Per-repository config file, relative to the repository root.
pub const REPO_CONFIG_FILE: &str = ".opencode/config.toml";

/// Append-only run history, relative to the repository root.
pub const HISTORY_FILE: &str = ".opencode/runs.jsonl";

/// Allow-list of paths whose contents are embedded in every prompt.
pub const DEFAULT_IMPORTANT_PATHS: &[&str] = &[
    "README.md",
    "CMakeLists.txt",
    "Makefile",
    "src",
    "docs",
    "examples",
    "tests",
];

/// Annotation markers searched across the whole tree.
pub const DEFAULT_MARKER_PATTERNS: &[&str] = &["TODO", "FIXME", "BUG"];
