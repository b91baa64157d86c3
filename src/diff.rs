// Diff extraction from free-form model output
//
// Models are told not to fence their answer but often do anyway. Two cases:
//   - a ```diff fenced block is present: take the first one's interior
//   - otherwise: take the whole response
// Either way the payload is trimmed and ends with exactly one newline.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Where the diff text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffSource {
    Fenced,
    Raw,
}

/// A diff ready for application, tagged with its originating profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDiff {
    pub profile: String,
    pub text: String,
    pub source: DiffSource,
}

impl ExtractedDiff {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```diff\r?\n(.*?)```").expect("diff fence regex is valid")
    })
}

/// Split raw content into (payload, source) without normalisation
pub fn locate(raw: &str) -> (&str, DiffSource) {
    match fence_regex().captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => (inner.as_str(), DiffSource::Fenced),
        None => (raw, DiffSource::Raw),
    }
}

/// Extract the diff payload from a model response
pub fn extract(profile: &str, raw: &str) -> ExtractedDiff {
    let (payload, source) = locate(raw);
    ExtractedDiff {
        profile: profile.to_string(),
        text: with_single_newline(payload.trim()),
        source,
    }
}

fn with_single_newline(text: &str) -> String {
    let mut out = text.to_string();
    out.push('\n');
    out
}
