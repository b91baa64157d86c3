// Run history: appends one JSON line per completed run to .opencode/runs.jsonl

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::outcome::{ProfileReport, RunTally};
use super::RunReport;

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    ts: String,
    profiles: &'a [ProfileReport],
    tally: &'a RunTally,
}

/// Append `report` to the JSONL history at `path`, creating parent dirs.
pub fn append_run(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let entry = HistoryEntry {
        ts: Utc::now().to_rfc3339(),
        profiles: &report.profiles,
        tally: &report.tally,
    };
    let json = serde_json::to_string(&entry).context("Failed to serialize run history entry")?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open run history: {}", path.display()))?;

    writeln!(file, "{}", json).context("Failed to write run history entry")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ProfileOutcome;
    use std::fs;

    #[test]
    fn appends_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".opencode/runs.jsonl");

        let mut report = RunReport::default();
        report.push(ProfileReport {
            profile: "a/b".into(),
            outcome: ProfileOutcome::Applied,
            diff_source: None,
        });

        append_run(&path, &report).unwrap();
        append_run(&path, &report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert!(parsed["ts"].is_string());
        assert_eq!(parsed["profiles"][0]["outcome"], "applied");
        assert_eq!(parsed["tally"]["applied"], 1);
    }
}
