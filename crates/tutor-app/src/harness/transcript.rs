//! Transcript persistence.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use tutor_common::TutorAppError;

use super::ScenarioReport;

/// `<scenario>_<YYYYMMDD_HHMMSS>.json`
pub fn transcript_file_name(scenario: &str, at: DateTime<Local>) -> String {
    format!("{scenario}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Write `report` as pretty JSON into `dir`, creating the directory if needed.
pub fn save_report(dir: &Path, report: &ScenarioReport) -> Result<PathBuf, TutorAppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(transcript_file_name(&report.test_name, report.timestamp));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "transcript saved");
    Ok(path)
}
