use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STATE_FILE: &str = ".pitlaunch-state.json";

/// What the most recent launch did, kept so `status` can point back at the
/// report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRun {
    pub created: String,
    pub report_path: Option<String>,
    pub report_link: Option<String>,
    pub argv: Vec<String>,
    pub exit_code: Option<i32>,
}

pub fn state_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(STATE_FILE)
}

pub fn save_last_run(run: &LastRun) {
    save_to_path(run, &state_path());
}

pub fn load_last_run() -> Option<LastRun> {
    load_from_path(&state_path())
}

pub fn save_to_path(run: &LastRun, path: &Path) {
    match serde_json::to_string_pretty(run) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                tracing::warn!("could not write {}: {}", path.display(), e);
            }
        }
        Err(e) => tracing::warn!("could not serialize run state: {}", e),
    }
}

pub fn load_from_path(path: &Path) -> Option<LastRun> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
