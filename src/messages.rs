//! User-facing text, looked up by key.

const MESSAGES: &[(&str, &str)] = &[
    ("report.hyperlink.text", "Open mutation report"),
    ("report.missing", "No report directory configured; PIT will choose its own location."),
    ("run.starting", "Starting PIT"),
    ("run.finished", "PIT finished"),
    ("run.failed", "PIT exited with code"),
    ("status.none", "No previous run found. Run `pitlaunch run` first."),
];

/// Text for `key`, or the key itself when there is none.
pub fn message(key: &str) -> &str {
    MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
        .unwrap_or(key)
}
