use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Append-only record of requested locations, one `<timestamp>: <location>` line each.
///
/// Writes are best-effort: failures are logged and never reach the caller.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn record(&self, location: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let line = format_entry(&chrono::Local::now(), location);
        if let Err(e) = append(path, &line).await {
            warn!(target: "audit", path = %path.display(), error = %e, "Failed to write to log file");
        }
    }
}

async fn append(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

pub(crate) fn format_entry<Tz>(at: &chrono::DateTime<Tz>, location: &str) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    // One request, one line.
    let location = location.replace(['\r', '\n'], " ");
    format!("{}: {}\n", at.format("%Y-%m-%dT%H:%M:%S%.6f"), location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn entry_is_iso_timestamp_then_location() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 5).unwrap();
        assert_eq!(
            format_entry(&at, "Petra"),
            "2024-05-17T09:30:05.000000: Petra\n"
        );
    }

    #[test]
    fn embedded_newlines_stay_on_one_line() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 5).unwrap();
        let entry = format_entry(&at, "Old\nTown\r\nSquare");
        assert_eq!(entry.matches('\n').count(), 1);
        assert!(entry.ends_with("Old Town  Square\n"));
    }

    #[tokio::test]
    async fn record_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.txt");
        let log = AuditLog::new(Some(path.clone()));
        log.record("Petra").await;
        log.record("Angkor Wat").await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": Petra"));
        assert!(lines[1].ends_with(": Angkor Wat"));
    }

    #[tokio::test]
    async fn unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(Some(dir.path().join("missing").join("locations.txt")));
        log.record("Petra").await;
    }
}
