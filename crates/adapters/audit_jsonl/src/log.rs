//! JSON Lines implementation of [`AuditLog`].

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use entryguard_app::ports::AuditLog;
use entryguard_domain::audit::LogEntry;
use entryguard_domain::error::EntryGuardError;

use crate::error::AuditJsonlError;

/// Append-only audit log backed by a single JSON Lines file.
pub struct JsonlAuditLog {
    path: PathBuf,
    // single writer; readers take it too so they never observe a half-written line
    lock: Mutex<()>,
}

impl JsonlAuditLog {
    /// Use the file at `path`, creating its parent directories if needed.
    ///
    /// The file itself is created on first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AuditJsonlError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::info!(path = %path.display(), "audit log ready");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_line(&self, entry: &LogEntry) -> Result<(), AuditJsonlError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;
        if ends_with_torn_line(&mut file).await? {
            tracing::warn!(path = %self.path.display(), "terminating torn audit line");
            line.insert(0, b'\n');
        }
        file.write_all(&line).await?;
        file.sync_data().await?;
        Ok(())
    }

    async fn read_lines(&self) -> Result<Vec<LogEntry>, AuditJsonlError> {
        let content = {
            let _guard = self.lock.lock().await;
            match tokio::fs::read(&self.path).await {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(err.into()),
            }
        };

        let entries = content
            .split(|byte| *byte == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.trim_ascii().is_empty())
            .filter_map(|(index, line)| match serde_json::from_slice(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(%err, line = index + 1, "skipping unreadable audit line");
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}

/// Whether the file is non-empty and its last byte is not a newline.
async fn ends_with_torn_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata().await?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] != b'\n')
}

impl AuditLog for JsonlAuditLog {
    async fn append(&self, entry: LogEntry) -> Result<(), EntryGuardError> {
        self.write_line(&entry).await.map_err(EntryGuardError::from)
    }

    async fn read_all(&self) -> Result<Vec<LogEntry>, EntryGuardError> {
        self.read_lines().await.map_err(EntryGuardError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entryguard_domain::audit::LogType;
    use std::sync::Arc;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join("entryguard-tests")
            .join(format!("{}.jsonl", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn should_return_empty_list_when_file_missing() {
        let log = JsonlAuditLog::open(temp_path()).await.unwrap();

        assert!(log.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_read_back_entries_in_append_order() {
        let log = JsonlAuditLog::open(temp_path()).await.unwrap();

        log.append(LogEntry::new(LogType::Security, "System ARMED", "Physical Button"))
            .await
            .unwrap();
        log.append(LogEntry::new(
            LogType::MqttOut,
            "Command Sent: home/livingroom/led/set = ON",
            "Automatic Logic",
        ))
        .await
        .unwrap();

        let entries = log.read_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].log_type, LogType::Security);
        assert_eq!(entries[0].user, "Physical Button");
        assert_eq!(entries[1].log_type, LogType::MqttOut);

        let raw = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.lines().all(|line| line.contains("\"type\":")));
        tokio::fs::remove_file(log.path()).await.unwrap();
    }

    #[tokio::test]
    async fn should_skip_torn_trailing_line() {
        let path = temp_path();
        let log = JsonlAuditLog::open(&path).await.unwrap();
        log.append(LogEntry::new(LogType::Alarm, "ALARM TRIGGERED - Intruder!", "System"))
            .await
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"{\"timestamp\":\"2026-").await.unwrap();
        file.sync_data().await.unwrap();

        let entries = log.read_all().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "ALARM TRIGGERED - Intruder!");
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn should_keep_first_append_after_torn_line() {
        let path = temp_path();
        let log = JsonlAuditLog::open(&path).await.unwrap();
        log.append(LogEntry::new(LogType::Security, "System ARMED", "Physical Button"))
            .await
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"{\"timestamp\":\"2026-").await.unwrap();
        file.sync_data().await.unwrap();
        drop(log);

        let log = JsonlAuditLog::open(&path).await.unwrap();
        log.append(LogEntry::new(
            LogType::Alarm,
            "ALARM TRIGGERED - Intrusion Confirmed",
            "System",
        ))
        .await
        .unwrap();

        let details: Vec<_> = log
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.details)
            .collect();
        assert_eq!(
            details,
            ["System ARMED", "ALARM TRIGGERED - Intrusion Confirmed"]
        );
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn should_skip_non_utf8_line() {
        let path = temp_path();
        let log = JsonlAuditLog::open(&path).await.unwrap();
        log.append(LogEntry::new(LogType::Security, "System ARMED", "Physical Button"))
            .await
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"\xff\xfe garbage\n").await.unwrap();
        file.sync_data().await.unwrap();
        log.append(LogEntry::new(LogType::Security, "System DISARMED", "Physical Button"))
            .await
            .unwrap();

        let entries = log.read_all().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].details, "System DISARMED");
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_not_interleave_concurrent_appends() {
        let log = Arc::new(JsonlAuditLog::open(temp_path()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..32 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(LogEntry::new(
                    LogType::HttpRequest,
                    format!("Method: GET | URL: /api/state?n={i}"),
                    "127.0.0.1",
                ))
                .await
                .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(log.read_all().await.unwrap().len(), 32);
        tokio::fs::remove_file(log.path()).await.unwrap();
    }
}
