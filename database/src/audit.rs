//! Append-only audit trail for task creation
//!
//! One line per created task id. The writer is serialized behind a mutex so
//! concurrent creates cannot interleave or lose lines; an I/O failure is
//! surfaced to the caller, which logs it without failing the create.

use std::path::{Path, PathBuf};

use chrono::Utc;
use taskboard_core::error::{Result, TaskError};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Serialized single-writer appender for the creation audit file
pub struct AuditLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl AuditLog {
    /// Open (or create) the audit file in append mode
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                TaskError::Internal(format!("Failed to open audit log {}: {e}", path.display()))
            })?;

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Append one line recording a created task id
    pub async fn record_created(&self, task_id: i64) -> Result<()> {
        let line = format!("{} task_id={task_id} created\n", Utc::now().to_rfc3339());

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await.map_err(|e| {
            TaskError::Internal(format!(
                "Failed to append to audit log {}: {e}",
                self.path.display()
            ))
        })?;
        file.flush().await.map_err(|e| {
            TaskError::Internal(format!(
                "Failed to flush audit log {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }

    /// Path of the underlying audit file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_created_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let audit = AuditLog::open(&path).await.unwrap();
        audit.record_created(1).await.unwrap();
        audit.record_created(2).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("task_id=1 created"));
        assert!(lines[1].contains("task_id=2 created"));
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let audit = Arc::new(AuditLog::open(&path).await.unwrap());

        let mut handles = Vec::new();
        for id in 0..20 {
            let audit = audit.clone();
            handles.push(tokio::spawn(
                async move { audit.record_created(id).await },
            ));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 20);
        for line in lines {
            assert!(line.ends_with("created"));
        }
    }
}
