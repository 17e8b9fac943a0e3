use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// The human-readable operation log: one timestamped line per message,
/// kept in memory for the log-panel surface and appended to a UTF-8
/// newline-terminated text file when one is configured.
///
/// A file-append failure is reported through the journal itself and never
/// aborts the banking operation that produced the message.
#[derive(Clone)]
pub struct Journal {
    lines: Arc<RwLock<Vec<String>>>,
    file: Option<PathBuf>,
}

impl Journal {
    /// A journal with no backing file. Used by tests and embedded hosts.
    pub fn in_memory() -> Self {
        Self {
            lines: Arc::default(),
            file: None,
        }
    }

    /// Opens (creating if absent) the append-only journal file.
    pub async fn with_file(path: PathBuf) -> io::Result<Self> {
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            lines: Arc::default(),
            file: Some(path),
        })
    }

    /// Appends a timestamped message.
    pub async fn record(&self, message: &str) {
        let line = format!("{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        self.lines.write().await.push(line.clone());
        if let Some(path) = &self.file {
            if let Err(err) = append_line(path, &line).await {
                tracing::warn!(error = %err, path = %path.display(), "journal file append failed");
                self.lines
                    .write()
                    .await
                    .push(format!("Failed to write to log file: {err}"));
            }
        }
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines.read().await.clone()
    }
}

async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;
    Ok(())
}
