//! Append-only access log writer.
//!
//! # Design Decisions
//! - Logging is fire-and-forget: the request path hands a record to a
//!   bounded queue and moves on without waiting on disk
//! - A single background task owns the file handle, so concurrent
//!   requests can never interleave bytes within a line
//! - Failures degrade to dropped records, never to failed requests

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::accesslog::record::AccessLogRecord;

/// Queue slots between the request paths and the writer task.
const QUEUE_CAPACITY: usize = 1024;

/// Cloneable handle for appending access log records.
#[derive(Clone)]
pub struct AccessLogWriter {
    tx: mpsc::Sender<AccessLogRecord>,
}

impl AccessLogWriter {
    /// Spawn the background writer task appending to `path`.
    ///
    /// The task drains the queue and exits once every handle clone has
    /// been dropped; await the returned join handle for the final flush.
    pub fn spawn(path: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let task = tokio::spawn(write_loop(path.into(), rx));
        (Self { tx }, task)
    }

    /// Queue one record. Never blocks; when the queue is full or the
    /// writer is gone the record is dropped with a warning.
    pub fn append(&self, record: AccessLogRecord) {
        if let Err(e) = self.tx.try_send(record) {
            tracing::warn!(error = %e, "Access log record dropped");
        }
    }
}

async fn write_loop(path: PathBuf, mut rx: mpsc::Receiver<AccessLogRecord>) {
    let mut file = match open_log(&path).await {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to open access log, records will be dropped"
            );
            None
        }
    };

    while let Some(record) = rx.recv().await {
        let Some(file) = file.as_mut() else { continue };

        let mut line = match serde_json::to_vec(&record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Unserializable access log record dropped");
                continue;
            }
        };
        line.push(b'\n');

        if let Err(e) = file.write_all(&line).await {
            tracing::warn!(path = %path.display(), error = %e, "Access log append failed");
        }
    }
}

async fn open_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path).await
}
