// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destinations for job output and state notifications.

use crate::lock::file_stem;
use parking_lot::Mutex;
use sj_core::{JobId, ProcessState, StreamKind};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Receives every line a job produces plus its state changes.
///
/// Implementations must be safe for concurrent use by several jobs and
/// must not fail the caller: write errors are logged and swallowed.
pub trait LogSink: Send + Sync {
    fn append(&self, job_id: &JobId, stream: StreamKind, line: &str);
    fn state_changed(&self, job_id: &JobId, from: ProcessState, to: ProcessState);
}

/// Append-only per-job log files.
///
/// Writes timestamped lines to `<log_dir>/<job_id>.log`:
///
/// ```text
/// 2026-01-30T08:14:09Z [out] sending incremental file list
/// 2026-01-30T08:14:10Z [state] running -> finished
/// ```
pub struct FileLogSink {
    log_dir: PathBuf,
    files: Mutex<HashMap<JobId, Arc<Mutex<()>>>>,
}

impl FileLogSink {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self { log_dir: log_dir.into(), files: Mutex::new(HashMap::new()) }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn path_for(&self, job_id: &JobId) -> PathBuf {
        self.log_dir.join(format!("{}.log", file_stem(job_id)))
    }

    fn write(&self, job_id: &JobId, tag: &str, message: &str) {
        let guard = Arc::clone(self.files.lock().entry(job_id.clone()).or_default());
        let _serialized = guard.lock();
        let path = self.path_for(job_id);
        if let Err(e) = write_line(&path, tag, message) {
            tracing::warn!(job_id = %job_id, path = %path.display(), error = %e, "failed to write job log");
        }
    }
}

fn write_line(path: &Path, tag: &str, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    writeln!(file, "{ts} [{tag}] {message}")
}

impl LogSink for FileLogSink {
    fn append(&self, job_id: &JobId, stream: StreamKind, line: &str) {
        self.write(job_id, &stream.to_string(), line);
    }

    fn state_changed(&self, job_id: &JobId, from: ProcessState, to: ProcessState) {
        self.write(job_id, "state", &format!("{from} -> {to}"));
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::LogSink;
    use parking_lot::Mutex;
    use sj_core::{JobId, ProcessState, StreamKind};

    /// Recorded sink call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkEntry {
        Line { job_id: JobId, stream: StreamKind, line: String },
        State { job_id: JobId, from: ProcessState, to: ProcessState },
    }

    /// Sink that keeps everything in memory.
    #[derive(Default)]
    pub struct MemoryLogSink {
        entries: Mutex<Vec<SinkEntry>>,
    }

    impl MemoryLogSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn entries(&self) -> Vec<SinkEntry> {
            self.entries.lock().clone()
        }

        /// Lines appended for `job_id` on `stream`, in order.
        pub fn lines(&self, job_id: &JobId, stream: StreamKind) -> Vec<String> {
            self.entries
                .lock()
                .iter()
                .filter_map(|e| match e {
                    SinkEntry::Line { job_id: j, stream: s, line } if j == job_id && *s == stream => {
                        Some(line.clone())
                    }
                    _ => None,
                })
                .collect()
        }

        /// States entered by `job_id`, in order.
        pub fn states(&self, job_id: &JobId) -> Vec<ProcessState> {
            self.entries
                .lock()
                .iter()
                .filter_map(|e| match e {
                    SinkEntry::State { job_id: j, to, .. } if j == job_id => Some(*to),
                    _ => None,
                })
                .collect()
        }
    }

    impl LogSink for MemoryLogSink {
        fn append(&self, job_id: &JobId, stream: StreamKind, line: &str) {
            self.entries.lock().push(SinkEntry::Line {
                job_id: job_id.clone(),
                stream,
                line: line.to_string(),
            });
        }

        fn state_changed(&self, job_id: &JobId, from: ProcessState, to: ProcessState) {
            self.entries.lock().push(SinkEntry::State { job_id: job_id.clone(), from, to });
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{MemoryLogSink, SinkEntry};

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
