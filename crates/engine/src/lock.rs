// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job lock files.
//!
//! A job is running iff `<lock_dir>/<job-id>.lock` exists. The file is
//! created with create-exclusive semantics and holds the owner's pid, so a
//! lock left behind by a crashed run can be told apart from a live one.

use sj_adapters::process_alive;
use sj_core::JobId;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOCK_EXT: &str = "lock";

#[derive(Debug, Error)]
pub enum LockError {
    #[error("job {job_id} is already running (lock {path})")]
    Held { job_id: JobId, path: PathBuf },
    #[error("lock io error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LockError + '_ {
    move |source| LockError::Io { path: path.to_path_buf(), source }
}

/// `job_id` percent-encoded for use as a file name. Distinct ids always get
/// distinct stems.
pub(crate) fn file_stem(job_id: &JobId) -> String {
    urlencoding::encode(job_id.as_str()).into_owned()
}

/// Inverse of [`file_stem`]; `None` for names this module did not write.
fn job_id_from_stem(stem: &str) -> Option<JobId> {
    urlencoding::decode(stem).ok().map(|id| JobId::new(id.as_ref()))
}

/// A lock file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockInfo {
    pub job_id: JobId,
    /// `None` when the file is empty or unreadable
    pub pid: Option<u32>,
    pub path: PathBuf,
}

impl LockInfo {
    /// The recorded owner no longer exists.
    pub fn is_stale(&self) -> bool {
        match self.pid {
            Some(pid) => !process_alive(pid),
            None => true,
        }
    }
}

/// Directory holding one lock file per running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockDir {
    root: PathBuf,
}

impl LockDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lock file path for `job_id`.
    pub fn path_for(&self, job_id: &JobId) -> PathBuf {
        self.root.join(format!("{}.{LOCK_EXT}", file_stem(job_id)))
    }

    /// Take the lock for `job_id`, failing immediately if it is held.
    pub fn acquire(&self, job_id: &JobId) -> Result<JobLock, LockError> {
        std::fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;
        let path = self.path_for(job_id);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(LockError::Held { job_id: job_id.clone(), path });
            }
            Err(e) => return Err(io_error(&path)(e)),
        };

        // From here on the guard owns the file and removes it on failure
        let lock = JobLock { job_id: job_id.clone(), path, released: false };
        writeln!(file, "{}", std::process::id())
            .and_then(|()| file.sync_all())
            .map_err(io_error(&lock.path))?;

        tracing::debug!(job_id = %job_id, path = %lock.path.display(), "lock acquired");
        Ok(lock)
    }

    pub fn is_locked(&self, job_id: &JobId) -> bool {
        self.path_for(job_id).exists()
    }

    /// All lock files currently present.
    pub fn holders(&self) -> Result<Vec<LockInfo>, LockError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root)(e)),
        };

        let mut locks = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&self.root))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOCK_EXT) {
                continue;
            }
            let Some(job_id) = path.file_stem().and_then(|s| s.to_str()).and_then(job_id_from_stem)
            else {
                continue;
            };
            let pid = std::fs::read_to_string(&path)
                .ok()
                .and_then(|s| s.lines().next().and_then(|l| l.trim().parse().ok()));
            locks.push(LockInfo { job_id, pid, path });
        }
        locks.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        Ok(locks)
    }

    /// Locks whose owning process is gone.
    pub fn stale_locks(&self) -> Result<Vec<LockInfo>, LockError> {
        Ok(self.holders()?.into_iter().filter(LockInfo::is_stale).collect())
    }

    /// Remove the lock for `job_id`. Returns false if there was none.
    pub fn clear(&self, job_id: &JobId) -> Result<bool, LockError> {
        remove_lock_file(&self.path_for(job_id))
    }

    /// Remove every lock file, live or not. Only for use when no job can
    /// legitimately be running.
    pub fn clear_all(&self) -> Result<Vec<LockInfo>, LockError> {
        let locks = self.holders()?;
        for lock in &locks {
            remove_lock_file(&lock.path)?;
            tracing::info!(job_id = %lock.job_id, pid = ?lock.pid, "lock cleared");
        }
        Ok(locks)
    }
}

fn remove_lock_file(path: &Path) -> Result<bool, LockError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path)(e)),
    }
}

/// Held lock; the file is removed when the guard is released or dropped.
#[derive(Debug)]
pub struct JobLock {
    job_id: JobId,
    path: PathBuf,
    released: bool,
}

impl JobLock {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock file, reporting any error.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        remove_lock_file(&self.path)?;
        tracing::debug!(job_id = %self.job_id, "lock released");
        Ok(())
    }
}

impl Drop for JobLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_lock_file(&self.path) {
            tracing::warn!(job_id = %self.job_id, error = %e, "failed to remove lock file");
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
