// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit log of operator actions.
//!
//! Each mutating MPSK operation appends one JSON line. The file is never
//! rotated or truncated; the log viewer page reads it back verbatim.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome recorded for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

/// A single serialized audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp_ms: u64,
    pub action: String,
    pub status: AuditStatus,
    pub details: serde_json::Value,
}

/// File-backed audit log. With no path, records only go to tracing.
pub struct AuditLog {
    path: Option<PathBuf>,
    /// Serializes appends so concurrent records never interleave.
    write_lock: Mutex<()>,
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl AuditLog {
    pub fn new(path: Option<&Path>) -> Self {
        if let Some(dir) = path.and_then(Path::parent).filter(|d| !d.as_os_str().is_empty()) {
            // Best-effort; a failure shows up on the first append.
            let _ = std::fs::create_dir_all(dir);
        }
        Self { path: path.map(Path::to_path_buf), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one record. Write failures are logged, never returned.
    pub fn record(&self, action: &str, status: AuditStatus, details: serde_json::Value) {
        match status {
            AuditStatus::Success => info!(action, status = status.as_str(), %details, "audit"),
            AuditStatus::Failed => warn!(action, status = status.as_str(), %details, "audit"),
        }

        let Some(ref path) = self.path else {
            return;
        };
        let entry =
            AuditEntry { timestamp_ms: now_ms(), action: action.to_owned(), status, details };
        let mut line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!(err = %e, "failed to serialize audit entry");
                return;
            }
        };
        line.push('\n');

        let _guard = self.write_lock.lock();
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            warn!(path = %path.display(), err = %e, "failed to append audit entry");
        }
    }

    /// Raw file contents. A log that has not been written yet reads as empty.
    pub fn read_raw(&self) -> std::io::Result<String> {
        let Some(ref path) = self.path else {
            return Ok(String::new());
        };
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Parsed records in append order. Malformed lines are skipped.
    pub fn entries(&self) -> Vec<AuditEntry> {
        let Ok(contents) = self.read_raw() else {
            return Vec::new();
        };
        contents.lines().filter_map(|line| serde_json::from_str(line).ok()).collect()
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
