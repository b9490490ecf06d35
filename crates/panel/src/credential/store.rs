// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential persistence: env-file store with atomic in-place rewrites.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::credential::Credential;

pub const CLIENT_ID_KEY: &str = "CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "CLIENT_SECRET";
pub const REFRESH_TOKEN_KEY: &str = "REFRESH_TOKEN";

/// Durable storage for the panel's single [`Credential`].
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Credential>;
    fn save(&self, credential: &Credential) -> anyhow::Result<()>;
}

/// `.env`-style store: one `KEY=VALUE` per line.
///
/// Saving only touches the lines whose value changed. Comments, ordering, and
/// unrelated keys are preserved.
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for EnvFileStore {
    fn load(&self) -> anyhow::Result<Credential> {
        let contents = std::fs::read_to_string(&self.path)?;
        let mut values = parse_env(&contents)?;
        let mut take = |key: &str| {
            values
                .remove(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{key} missing from {}", self.path.display()))
        };
        Ok(Credential {
            client_id: take(CLIENT_ID_KEY)?,
            client_secret: take(CLIENT_SECRET_KEY)?,
            refresh_token: take(REFRESH_TOKEN_KEY)?,
        })
    }

    fn save(&self, credential: &Credential) -> anyhow::Result<()> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let current = parse_env(&contents)?;

        let mut updated = contents;
        for (key, value) in [
            (CLIENT_ID_KEY, &credential.client_id),
            (CLIENT_SECRET_KEY, &credential.client_secret),
            (REFRESH_TOKEN_KEY, &credential.refresh_token),
        ] {
            if current.get(key) != Some(value) {
                updated = upsert_line(&updated, key, value);
            }
        }
        write_atomic(&self.path, &updated)
    }
}

fn parse_env(contents: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    for item in dotenvy::from_read_iter(contents.as_bytes()) {
        let (key, value) = item?;
        values.insert(key, value);
    }
    Ok(values)
}

/// Replace every `KEY=...` line (optionally `export`-prefixed) with the new
/// value, or append one if the key is absent.
pub(crate) fn upsert_line(contents: &str, key: &str, value: &str) -> String {
    let line = format!("{key}={}", quote_value(value));
    let mut found = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|l| {
            let trimmed = l.trim_start();
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed).trim_start();
            let is_key = trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key {
                found = true;
                line.clone()
            } else {
                l.to_owned()
            }
        })
        .collect();
    if !found {
        lines.push(line);
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn quote_value(value: &str) -> String {
    let needs_quotes =
        value.chars().any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return value.to_owned();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"").replace('$', "\\$");
    format!("\"{escaped}\"")
}

/// Write via a uniquely named temp file and rename over the target.
///
/// The temp name carries the PID and a counter so concurrent saves never share
/// a `.tmp` file.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// In-memory store, used when the credential is supplied programmatically.
#[derive(Debug)]
pub struct MemoryStore {
    credential: Mutex<Credential>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new(credential: Credential) -> Self {
        Self { credential: Mutex::new(credential), saves: AtomicUsize::new(0) }
    }

    pub fn current(&self) -> Credential {
        self.credential.lock().clone()
    }

    /// Number of successful [`CredentialStore::save`] calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Credential> {
        Ok(self.current())
    }

    fn save(&self, credential: &Credential) -> anyhow::Result<()> {
        *self.credential.lock() = credential.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
