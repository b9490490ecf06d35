// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-token lifecycle: cache, lazy expiry, single-flight refresh, and
//! refresh-token rotation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::credential::oauth;
use crate::credential::store::CredentialStore;
use crate::credential::Credential;
use crate::error::PanelError;

/// Subtracted from `expires_in` so a returned token outlives in-flight
/// requests and modest clock skew.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on the lifetime taken from a token response.
pub const MAX_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// The single cached access token.
///
/// Cold when empty or when `now >= expires_at`; Warm otherwise. Expiry is
/// checked lazily by the caller, never by a timer.
#[derive(Debug, Default)]
pub struct TokenCache {
    entry: Option<CachedToken>,
}

impl TokenCache {
    /// The cached token if it is still valid at `now`.
    pub fn fresh(&self, now: Instant) -> Option<&str> {
        self.entry.as_ref().filter(|e| now < e.expires_at).map(|e| e.access_token.as_str())
    }

    /// Replace the cached token. Returns the computed expiry.
    ///
    /// `expires_in` is clamped to [`MAX_LIFETIME`] before the margin is taken.
    pub fn store(&mut self, access_token: String, expires_in: u64, now: Instant) -> Instant {
        let lifetime = Duration::from_secs(expires_in).min(MAX_LIFETIME);
        let expires_at = now.checked_add(lifetime.saturating_sub(EXPIRY_MARGIN)).unwrap_or(now);
        self.entry = Some(CachedToken { access_token, expires_at });
        expires_at
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.entry.as_ref().map(|e| e.expires_at)
    }
}

/// Snapshot of the cache for the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
    pub warm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

/// Produces a currently valid access token for every caller.
///
/// Concurrent callers that find the cache Cold queue on the refresh lock; the
/// first performs the refresh and the rest observe the Warm cache it left.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    store: Arc<dyn CredentialStore>,
    cache: RwLock<TokenCache>,
    /// Also serves as the refresh lock.
    refresh: Mutex<RefreshState>,
}

struct RefreshState {
    credential: Credential,
    /// The in-memory refresh token has not reached the store yet.
    unsaved: bool,
}

impl TokenManager {
    /// Create a manager, loading the credential from `store`.
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> anyhow::Result<Self> {
        let credential = store.load()?;
        Ok(Self {
            http,
            token_url: token_url.into(),
            store,
            cache: RwLock::new(TokenCache::default()),
            refresh: Mutex::new(RefreshState { credential, unsaved: false }),
        })
    }

    /// Return a valid access token, refreshing if the cache is Cold.
    pub async fn access_token(&self) -> Result<String, PanelError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let mut state = self.refresh.lock().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let token = match oauth::refresh(&self.http, &self.token_url, &state.credential).await {
            Ok(token) => token,
            Err(e) => {
                warn!(err = %e, "failed to refresh access token");
                return Err(e);
            }
        };
        let now = Instant::now();

        if let Some(rotated) =
            token.refresh_token.as_deref().filter(|rt| *rt != state.credential.refresh_token)
        {
            // The old token is spent upstream; adopt the new one before saving.
            state.credential.refresh_token = rotated.to_owned();
            state.unsaved = true;
            info!("refresh token rotated");
        }

        if state.unsaved {
            if let Err(e) = self.store.save(&state.credential) {
                warn!(err = %e, "failed to persist rotated refresh token");
                return Err(PanelError::Auth(format!(
                    "failed to persist rotated refresh token: {e:#}"
                )));
            }
            state.unsaved = false;
            info!("rotated refresh token persisted");
        }

        self.cache.write().await.store(token.access_token.clone(), token.expires_in, now);
        info!(expires_in = token.expires_in, "access token refreshed");
        Ok(token.access_token)
    }

    /// Drop the cached token so the next caller refreshes.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
        debug!("access token invalidated");
    }

    pub async fn status(&self) -> TokenStatus {
        let cache = self.cache.read().await;
        let now = Instant::now();
        match cache.expires_at() {
            Some(at) if now < at => {
                TokenStatus { warm: true, expires_in_secs: Some(at.duration_since(now).as_secs()) }
            }
            _ => TokenStatus { warm: false, expires_in_secs: None },
        }
    }

    async fn cached(&self) -> Option<String> {
        self.cache.read().await.fresh(Instant::now()).map(str::to_owned)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
