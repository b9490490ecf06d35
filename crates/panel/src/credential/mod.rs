// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth credential handling for the upstream network-management API.
//!
//! A single client id/secret pair plus a rotating refresh token is loaded from
//! a [`store::CredentialStore`] at startup. The [`manager::TokenManager`]
//! exchanges the refresh token for short-lived access tokens, caches them, and
//! writes rotated refresh tokens back to the store.

pub mod manager;
pub mod oauth;
pub mod store;

use std::fmt;

/// The client credentials and current refresh token.
///
/// `client_id` and `client_secret` never change for the lifetime of the
/// process; `refresh_token` is replaced whenever the token endpoint rotates it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
