// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth2 refresh-token grant.

use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::error::PanelError;

/// Standard OAuth2 token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// OAuth2 error body (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange the credential's refresh token for a new access token.
///
/// Performs exactly one request. Any failure maps to [`PanelError::Auth`].
pub async fn refresh(
    client: &reqwest::Client,
    token_url: &str,
    credential: &Credential,
) -> Result<TokenResponse, PanelError> {
    let resp = client
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
            ("refresh_token", credential.refresh_token.as_str()),
        ])
        .send()
        .await
        .map_err(|e| PanelError::Auth(format!("token endpoint unreachable: {e}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| PanelError::Auth(format!("failed to read token response: {e}")))?;

    if !status.is_success() {
        let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(TokenErrorResponse { error, error_description: Some(desc) }) => {
                format!("{error}: {desc}")
            }
            Ok(TokenErrorResponse { error, error_description: None }) => error,
            Err(_) => body,
        };
        return Err(PanelError::Auth(format!("token refresh failed ({status}): {detail}")));
    }

    serde_json::from_str(&body)
        .map_err(|e| PanelError::Auth(format!("invalid token response: {e}")))
}
