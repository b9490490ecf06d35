// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated client for the named-MPSK endpoints.
//!
//! Every call fetches a token from the [`TokenManager`] first. Mutations are
//! validated locally, issued once with no retry, and audited.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::json;
use tracing::{debug, warn};

use crate::audit::{AuditLog, AuditStatus};
use crate::credential::manager::TokenManager;
use crate::error::PanelError;
use crate::upstream::types::{ListResponse, MpskEntry, MpskStatus, PatchBody, UpstreamErrorBody};

pub const ACTION_TOGGLE: &str = "Toggle mPSK Key";
pub const ACTION_RESET: &str = "Reset mPSK Key";
pub const ACTION_ROLE: &str = "Update mPSK Role";

/// HTTP client for the upstream MPSK resource API.
pub struct MpskClient {
    base_url: String,
    client: Client,
    tokens: Arc<TokenManager>,
    audit: Arc<AuditLog>,
}

impl MpskClient {
    pub fn new(
        base_url: impl Into<String>,
        client: Client,
        tokens: Arc<TokenManager>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self { base_url: base_url.into(), client, tokens, audit }
    }

    /// `{base}/cloudAuth/api/v2/mpsk/{group}/namedMPSK[/{id}]`, each segment
    /// percent-encoded.
    fn url(&self, group: &str, id: Option<&str>) -> Result<Url, PanelError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PanelError::upstream(None, format!("invalid api base url: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| PanelError::upstream(None, "api base url cannot have a path"))?;
            segments.pop_if_empty().extend(["cloudAuth", "api", "v2", "mpsk", group, "namedMPSK"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// List entries in `group` whose name contains `name_filter` (matched
    /// upstream, case-sensitive). An empty filter lists everything up to
    /// `limit`.
    pub async fn list_entries(
        &self,
        group: &str,
        name_filter: &str,
        limit: u32,
    ) -> Result<Vec<MpskEntry>, PanelError> {
        require(&[("group", group)])?;
        let token = self.tokens.access_token().await?;

        let mut url = self.url(group, None)?;
        url.query_pairs_mut()
            .append_pair("name", name_filter)
            .append_pair("limit", &limit.to_string());

        debug!(%url, "listing named mpsks");
        let resp = self.client.get(url).bearer_auth(token).send().await.map_err(transport_error)?;
        let resp = self.check(resp).await?;
        let list: ListResponse = resp
            .json()
            .await
            .map_err(|e| PanelError::upstream(None, format!("invalid list response: {e}")))?;
        Ok(list.items)
    }

    /// Enable or disable an entry.
    pub async fn set_status(
        &self,
        group: &str,
        id: &str,
        name: &str,
        status: &str,
    ) -> Result<MpskStatus, PanelError> {
        require(&[("group", group), ("id", id), ("name", name), ("status", status)])?;
        let status: MpskStatus = status.parse()?;

        let body = PatchBody { name, status: Some(status), role: None };
        let result = self.patch(group, id, false, &body).await;
        self.audit_outcome(
            ACTION_TOGGLE,
            &result,
            json!({ "mpsk_id": id, "group": group, "name": name, "status": status }),
        );
        result.map(|()| status)
    }

    /// Have the upstream generate a new passphrase for an entry.
    pub async fn reset_passphrase(
        &self,
        group: &str,
        id: &str,
        name: &str,
    ) -> Result<(), PanelError> {
        require(&[("group", group), ("id", id), ("name", name)])?;

        let body = PatchBody { name, status: None, role: None };
        let result = self.patch(group, id, true, &body).await;
        self.audit_outcome(
            ACTION_RESET,
            &result,
            json!({ "mpsk_id": id, "group": group, "name": name }),
        );
        result
    }

    /// Change an entry's role. The upstream requires a status alongside a role
    /// change, so the entry is always re-enabled.
    pub async fn update_role(
        &self,
        group: &str,
        id: &str,
        name: &str,
        role: &str,
    ) -> Result<(), PanelError> {
        require(&[("group", group), ("id", id), ("name", name), ("role", role)])?;

        let body = PatchBody { name, status: Some(MpskStatus::Enabled), role: Some(role) };
        let result = self.patch(group, id, false, &body).await;
        self.audit_outcome(
            ACTION_ROLE,
            &result,
            json!({ "mpsk_id": id, "group": group, "name": name, "role": role }),
        );
        result
    }

    async fn patch(
        &self,
        group: &str,
        id: &str,
        reset_mpsk: bool,
        body: &PatchBody<'_>,
    ) -> Result<(), PanelError> {
        let token = self.tokens.access_token().await?;

        let mut url = self.url(group, Some(id))?;
        url.query_pairs_mut().append_pair("resetMPSK", if reset_mpsk { "true" } else { "false" });

        debug!(%url, "patching named mpsk");
        let resp = self
            .client
            .patch(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        self.check(resp).await?;
        Ok(())
    }

    /// Pass success responses through; turn anything else into
    /// [`PanelError::Upstream`]. A 401 also drops the cached token.
    async fn check(&self, resp: Response) -> Result<Response, PanelError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<UpstreamErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(text.trim().to_owned()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| {
                format!("request failed with status code {}", status.as_u16())
            });
        warn!(status = status.as_u16(), %message, "upstream request failed");
        Err(PanelError::upstream(Some(status.as_u16()), message))
    }

    fn audit_outcome(
        &self,
        action: &str,
        result: &Result<(), PanelError>,
        mut details: serde_json::Value,
    ) {
        match result {
            Ok(()) => self.audit.record(action, AuditStatus::Success, details),
            Err(e) => {
                details["error"] = serde_json::Value::String(e.message().to_owned());
                self.audit.record(action, AuditStatus::Failed, details);
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> PanelError {
    warn!(err = %e, "upstream request failed");
    PanelError::upstream(None, e.to_string())
}

/// Fail with [`PanelError::Validation`] naming every empty field.
fn require(fields: &[(&str, &str)]) -> Result<(), PanelError> {
    let missing: Vec<&str> =
        fields.iter().filter(|(_, v)| v.trim().is_empty()).map(|(k, _)| *k).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PanelError::Validation(format!("missing required fields: {}", missing.join(", "))))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
