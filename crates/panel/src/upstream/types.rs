// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PanelError;

/// Roles offered by the panel's role selector.
pub const ROLES: &[&str] = &["test", "client-daytime-only", "client-always-on"];

/// Whether a named MPSK may authenticate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpskStatus {
    Enabled,
    #[default]
    Disabled,
}

impl MpskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// The status a toggle button moves to.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }
}

impl fmt::Display for MpskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MpskStatus {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            other => Err(PanelError::Validation(format!(
                "status must be \"enabled\" or \"disabled\", got \"{other}\""
            ))),
        }
    }
}

/// A named MPSK entry as returned by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpskEntry {
    pub id: String,
    pub name: String,
    /// The passphrase.
    #[serde(default)]
    pub mpsk: String,
    #[serde(default, deserialize_with = "status_or_disabled")]
    pub status: MpskStatus,
    #[serde(default)]
    pub role: String,
}

/// Anything other than `"enabled"` (including `null`) reads as disabled.
fn status_or_disabled<'de, D>(deserializer: D) -> Result<MpskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let status = Option::<String>::deserialize(deserializer)?;
    Ok(match status.as_deref() {
        Some("enabled") => MpskStatus::Enabled,
        _ => MpskStatus::Disabled,
    })
}

/// `GET .../namedMPSK` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<MpskEntry>,
}

/// `PATCH .../namedMPSK/{id}` request body.
#[derive(Debug, Serialize)]
pub struct PatchBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MpskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}

/// Error body returned by the resource API.
#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamErrorBody {
    pub message: Option<String>,
}
