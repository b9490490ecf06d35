// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Admin panel for named MPSK entries.
#[derive(Debug, Clone, Parser)]
#[command(name = "mpsk-panel", version, about)]
pub struct PanelConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "MPSK_PANEL_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "MPSK_PANEL_PORT")]
    pub port: u16,

    /// Upstream MPSK group to manage.
    #[arg(long, env = "MPSK_GROUP")]
    pub group: String,

    /// Base URL of the upstream API gateway.
    #[arg(
        long,
        default_value = "https://apigw-eucentral2.central.arubanetworks.com",
        env = "MPSK_API_BASE"
    )]
    pub api_base: String,

    /// OAuth token endpoint. Defaults to `{api_base}/oauth2/token`.
    #[arg(long, env = "MPSK_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Env-style file holding CLIENT_ID, CLIENT_SECRET and REFRESH_TOKEN.
    /// Rotated refresh tokens are written back here.
    #[arg(long, default_value = ".env", env = "MPSK_CREDENTIALS")]
    pub credentials: PathBuf,

    /// Audit log file (JSONL).
    #[arg(long, default_value = "events.log", env = "MPSK_AUDIT_LOG")]
    pub audit_log: Option<PathBuf>,

    /// Maximum entries fetched per list request.
    #[arg(long, default_value_t = 50, env = "MPSK_LIST_LIMIT")]
    pub list_limit: u32,

    /// Timeout for upstream HTTP requests. Unset means the client default.
    #[arg(long, env = "MPSK_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Log format (json or text).
    #[arg(long, default_value = "text", env = "MPSK_LOG_FORMAT")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "MPSK_LOG_LEVEL")]
    pub log_level: String,
}

impl PanelConfig {
    pub fn token_url(&self) -> String {
        match self.token_url {
            Some(ref url) => url.clone(),
            None => format!("{}/oauth2/token", self.api_base.trim_end_matches('/')),
        }
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
