// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::audit::AuditLog;
use crate::config::PanelConfig;
use crate::credential::manager::TokenManager;
use crate::credential::store::CredentialStore;
use crate::upstream::client::MpskClient;

/// Shared panel state.
pub struct PanelState {
    pub config: PanelConfig,
    pub tokens: Arc<TokenManager>,
    pub audit: Arc<AuditLog>,
    pub client: MpskClient,
}

impl PanelState {
    /// Wire up the token manager, audit log, and upstream client.
    ///
    /// Fails if the credential cannot be loaded from `store`.
    pub fn new(config: PanelConfig, store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        crate::ensure_crypto();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let tokens = Arc::new(TokenManager::new(http.clone(), config.token_url(), store)?);
        let audit = Arc::new(AuditLog::new(config.audit_log.as_deref()));
        let client = MpskClient::new(
            config.api_base.clone(),
            http,
            Arc::clone(&tokens),
            Arc::clone(&audit),
        );
        Ok(Self { config, tokens, audit, client })
    }
}
