// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::credential::manager::TokenStatus;
use crate::state::PanelState;
use crate::transport::panel::ListQuery;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub group: String,
    pub token: TokenStatus,
}

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<PanelState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        group: s.config.group.clone(),
        token: s.tokens.status().await,
    })
}

/// `GET /api/v1/entries?name=`
pub async fn list_entries(
    State(s): State<Arc<PanelState>>,
    Query(q): Query<ListQuery>,
) -> impl IntoResponse {
    match s.client.list_entries(&s.config.group, &q.name, s.config.list_limit).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => e.to_http_response().into_response(),
    }
}
