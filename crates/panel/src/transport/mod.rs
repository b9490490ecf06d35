// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the panel.

pub mod http;
pub mod panel;
pub mod render;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::PanelState;

/// Build the axum `Router` with all panel routes.
pub fn build_router(state: Arc<PanelState>) -> Router {
    Router::new()
        // HTML panel
        .route("/", get(panel::index))
        .route("/toggle-key", post(panel::toggle_key))
        .route("/reset-key", post(panel::reset_key))
        .route("/update-role", post(panel::update_role))
        .route("/logs", get(panel::logs))
        // JSON
        .route("/api/v1/health", get(http::health))
        .route("/api/v1/entries", get(http::list_entries))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
