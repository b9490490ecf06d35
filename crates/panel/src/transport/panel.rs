// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML form handlers for the admin panel.
//!
//! Mutations always answer with a redirect back to the list page carrying a
//! human-readable `result` message.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, info};

use crate::state::PanelState;
use crate::transport::render;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub result: String,
}

/// Fields posted by the row forms. Each action reads the subset it needs.
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub mpsk_id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub role: String,
}

fn any_empty(fields: &[&str]) -> bool {
    fields.iter().any(|f| f.trim().is_empty())
}

fn redirect_with(message: &str) -> Redirect {
    Redirect::to(&format!("/?result={}", render::urlencode(message)))
}

/// `GET /`
pub async fn index(
    State(s): State<Arc<PanelState>>,
    Query(q): Query<ListQuery>,
) -> Response {
    let group = &s.config.group;
    match s.client.list_entries(group, &q.name, s.config.list_limit).await {
        Ok(entries) => Html(render::list_page(group, &entries, &q.name, &q.result)).into_response(),
        Err(e) => {
            error!(err = %e, "failed to list mpsks");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error fetching mPSKs: {}", e.message()))
                .into_response()
        }
    }
}

/// `POST /toggle-key`
pub async fn toggle_key(State(s): State<Arc<PanelState>>, Form(f): Form<EntryForm>) -> Redirect {
    if any_empty(&[f.mpsk_id.as_str(), f.group.as_str(), f.name.as_str(), f.status.as_str()]) {
        return redirect_with("Missing fields for toggle");
    }
    match s.client.set_status(&f.group, &f.mpsk_id, &f.name, &f.status).await {
        Ok(status) => {
            info!(mpsk_id = %f.mpsk_id, %status, "toggled mpsk");
            redirect_with(&format!("Key {status}"))
        }
        Err(e) => redirect_with(&format!("Toggle error: {}", e.message())),
    }
}

/// `POST /reset-key`
pub async fn reset_key(State(s): State<Arc<PanelState>>, Form(f): Form<EntryForm>) -> Redirect {
    if any_empty(&[f.mpsk_id.as_str(), f.group.as_str(), f.name.as_str()]) {
        return redirect_with("Missing fields for reset");
    }
    match s.client.reset_passphrase(&f.group, &f.mpsk_id, &f.name).await {
        Ok(()) => {
            info!(mpsk_id = %f.mpsk_id, "reset mpsk passphrase");
            redirect_with("Key reset")
        }
        Err(e) => redirect_with(&format!("Reset error: {}", e.message())),
    }
}

/// `POST /update-role`
pub async fn update_role(State(s): State<Arc<PanelState>>, Form(f): Form<EntryForm>) -> Redirect {
    if any_empty(&[f.mpsk_id.as_str(), f.group.as_str(), f.name.as_str(), f.role.as_str()]) {
        return redirect_with("Missing fields for role update");
    }
    match s.client.update_role(&f.group, &f.mpsk_id, &f.name, &f.role).await {
        Ok(()) => {
            info!(mpsk_id = %f.mpsk_id, role = %f.role, "updated mpsk role");
            redirect_with(&format!("Role updated to \"{}\"", f.role))
        }
        Err(e) => redirect_with(&format!("Role update error: {}", e.message())),
    }
}

/// `GET /logs`
pub async fn logs(State(s): State<Arc<PanelState>>) -> Response {
    match s.audit.read_raw() {
        Ok(raw) => Html(render::logs_page(&raw)).into_response(),
        Err(e) => {
            error!(err = %e, "failed to read audit log");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load logs.").into_response()
        }
    }
}
