// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the panel routes.
//!
//! The panel runs in-process under `axum_test::TestServer`; the upstream API
//! is a scripted `MockUpstream` on a loopback port.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use serde_json::json;

use mpsk_panel::config::PanelConfig;
use mpsk_panel::credential::store::MemoryStore;
use mpsk_panel::state::PanelState;
use mpsk_panel::test_support::{test_config, test_credential, token_body, MockUpstream};
use mpsk_panel::transport::build_router;

const ENTRIES_PATH: &str = "/cloudAuth/api/v2/mpsk/g1/namedMPSK";

fn entries_body() -> String {
    json!({
        "items": [
            {"id": "m1", "name": "alice@acme.com", "mpsk": "pw-1", "status": "enabled", "role": "test"},
            {"id": "m2", "name": "bob@acme.com", "mpsk": "pw-2", "status": "disabled", "role": "client-always-on"}
        ]
    })
    .to_string()
}

struct Harness {
    mock: MockUpstream,
    server: TestServer,
    state: Arc<PanelState>,
    _dir: tempfile::TempDir,
}

async fn harness_with(
    resource: Vec<(u16, String)>,
    configure: impl FnOnce(&mut PanelConfig, &std::path::Path),
) -> anyhow::Result<Harness> {
    let mock =
        MockUpstream::start(vec![(200, token_body("T1", 3600, None))], resource).await?;
    let dir = tempfile::tempdir()?;

    let mut config = test_config(&mock.base_url());
    config.audit_log = Some(dir.path().join("events.log"));
    configure(&mut config, dir.path());

    let store = Arc::new(MemoryStore::new(test_credential("R1")));
    let state = Arc::new(PanelState::new(config, store)?);
    let server = TestServer::new(build_router(Arc::clone(&state)))?;
    Ok(Harness { mock, server, state, _dir: dir })
}

async fn harness(resource: Vec<(u16, String)>) -> anyhow::Result<Harness> {
    harness_with(resource, |_, _| {}).await
}

fn location(resp: &TestResponse) -> String {
    resp.header("location").to_str().unwrap_or_default().to_owned()
}

// -- list page ----------------------------------------------------------------

#[tokio::test]
async fn index_renders_entries() -> anyhow::Result<()> {
    let h = harness(vec![(200, entries_body())]).await?;

    let resp = h.server.get("/").await;
    resp.assert_status_ok();
    let html = resp.text();
    assert!(html.contains("alice@acme.com"));
    assert!(html.contains("bob@acme.com"));
    assert_eq!(html.matches("action=\"/reset-key\"").count(), 2);

    let reqs = h.mock.resource_requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].path, ENTRIES_PATH);
    assert_eq!(reqs[0].query, "name=&limit=50");
    assert_eq!(reqs[0].authorization.as_deref(), Some("Bearer T1"));
    Ok(())
}

#[tokio::test]
async fn index_forwards_filter_and_shows_result() -> anyhow::Result<()> {
    let h = harness(vec![(200, entries_body())]).await?;

    let resp = h.server.get("/?name=acme.com&result=Key%20reset").await;
    resp.assert_status_ok();
    let html = resp.text();
    assert!(html.contains("value=\"acme.com\""));
    assert!(html.contains("Key reset"));

    let reqs = h.mock.resource_requests();
    assert_eq!(reqs[0].query, "name=acme.com&limit=50");
    Ok(())
}

#[tokio::test]
async fn index_reports_fetch_failure_as_500() -> anyhow::Result<()> {
    let h = harness(vec![(503, json!({"message": "maintenance"}).to_string())]).await?;

    let resp = h.server.get("/").await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text(), "Error fetching mPSKs: maintenance");
    Ok(())
}

// -- mutations ----------------------------------------------------------------

#[tokio::test]
async fn toggle_redirects_with_new_status() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/toggle-key")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "alice@acme.com"), ("status", "disabled")])
        .await;
    resp.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?result=Key%20disabled");

    let reqs = h.mock.resource_requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, "PATCH");
    assert_eq!(reqs[0].path, format!("{ENTRIES_PATH}/m1"));
    assert_eq!(reqs[0].query, "resetMPSK=false");
    assert_eq!(reqs[0].body, json!({"name": "alice@acme.com", "status": "disabled"}));
    Ok(())
}

#[tokio::test]
async fn toggle_with_missing_field_makes_no_call() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/toggle-key")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "alice@acme.com")])
        .await;
    resp.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?result=Missing%20fields%20for%20toggle");
    assert!(h.mock.resource_requests().is_empty());
    assert_eq!(h.mock.token_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn toggle_with_unknown_status_reports_error() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/toggle-key")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "n"), ("status", "paused")])
        .await;
    assert!(location(&resp).starts_with("/?result=Toggle%20error%3A%20status%20must%20be"));
    assert!(h.mock.resource_requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn reset_redirects_and_audits() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/reset-key")
        .form(&[("mpsk_id", "m2"), ("group", "g1"), ("name", "bob@acme.com")])
        .await;
    assert_eq!(location(&resp), "/?result=Key%20reset");

    let reqs = h.mock.resource_requests();
    assert_eq!(reqs[0].query, "resetMPSK=true");
    assert_eq!(reqs[0].body, json!({"name": "bob@acme.com"}));

    let entries = h.state.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "Reset mPSK Key");
    Ok(())
}

#[tokio::test]
async fn reset_failure_redirects_with_upstream_message() -> anyhow::Result<()> {
    let h = harness(vec![(500, json!({"message": "rate limited"}).to_string())]).await?;

    let resp = h
        .server
        .post("/reset-key")
        .form(&[("mpsk_id", "m2"), ("group", "g1"), ("name", "bob@acme.com")])
        .await;
    assert_eq!(location(&resp), "/?result=Reset%20error%3A%20rate%20limited");
    assert_eq!(h.mock.resource_requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn update_role_redirects_with_quoted_role() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/update-role")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "alice@acme.com"), ("role", "client-always-on")])
        .await;
    assert_eq!(location(&resp), "/?result=Role%20updated%20to%20%22client-always-on%22");

    let reqs = h.mock.resource_requests();
    assert_eq!(
        reqs[0].body,
        json!({"name": "alice@acme.com", "status": "enabled", "role": "client-always-on"})
    );
    Ok(())
}

#[tokio::test]
async fn update_role_with_empty_role_makes_no_call() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    let resp = h
        .server
        .post("/update-role")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "n"), ("role", "")])
        .await;
    assert_eq!(location(&resp), "/?result=Missing%20fields%20for%20role%20update");
    assert!(h.mock.resource_requests().is_empty());
    Ok(())
}

// -- logs ---------------------------------------------------------------------

#[tokio::test]
async fn logs_show_recorded_actions() -> anyhow::Result<()> {
    let h = harness(vec![(200, "{}".to_owned())]).await?;

    h.server
        .post("/toggle-key")
        .form(&[("mpsk_id", "m1"), ("group", "g1"), ("name", "n"), ("status", "enabled")])
        .await;

    let resp = h.server.get("/logs").await;
    resp.assert_status_ok();
    let html = resp.text();
    assert!(html.contains("Toggle mPSK Key"));
    assert!(html.contains("&quot;status&quot;:&quot;Success&quot;"));
    Ok(())
}

#[tokio::test]
async fn logs_before_any_action_are_empty() -> anyhow::Result<()> {
    let h = harness(vec![]).await?;

    let resp = h.server.get("/logs").await;
    resp.assert_status_ok();
    assert!(resp.text().contains("<pre></pre>"));
    Ok(())
}

#[tokio::test]
async fn unreadable_log_is_500() -> anyhow::Result<()> {
    // A directory where the log file should be cannot be read as text.
    let h = harness_with(vec![], |config, dir| {
        config.audit_log = Some(PathBuf::from(dir));
    })
    .await?;

    let resp = h.server.get("/logs").await;
    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text(), "Failed to load logs.");
    Ok(())
}

// -- JSON ---------------------------------------------------------------------

#[tokio::test]
async fn health_reports_token_state() -> anyhow::Result<()> {
    let h = harness(vec![(200, entries_body())]).await?;

    let resp = h.server.get("/api/v1/health").await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["group"], "g1");
    assert_eq!(body["token"]["warm"], false);

    h.server.get("/").await.assert_status_ok();

    let body: serde_json::Value = h.server.get("/api/v1/health").await.json();
    assert_eq!(body["token"]["warm"], true);
    let remaining = body["token"]["expires_in_secs"].as_u64().unwrap_or_default();
    assert!((3530..=3540).contains(&remaining), "remaining = {remaining}");
    Ok(())
}

#[tokio::test]
async fn entries_api_returns_json() -> anyhow::Result<()> {
    let h = harness(vec![(200, entries_body())]).await?;

    let resp = h.server.get("/api/v1/entries?name=bob").await;
    resp.assert_status_ok();
    let list: Vec<serde_json::Value> = resp.json();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["status"], "disabled");
    assert_eq!(h.mock.resource_requests()[0].query, "name=bob&limit=50");
    Ok(())
}

#[tokio::test]
async fn entries_api_maps_upstream_failure_to_502() -> anyhow::Result<()> {
    let h = harness(vec![(500, json!({"message": "boom"}).to_string())]).await?;

    let resp = h.server.get("/api/v1/entries").await;
    resp.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"]["message"], "boom");
    Ok(())
}
