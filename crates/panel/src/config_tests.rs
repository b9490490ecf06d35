// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

use super::PanelConfig;

fn parse(args: &[&str]) -> anyhow::Result<PanelConfig> {
    Ok(PanelConfig::try_parse_from(std::iter::once("mpsk-panel").chain(args.iter().copied()))?)
}

#[test]
fn defaults() -> anyhow::Result<()> {
    let config = parse(&["--group", "g1"])?;
    assert_eq!(config.group, "g1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.list_limit, 50);
    assert_eq!(config.credentials.to_str(), Some(".env"));
    assert_eq!(config.audit_log.as_deref().and_then(|p| p.to_str()), Some("events.log"));
    assert_eq!(config.http_timeout(), None);
    assert_eq!(
        config.token_url(),
        "https://apigw-eucentral2.central.arubanetworks.com/oauth2/token"
    );
    Ok(())
}

#[test]
fn token_url_follows_api_base() -> anyhow::Result<()> {
    let config = parse(&["--group", "g1", "--api-base", "http://localhost:9000/"])?;
    assert_eq!(config.token_url(), "http://localhost:9000/oauth2/token");
    Ok(())
}

#[test]
fn explicit_token_url_wins() -> anyhow::Result<()> {
    let config = parse(&["--group", "g1", "--token-url", "http://auth.local/token"])?;
    assert_eq!(config.token_url(), "http://auth.local/token");
    Ok(())
}

#[test]
fn timeout_is_optional() -> anyhow::Result<()> {
    let config = parse(&["--group", "g1", "--http-timeout-secs", "15"])?;
    assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
    Ok(())
}
