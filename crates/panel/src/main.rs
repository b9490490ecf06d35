// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use mpsk_panel::config::PanelConfig;

#[tokio::main]
async fn main() {
    // Pull MPSK_GROUP and friends from ./.env before clap reads the environment.
    let _ = dotenvy::dotenv();
    let config = PanelConfig::parse();

    init_tracing(&config);

    if let Err(e) = mpsk_panel::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &PanelConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => fmt::fmt().with_env_filter(filter).json().init(),
        _ => fmt::fmt().with_env_filter(filter).init(),
    }
}
