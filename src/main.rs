// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Time2Log

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use time2log_auth::api::router;
use time2log_auth::config::Settings;
use time2log_auth::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(environment = %settings.environment, "starting auth gateway");
    info!(origins = ?settings.cors_origins, "CORS origins");
    if settings.disable_auth {
        tracing::warn!("DISABLE_AUTH is set; JWT signatures will not be verified");
    }

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("failed to parse bind address");

    let state = AppState::from_settings(settings).expect("failed to initialize state");
    let app = router(state);

    info!(%addr, "listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}
