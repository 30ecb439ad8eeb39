// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binds a listener and serves the router with SIGINT/SIGTERM-triggered
//! graceful shutdown.

use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serve `app` on `listener` until SIGINT/SIGTERM, then stop accepting new
/// connections and allow up to `shutdown_grace` for in-flight requests to
/// finish before forcing exit.
pub async fn serve(app: Router, listener: TcpListener, shutdown_grace: Duration) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal(shutdown_grace))
        .await
}

async fn wait_for_signal(shutdown_grace: Duration) {
    wait_for_os_signal().await;
    info!(grace_secs = shutdown_grace.as_secs(), "shutdown signal received, draining in-flight requests");

    tokio::spawn(async move {
        tokio::time::sleep(shutdown_grace).await;
        warn!("graceful shutdown grace period elapsed, forcing exit");
        std::process::exit(0);
    });
}

#[cfg(unix)]
async fn wait_for_os_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
