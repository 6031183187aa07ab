//! Signal handling for graceful shutdown.

use std::future::pending;
use tokio::signal::unix::{SignalKind, signal};

/// Resolves once SIGTERM or SIGINT (Ctrl+C) arrives.
///
/// A signal whose handler cannot be installed is logged and never fires;
/// the other one still stops the receiver.
pub async fn shutdown_signal() {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                pending::<()>().await;
            }
        }
    };

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for SIGINT: {}", e);
            pending::<()>().await;
        }
    };

    tokio::select! {
        _ = terminate => {
            tracing::info!("Received SIGTERM, draining notifications and shutting down");
        }
        _ = interrupt => {
            tracing::info!("Received SIGINT, draining notifications and shutting down");
        }
    }
}
