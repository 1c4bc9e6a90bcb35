//! Graceful shutdown signal handling

use tracing::{info, warn};

/// Resolve once the process is asked to stop (Ctrl+C, or SIGTERM on Unix).
///
/// Intended for `axum::serve(..).with_graceful_shutdown(..)`:
///
/// ```ignore
/// axum::serve(listener, app)
///     .with_graceful_shutdown(common::shutdown::wait_for_shutdown())
///     .await?;
/// ```
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term_signal = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                warn!(
                    "Failed to install SIGTERM handler: {}. Only Ctrl+C will stop the service",
                    e
                );
                None
            },
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down");
            },
            _ = async {
                match term_signal {
                    Some(mut sig) => {
                        sig.recv().await;
                    },
                    None => std::future::pending::<()>().await,
                }
            } => {
                info!("SIGTERM received, shutting down");
            },
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Ctrl+C received, shutting down");
    }
}
