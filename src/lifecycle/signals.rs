//! OS signal handling.
//!
//! SIGINT and, on Unix, SIGTERM are translated into a shutdown trigger.

use tokio::task::JoinHandle;

use crate::lifecycle::{Shutdown, ShutdownReason};

/// Resolve when the process is asked to stop.
pub async fn interrupted() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Trigger `shutdown` on the first interrupt.
pub fn spawn_interrupt_handler(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        interrupted().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger(ShutdownReason::Interrupt);
    })
}
