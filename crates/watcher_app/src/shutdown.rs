use watcher_logging::{watch_error, watch_info, watch_warn};

/// Resolves on SIGTERM or SIGINT.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    // Registration can fail in restricted environments (containers, tests).
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => watch_info!("received SIGTERM"),
                _ = sigint.recv() => watch_info!("received SIGINT"),
            }
        }
        (Err(err), Ok(mut sigint)) => {
            watch_warn!("could not register SIGTERM handler ({}); waiting for SIGINT only", err);
            sigint.recv().await;
            watch_info!("received SIGINT");
        }
        (Ok(mut sigterm), Err(err)) => {
            watch_warn!("could not register SIGINT handler ({}); waiting for SIGTERM only", err);
            sigterm.recv().await;
            watch_info!("received SIGTERM");
        }
        (Err(err), Err(_)) => {
            watch_error!("could not register signal handlers ({}); using ctrl_c fallback", err);
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => watch_info!("received Ctrl+C"),
        Err(err) => {
            watch_error!("failed to listen for Ctrl+C ({}); running until killed", err);
            std::future::pending::<()>().await;
        }
    }
}
