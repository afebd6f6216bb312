use anyhow::Result;

/// Resolve once the process is asked to stop (SIGTERM / SIGINT / Ctrl+C).
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("shutdown: SIGTERM received"),
            _ = sigint.recv()  => tracing::info!("shutdown: SIGINT received"),
            _ = tokio::signal::ctrl_c() => tracing::info!("shutdown: Ctrl+C received"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown: Ctrl+C received");
        Ok(())
    }
}
