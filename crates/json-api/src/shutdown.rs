//! Stop signals for the storefront server.
//!
//! The first Ctrl+C or SIGTERM stops accepting connections and gives open requests the
//! configured grace period to finish.

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("could not watch for Ctrl+C: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("could not watch for SIGTERM: {0}")]
    SigTerm(#[source] io::Error),

    #[cfg(windows)]
    #[error("could not watch for the Windows close signal: {0}")]
    Terminate(#[source] io::Error),
}

/// Resolves with the name of the first stop signal received.
async fn stop_signal() -> Result<&'static str, ShutdownSignalError> {
    let interrupt = async {
        signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC)?;

        Ok::<_, ShutdownSignalError>("ctrl_c")
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;

        Ok::<_, ShutdownSignalError>("sigterm")
    };

    #[cfg(windows)]
    let terminate = async {
        signal::windows::ctrl_close()
            .map_err(ShutdownSignalError::Terminate)?
            .recv()
            .await;

        Ok::<_, ShutdownSignalError>("ctrl_close")
    };

    tokio::select! {
        signal = interrupt => signal,
        signal = terminate => signal,
    }
}

pub(crate) async fn listen(
    handle: ServerHandle,
    grace: Option<Duration>,
) -> Result<(), ShutdownSignalError> {
    let signal = stop_signal().await?;

    info!(
        signal,
        grace_secs = grace.as_ref().map(Duration::as_secs),
        "storefront stopping, draining open requests"
    );

    handle.stop_graceful(grace);

    Ok(())
}
