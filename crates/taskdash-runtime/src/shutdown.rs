//! Termination signals, registered before the terminal enters raw mode.
//!
//! tokio installs a signal handler when the `Signal` stream is created, not
//! when it is first polled, so `install` must run before `TerminalGuard`
//! is acquired. From then on SIGINT, SIGTERM and SIGHUP end the loop and
//! the guard restores the terminal.

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(unix)]
    hangup: Signal,
}

impl ShutdownSignals {
    /// Register the handlers now. Must be called inside the tokio runtime.
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Resolves on the first termination signal received since `install`.
    #[cfg(unix)]
    pub async fn wait(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => tracing::info!("received SIGINT, shutting down"),
            _ = self.terminate.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = self.hangup.recv() => tracing::info!("received SIGHUP, shutting down"),
        }
    }

    #[cfg(not(unix))]
    pub async fn wait(self) {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}
