//! tmux window listing and switching.

use taskdash_core::SessionList;

use crate::error::ProbeError;
use crate::executor::CommandRunner;

/// Format string for `tmux list-windows -a -F`.
pub const LIST_WINDOWS_FORMAT: &str = "#{session_name}:#{window_index}";

const TMUX_BIN: &str = "tmux";

/// tmux client bound to a runner and an optional server socket.
pub struct Tmux<R> {
    runner: R,
    socket_path: Option<String>,
}

impl<R: CommandRunner> Tmux<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            socket_path: None,
        }
    }

    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn run(&self, args: &[&str]) -> Result<String, ProbeError> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if let Some(ref path) = self.socket_path {
            full.extend(["-S", path.as_str()]);
        }
        full.extend_from_slice(args);
        self.runner.run(TMUX_BIN, &full).await
    }

    /// All windows of all sessions as `session:index`.
    pub async fn list_windows(&self) -> Result<SessionList, ProbeError> {
        let output = self
            .run(&["list-windows", "-a", "-F", LIST_WINDOWS_FORMAT])
            .await?;
        Ok(SessionList::parse(&output))
    }

    /// Like [`Tmux::list_windows`], but no server or no tmux means no windows.
    pub async fn list_windows_or_empty(&self) -> SessionList {
        match self.list_windows().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::debug!(error = %e, "tmux window listing unavailable");
                SessionList::default()
            }
        }
    }

    /// Select the first live window whose index is `window`.
    ///
    /// Returns `false` when no live window matches or tmux fails.
    pub async fn switch_to_window(&self, window: &str, sessions: &SessionList) -> bool {
        let Some(target) = sessions.find_window(window) else {
            tracing::debug!(window, "no live tmux window to switch to");
            return false;
        };
        match self.run(&["select-window", "-t", target]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(target, error = %e, "tmux select-window failed");
                false
            }
        }
    }
}
