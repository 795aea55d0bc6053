//! Desktop notification delivery. Fire and forget: a failed or hung
//! notifier never blocks or aborts the refresh loop.

use std::process::Stdio;
use std::time::Duration;

/// Title used for every notification.
pub const NOTIFICATION_TITLE: &str = "Task Dashboard";

/// Where new attention-class alerts are delivered.
pub trait NotificationSink {
    fn deliver(&self, title: &str, subtitle: &str, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn deliver(&self, title: &str, subtitle: &str, message: &str) {
        (**self).deliver(title, subtitle, message);
    }
}

/// Native desktop notifications: `osascript` on macOS, `notify-send` elsewhere.
///
/// Each delivery runs as a detached tokio task, so `deliver` must be called
/// from inside a runtime.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NotificationSink for DesktopNotifier {
    fn deliver(&self, title: &str, subtitle: &str, message: &str) {
        let (program, args) = notification_command(title, subtitle, message);
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let timeout = self.timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, cmd.status()).await {
                Ok(Ok(status)) if status.success() => {}
                Ok(Ok(status)) => tracing::debug!(program, %status, "notifier exited unsuccessfully"),
                Ok(Err(e)) => tracing::debug!(program, error = %e, "notifier unavailable"),
                Err(_) => tracing::debug!(program, "notifier timed out"),
            }
        });
    }
}

/// Program and arguments for the current platform.
pub fn notification_command(title: &str, subtitle: &str, message: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        (
            "osascript",
            vec!["-e".to_string(), applescript_notification(title, subtitle, message)],
        )
    } else {
        (
            "notify-send",
            vec![title.to_string(), format!("{subtitle}: {message}")],
        )
    }
}

/// `display notification` script with every string escaped.
pub fn applescript_notification(title: &str, subtitle: &str, message: &str) -> String {
    format!(
        r#"display notification "{}" with title "{}" subtitle "{}""#,
        escape_applescript(message),
        escape_applescript(title),
        escape_applescript(subtitle)
    )
}

/// Escape backslashes and double quotes for an AppleScript string literal.
pub fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
