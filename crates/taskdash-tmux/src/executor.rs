//! CommandRunner trait and SubprocessRunner (tokio subprocess wrapper).
//! The trait keeps probes mock-injectable in tests.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use crate::error::ProbeError;

/// Default upper bound for any single external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs an external program and returns its stdout.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ProbeError>> + Send;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ProbeError>> + Send {
        (**self).run(program, args)
    }
}

/// Real runner using `tokio::process::Command`. A child that outlives the
/// timeout is killed.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for SubprocessRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ProbeError>> + Send {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let program = program.to_string();
        let timeout = self.timeout;

        async move {
            let output = match tokio::time::timeout(timeout, cmd.output()).await {
                Ok(result) => result.map_err(|source| ProbeError::Io {
                    program: program.clone(),
                    source,
                })?,
                Err(_) => {
                    return Err(ProbeError::Timeout {
                        program,
                        after: timeout,
                    });
                }
            };
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(ProbeError::CommandFailed {
                    program,
                    detail: format!(
                        "exit code {}: {}",
                        output.status.code().unwrap_or(-1),
                        stderr.trim()
                    ),
                });
            }
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }
    }
}
