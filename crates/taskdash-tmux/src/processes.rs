//! Process table snapshot via `ps`.

use taskdash_core::ProcessSnapshot;

use crate::error::ProbeError;
use crate::executor::CommandRunner;

/// `ps` arguments: every process, unlimited width, pid + full command, no header.
pub const PS_ARGS: &[&str] = &["axww", "-o", "pid=,command="];

/// Raw `ps` output.
pub async fn process_table(runner: &impl CommandRunner) -> Result<String, ProbeError> {
    runner.run("ps", PS_ARGS).await
}

/// Snapshot all processes except `own_pid`. Empty on failure.
pub async fn snapshot_processes(runner: &impl CommandRunner, own_pid: u32) -> ProcessSnapshot {
    match process_table(runner).await {
        Ok(output) => ProcessSnapshot::parse(&output, own_pid),
        Err(e) => {
            tracing::debug!(error = %e, "process snapshot unavailable");
            ProcessSnapshot::default()
        }
    }
}
