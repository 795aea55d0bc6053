//! One-per-cycle liveness capture.

use taskdash_core::LivenessSnapshot;

use crate::executor::CommandRunner;
use crate::processes::snapshot_processes;
use crate::sessions::Tmux;

/// Capture both probes concurrently. Both finish (or time out) before this
/// returns, so classification always sees a complete snapshot.
pub async fn capture_liveness<R: CommandRunner>(tmux: &Tmux<R>, own_pid: u32) -> LivenessSnapshot {
    let (processes, sessions) = tokio::join!(
        snapshot_processes(tmux.runner(), own_pid),
        tmux.list_windows_or_empty(),
    );
    LivenessSnapshot {
        processes,
        sessions,
    }
}
